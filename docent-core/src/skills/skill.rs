//! Skill definitions and the ordered skill registry
//!
//! The registry only ever holds names and descriptions. Content is resolved
//! separately by [`SkillLoader`](super::SkillLoader) so that advertising a skill
//! never costs more context than its one-line summary.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Error type for skill operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillError {
    /// No skill with this name is registered, or its content is missing
    NotFound {
        /// The name that was requested
        name: String,
    },
    /// Name does not follow the `[a-z_]+` convention
    InvalidName(String),
    /// Skill already registered
    AlreadyRegistered(String),
    /// Invalid configuration (bad frontmatter, mismatched file name, ...)
    InvalidConfig(String),
    /// Content store failed for a reason other than absence
    Io {
        /// Skill whose content could not be read
        name: String,
        /// Underlying error message
        message: String,
    },
}

impl std::fmt::Display for SkillError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkillError::NotFound { name } => {
                write!(f, "Skill '{}' not found", name)
            }
            SkillError::InvalidName(name) => {
                write!(
                    f,
                    "Skill name '{}' must be snake_case (lowercase letters, digits, underscores)",
                    name
                )
            }
            SkillError::AlreadyRegistered(name) => {
                write!(f, "Skill '{}' is already registered", name)
            }
            SkillError::InvalidConfig(msg) => {
                write!(f, "Invalid skill configuration: {}", msg)
            }
            SkillError::Io { name, message } => {
                write!(f, "Failed to read skill '{}': {}", name, message)
            }
        }
    }
}

impl std::error::Error for SkillError {}

/// Check if a string is a valid skill name: a lowercase letter followed by
/// lowercase letters, digits or underscores.
pub fn is_valid_skill_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Name and description of one skill. Content is loaded on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDefinition {
    /// Unique identifier, also the content store key
    pub name: String,
    /// One-line summary advertised to the model
    pub description: String,
}

impl SkillDefinition {
    /// Create a new definition
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Skills shipped with Docent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinSkill {
    SalesAnalytics,
    InventoryManagement,
}

impl BuiltinSkill {
    /// Every builtin skill, in the order it is advertised.
    pub const ALL: [BuiltinSkill; 2] = [
        BuiltinSkill::SalesAnalytics,
        BuiltinSkill::InventoryManagement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinSkill::SalesAnalytics => "sales_analytics",
            BuiltinSkill::InventoryManagement => "inventory_management",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BuiltinSkill::SalesAnalytics => {
                "Database schema and business logic for sales data analysis."
            }
            BuiltinSkill::InventoryManagement => {
                "Database schema and business logic for inventory tracking."
            }
        }
    }

    pub fn definition(&self) -> SkillDefinition {
        SkillDefinition::new(self.as_str(), self.description())
    }
}

impl std::fmt::Display for BuiltinSkill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuiltinSkill {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuiltinSkill::ALL
            .into_iter()
            .find(|skill| skill.as_str() == s)
            .ok_or_else(|| SkillError::NotFound {
                name: s.to_string(),
            })
    }
}

/// Ordered, immutable set of skill definitions.
///
/// Order is registration order and is preserved everywhere the registry is
/// rendered. Lookups return a typed failure instead of an `Option` so callers
/// keep the attempted name for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillRegistry {
    skills: Vec<SkillDefinition>,
}

impl SkillRegistry {
    /// Registry holding every [`BuiltinSkill`]
    pub fn builtin() -> Self {
        Self {
            skills: BuiltinSkill::ALL.iter().map(BuiltinSkill::definition).collect(),
        }
    }

    /// Create a new registry builder
    pub fn builder() -> SkillRegistryBuilder {
        SkillRegistryBuilder::default()
    }

    /// `(name, description)` for every skill, in registry order
    pub fn describe_all(&self) -> Vec<(&str, &str)> {
        self.skills
            .iter()
            .map(|s| (s.name.as_str(), s.description.as_str()))
            .collect()
    }

    /// Look up a skill by name
    pub fn lookup(&self, name: &str) -> Result<&SkillDefinition, SkillError> {
        self.skills
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| SkillError::NotFound {
                name: name.to_string(),
            })
    }

    /// Check whether a skill is registered
    pub fn contains(&self, name: &str) -> bool {
        self.skills.iter().any(|s| s.name == name)
    }

    /// Iterate over definitions in registry order
    pub fn iter(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.skills.iter()
    }

    /// Skill names in registry order
    pub fn names(&self) -> Vec<&str> {
        self.skills.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

/// Builder for [`SkillRegistry`]; validation happens in [`build`](Self::build).
#[derive(Debug, Default)]
pub struct SkillRegistryBuilder {
    skills: Vec<SkillDefinition>,
}

impl SkillRegistryBuilder {
    /// Add a skill by name and description
    pub fn skill(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.skills.push(SkillDefinition::new(name, description));
        self
    }

    /// Add a builtin skill
    pub fn builtin(mut self, skill: BuiltinSkill) -> Self {
        self.skills.push(skill.definition());
        self
    }

    /// Add an already constructed definition
    pub fn definition(mut self, definition: SkillDefinition) -> Self {
        self.skills.push(definition);
        self
    }

    /// Build the registry, rejecting invalid or duplicate names
    pub fn build(self) -> Result<SkillRegistry, SkillError> {
        let mut skills: Vec<SkillDefinition> = Vec::with_capacity(self.skills.len());
        for skill in self.skills {
            if !is_valid_skill_name(&skill.name) {
                return Err(SkillError::InvalidName(skill.name));
            }
            if skills.iter().any(|s| s.name == skill.name) {
                return Err(SkillError::AlreadyRegistered(skill.name));
            }
            skills.push(skill);
        }
        Ok(SkillRegistry { skills })
    }
}
