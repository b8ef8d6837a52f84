//! Skill discovery from markdown files with YAML frontmatter
//!
//! A skill file lives at `<dir>/<name>.md` and may start with a frontmatter
//! block naming and describing it:
//!
//! ```markdown
//! ---
//! name: sales_analytics
//! description: Database schema and business logic for sales data analysis.
//! ---
//!
//! # Sales Analytics
//! ...
//! ```
//!
//! Discovery reads only the frontmatter fields. The file itself is handed to
//! the model verbatim when it calls `load_skill`.

use super::{SkillDefinition, SkillError, SkillRegistry, is_valid_skill_name};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Frontmatter fields recognised in a skill file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillFrontmatter {
    /// Skill name, must match the file stem
    pub name: String,
    /// One-line description advertised in the system prompt
    pub description: String,
}

impl SkillFrontmatter {
    /// Validate the frontmatter
    pub fn validate(&self) -> Result<(), SkillError> {
        if !is_valid_skill_name(&self.name) {
            return Err(SkillError::InvalidName(self.name.clone()));
        }

        if self.description.trim().is_empty() {
            return Err(SkillError::InvalidConfig(format!(
                "Skill '{}' has an empty description",
                self.name
            )));
        }

        Ok(())
    }
}

/// Split a skill file into its frontmatter and body.
///
/// Returns `Ok(None)` when the file has no frontmatter at all.
pub fn parse_frontmatter(content: &str) -> Result<Option<(SkillFrontmatter, &str)>, SkillError> {
    let trimmed = content.trim_start();
    let Some(rest) = trimmed.strip_prefix("---") else {
        return Ok(None);
    };

    let end_pos = rest.find("\n---").ok_or_else(|| {
        SkillError::InvalidConfig("Skill frontmatter not properly closed (---)".to_string())
    })?;

    let yaml = &rest[..end_pos];
    let body = rest[end_pos + 4..].trim_start_matches(['\r', '\n']);

    let frontmatter: SkillFrontmatter = serde_yaml::from_str(yaml).map_err(|e| {
        SkillError::InvalidConfig(format!("Failed to parse skill frontmatter: {}", e))
    })?;
    frontmatter.validate()?;

    Ok(Some((frontmatter, body)))
}

impl SkillRegistry {
    /// Build a registry from every `*.md` file in `dir` that carries frontmatter.
    ///
    /// Files are visited in file-name order so the advertised list is stable.
    /// Files without frontmatter are skipped with a warning; a frontmatter
    /// `name` that differs from the file stem is an error, since the loader
    /// derives the file path from the name.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self, SkillError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| {
            SkillError::InvalidConfig(format!(
                "Failed to read skills directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| SkillError::InvalidConfig(format!("Failed to list skills: {}", e)))?
                .path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("md") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut builder = SkillRegistry::builder();
        for path in paths {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                SkillError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
            })?;

            let Some((frontmatter, _body)) = parse_frontmatter(&content)? else {
                tracing::warn!(path = %path.display(), "Skipping skill file without frontmatter");
                continue;
            };

            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            if stem != frontmatter.name {
                return Err(SkillError::InvalidConfig(format!(
                    "Skill '{}' must live in '{}.md', found {}",
                    frontmatter.name,
                    frontmatter.name,
                    path.display()
                )));
            }

            builder = builder.definition(SkillDefinition::new(
                frontmatter.name,
                frontmatter.description,
            ));
        }

        let registry = builder.build()?;
        tracing::debug!(dir = %dir.display(), skills = registry.len(), "Discovered skills");
        Ok(registry)
    }
}
