//! Skills: named units of domain knowledge disclosed to the model on demand
//!
//! A skill is advertised in the system prompt by name and one-line description
//! only. The model pulls its full content into the conversation by calling the
//! `load_skill` tool when it decides it needs it.
//!
//! - [`SkillRegistry`]: ordered, validated set of definitions
//! - [`SkillLoader`]: lazy content resolution over a [`SkillContentStore`]
//! - [`augment`]: renders the "Available Skills" block for the system prompt
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use docent_core::skills::{FileSkillStore, SkillLoader, SkillRegistry, augment};
//!
//! # async fn run() -> Result<(), docent_core::skills::SkillError> {
//! let registry = Arc::new(SkillRegistry::builtin());
//! let system = augment("You are a SQL assistant.", &registry);
//!
//! let loader = SkillLoader::new(registry, Arc::new(FileSkillStore::new("skills")));
//! let schema = loader.load("sales_analytics").await?;
//! # Ok(())
//! # }
//! ```

mod frontmatter;
mod loader;
mod prompt;
mod skill;

pub use frontmatter::{SkillFrontmatter, parse_frontmatter};
pub use loader::{CachePolicy, FileSkillStore, InMemorySkillStore, SkillContentStore, SkillLoader};
pub use prompt::{SKILLS_HEADER, SKILLS_INSTRUCTION, augment, format_skill_list, skills_addendum};
pub use skill::{
    BuiltinSkill, SkillDefinition, SkillError, SkillRegistry, SkillRegistryBuilder,
    is_valid_skill_name,
};
