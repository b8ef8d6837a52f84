//! Tool system for model-invoked callables
//!
//! Tools are advertised to the model through their [`ToolDefinition`](crate::llm::ToolDefinition)
//! and invoked through [`ToolRegistry::dispatch`], which always produces a
//! tool-result message: failures become `Error: ...` text the model can read
//! and react to, never an error that aborts the turn.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use docent_core::skills::{FileSkillStore, SkillLoader, SkillRegistry};
//! use docent_core::tools::{LoadSkillTool, ToolRegistry};
//!
//! let loader = Arc::new(SkillLoader::new(
//!     Arc::new(SkillRegistry::builtin()),
//!     Arc::new(FileSkillStore::new("skills")),
//! ));
//!
//! let mut registry = ToolRegistry::new();
//! registry.register(Arc::new(LoadSkillTool::new(loader))).unwrap();
//! ```

mod load_skill;
mod registry;
mod result;
mod tool;

pub use load_skill::{LOAD_SKILL_TOOL_NAME, LoadSkillTool};
pub use registry::{RegistryError, ToolRegistry};
pub use result::{ToolError, ToolErrorKind};
pub use tool::{Tool, ToolMetadata, ToolSchema};

#[cfg(test)]
mod tests;
