//! # Docent - Progressive Skill Disclosure for LLM Agents
//!
//! Docent keeps an agent's system prompt small: it advertises a registry of
//! named skills by one-line description only, and gives the model a
//! `load_skill` tool to pull a skill's full content (database schemas,
//! business rules, query patterns) into the conversation when it needs it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docent_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let agent = SkillAgent::from_config(DocentConfig::load()?)?;
//!
//!     let thread = ThreadId::new();
//!     let outcome = agent
//!         .invoke_turn(&thread, "How many SKUs are below their reorder point?")
//!         .await?;
//!     println!("{}", outcome.final_answer.content);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Skills**: registry, lazy loader and the "Available Skills" prompt block
//! - **Middleware**: injects the skills block into every model request
//! - **Tools**: `load_skill` plus any tools you register
//! - **Agent**: drives model calls and tool dispatch for one turn at a time
//! - **Conversation**: per-thread message history

pub mod agent;
pub mod config;
pub mod conversation;
pub mod error;
pub mod llm;
pub mod middleware;
pub mod skills;
pub mod tools;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::agent::{SkillAgent, SkillAgentBuilder, TurnOutcome};
    pub use crate::config::{AgentConfig, DocentConfig, LLMProviderConfig, SkillsConfig};
    pub use crate::conversation::{InMemoryThreadStore, ThreadId, ThreadStore};
    pub use crate::error::{DocentError, Result};
    pub use crate::llm::{
        LLMProvider, LLMProviderFactory, Message, MessageRole, ModelRequest, ModelResponse,
        TokenUsage, ToolCall, ToolDefinition,
    };
    pub use crate::middleware::SkillMiddleware;
    pub use crate::skills::{
        BuiltinSkill, CachePolicy, FileSkillStore, InMemorySkillStore, SkillContentStore,
        SkillDefinition, SkillError, SkillLoader, SkillRegistry, augment,
    };
    pub use crate::tools::{
        LOAD_SKILL_TOOL_NAME, LoadSkillTool, RegistryError, Tool, ToolError, ToolErrorKind,
        ToolMetadata, ToolRegistry, ToolSchema,
    };
}
