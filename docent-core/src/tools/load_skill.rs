//! The `load_skill` tool: pulls a skill's full content into the conversation

use super::result::{ToolError, ToolErrorKind};
use super::tool::{Tool, ToolMetadata, ToolSchema};
use crate::skills::{SkillError, SkillLoader};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Name under which the skill-loading tool is exposed to the model
pub const LOAD_SKILL_TOOL_NAME: &str = "load_skill";

#[derive(Debug, Deserialize)]
struct LoadSkillArgs {
    skill_name: String,
}

/// Tool that resolves a skill name to its full content
pub struct LoadSkillTool {
    metadata: ToolMetadata,
    loader: Arc<SkillLoader>,
}

impl LoadSkillTool {
    pub fn new(loader: Arc<SkillLoader>) -> Self {
        let metadata = ToolMetadata::new(
            LOAD_SKILL_TOOL_NAME,
            "Load the full content of a skill into the agent's context.",
        )
        .with_hint(
            "Use this when you need detailed information about how to handle a specific \
             type of request. This will provide you with comprehensive instructions, \
             policies, and guidelines for the skill area.",
        );

        Self { metadata, loader }
    }

    /// Load `skill_name` and render the result as tool output text.
    ///
    /// Success yields `Loaded skill: {name}` followed by the content; failure
    /// yields an `Error: ...` line. This never fails.
    pub async fn load_skill(&self, skill_name: &str) -> String {
        match self.load(skill_name).await {
            Ok(text) => text,
            Err(err) => err.to_tool_output(),
        }
    }

    async fn load(&self, skill_name: &str) -> Result<String, ToolError> {
        if skill_name.trim().is_empty() {
            return Err(ToolError::validation(format!(
                "Invalid arguments for tool '{}': skill_name must not be empty.",
                LOAD_SKILL_TOOL_NAME
            )));
        }

        match self.loader.load(skill_name).await {
            Ok(content) => Ok(format!("Loaded skill: {}\n\n{}", skill_name, content)),
            Err(SkillError::NotFound { name }) => Err(ToolError::not_found(format!(
                "Skill file '{}.md' not found.",
                name
            ))),
            Err(SkillError::Io { name, message }) => Err(ToolError::new(
                ToolErrorKind::Io,
                format!("Failed to read skill file '{}.md': {}", name, message),
            )),
            Err(other) => Err(ToolError::new(ToolErrorKind::Internal, other.to_string())),
        }
    }

    fn example_names(&self) -> String {
        self.loader
            .registry()
            .names()
            .iter()
            .map(|name| format!("\"{}\"", name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[async_trait]
impl Tool for LoadSkillTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    fn schema(&self) -> ToolSchema {
        let mut description = "The name of the skill to load".to_string();
        if !self.loader.registry().is_empty() {
            description.push_str(&format!(" (e.g., {})", self.example_names()));
        }

        ToolSchema::new(json!({
            "type": "object",
            "properties": {
                "skill_name": {
                    "type": "string",
                    "description": description
                }
            },
            "required": ["skill_name"]
        }))
    }

    async fn execute(&self, args: Value) -> Result<String, ToolError> {
        let args: LoadSkillArgs = serde_json::from_value(args).map_err(|e| {
            ToolError::validation(format!(
                "Invalid arguments for tool '{}': {}. Expected {{\"skill_name\": \"<name>\"}}.",
                LOAD_SKILL_TOOL_NAME, e
            ))
        })?;

        tracing::info!(skill = %args.skill_name, "Model requested skill");
        self.load(&args.skill_name).await
    }
}
