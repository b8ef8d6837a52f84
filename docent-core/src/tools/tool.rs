//! Tool trait and metadata definitions
//!
//! Tools are callables the model can invoke by name. Each tool declares its
//! description and parameter schema so it can be advertised in a
//! [`ModelRequest`](crate::llm::ModelRequest).

use super::result::ToolError;
use crate::llm::ToolDefinition;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool metadata for LLM-friendly discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolMetadata {
    /// Tool name (unique identifier)
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// When should the LLM use this tool?
    pub usage_hints: Vec<String>,
}

impl ToolMetadata {
    /// Create new metadata with required fields
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            usage_hints: Vec::new(),
        }
    }

    /// Add a usage hint
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.usage_hints.push(hint.into());
        self
    }

    /// Description followed by each usage hint as its own paragraph
    pub fn model_description(&self) -> String {
        let mut text = self.description.clone();
        for hint in &self.usage_hints {
            text.push_str("\n\n");
            text.push_str(hint);
        }
        text
    }
}

/// JSON Schema for tool parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// JSON Schema for input parameters
    pub parameters: Value,
}

impl ToolSchema {
    /// Create a schema from a JSON Schema value
    pub fn new(parameters: Value) -> Self {
        Self { parameters }
    }

    /// Create an empty schema (tool takes no parameters)
    pub fn empty() -> Self {
        Self {
            parameters: serde_json::json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        }
    }
}

/// Core tool trait
///
/// `execute` returns the text that becomes the tool-result message. Errors are
/// rendered to text by the registry, so a failing tool never aborts a turn.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get tool metadata
    fn metadata(&self) -> &ToolMetadata;

    /// Get tool name (convenience method)
    fn name(&self) -> &str {
        &self.metadata().name
    }

    /// Get tool description (convenience method)
    fn description(&self) -> &str {
        &self.metadata().description
    }

    /// Get the JSON schema for this tool's parameters
    fn schema(&self) -> ToolSchema;

    /// Definition advertised to the model
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.metadata().model_description(),
            parameters: self.schema().parameters,
        }
    }

    /// Execute the tool with the arguments the model supplied
    async fn execute(&self, args: Value) -> Result<String, ToolError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_description_appends_hints() {
        let metadata = ToolMetadata::new("echo", "Echoes input back.")
            .with_hint("Use to test tool execution.")
            .with_hint("Never use in production.");

        assert_eq!(
            metadata.model_description(),
            "Echoes input back.\n\nUse to test tool execution.\n\nNever use in production."
        );
    }

    #[test]
    fn test_empty_schema() {
        let schema = ToolSchema::empty();
        assert_eq!(schema.parameters["type"], "object");
        assert_eq!(schema.parameters["additionalProperties"], false);
    }
}
