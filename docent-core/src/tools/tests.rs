//! Integration tests for the tools module

use super::*;
use crate::llm::{MessageRole, ToolCall};
use crate::skills::{InMemorySkillStore, SkillLoader, SkillRegistry};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

/// A simple echo tool for testing
struct EchoTool {
    metadata: ToolMetadata,
}

impl EchoTool {
    fn new() -> Self {
        Self {
            metadata: ToolMetadata::new("echo", "Echoes input back")
                .with_hint("Use to test tool execution"),
        }
    }
}

#[async_trait]
impl Tool for EchoTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(json!({
            "type": "object",
            "properties": {
                "message": { "type": "string" }
            },
            "required": ["message"]
        }))
    }

    async fn execute(&self, args: Value) -> Result<String, ToolError> {
        args.get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ToolError::validation("message is required"))
    }
}

fn load_skill_tool() -> LoadSkillTool {
    let store = InMemorySkillStore::new()
        .with_skill("sales_analytics", "SCHEMA X")
        .with_skill("inventory_management", "TABLE inventory(sku, qty)");
    let loader = SkillLoader::new(Arc::new(SkillRegistry::builtin()), Arc::new(store));
    LoadSkillTool::new(Arc::new(loader))
}

fn registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(load_skill_tool())).unwrap();
    registry.register(Arc::new(EchoTool::new())).unwrap();
    registry
}

#[tokio::test]
async fn test_load_skill_success_format() {
    let tool = load_skill_tool();
    assert_eq!(
        tool.load_skill("sales_analytics").await,
        "Loaded skill: sales_analytics\n\nSCHEMA X"
    );
}

#[tokio::test]
async fn test_load_skill_unknown_name() {
    let tool = load_skill_tool();
    let output = tool.load_skill("nonexistent").await;
    assert_eq!(output, "Error: Skill file 'nonexistent.md' not found.");
}

#[tokio::test]
async fn test_load_skill_empty_name_is_validation_error() {
    let tool = load_skill_tool();
    let err = tool.execute(json!({"skill_name": "  "})).await.unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::Validation);
}

#[tokio::test]
async fn test_load_skill_malformed_arguments() {
    let tool = load_skill_tool();

    for args in [
        json!({}),
        json!({"skill_name": 42}),
        json!({"name": "sales_analytics"}),
        Value::Null,
    ] {
        let err = tool.execute(args.clone()).await.unwrap_err();
        assert_eq!(err.kind, ToolErrorKind::Validation, "{}", args);
        assert!(
            err.to_tool_output()
                .starts_with("Error: Invalid arguments for tool 'load_skill'")
        );
    }
}

#[test]
fn test_load_skill_definition() {
    let definition = load_skill_tool().definition();
    assert_eq!(definition.name, LOAD_SKILL_TOOL_NAME);
    assert!(definition.description.starts_with("Load the full content of a skill"));
    assert_eq!(definition.parameters["required"], json!(["skill_name"]));
    assert_eq!(definition.parameters["properties"]["skill_name"]["type"], "string");

    let param_description = definition.parameters["properties"]["skill_name"]["description"]
        .as_str()
        .unwrap();
    assert!(param_description.contains("\"sales_analytics\", \"inventory_management\""));
}

#[test]
fn test_registry_rejects_duplicates() {
    let mut registry = registry();
    let err = registry.register(Arc::new(EchoTool::new())).unwrap_err();
    assert_eq!(err, RegistryError::DuplicateTool("echo".to_string()));
    assert_eq!(registry.names(), vec!["load_skill", "echo"]);
}

#[test]
fn test_registry_definitions_in_order() {
    let definitions = registry().definitions();
    let names: Vec<_> = definitions.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["load_skill", "echo"]);
}

#[tokio::test]
async fn test_dispatch_success_references_call() {
    let registry = registry();
    let call = ToolCall::new("call_7", "load_skill", json!({"skill_name": "inventory_management"}));

    let message = registry.dispatch(&call).await;
    assert_eq!(message.role, MessageRole::Tool);
    assert_eq!(message.tool_call_id.as_deref(), Some("call_7"));
    assert_eq!(
        message.content,
        "Loaded skill: inventory_management\n\nTABLE inventory(sku, qty)"
    );
}

#[tokio::test]
async fn test_dispatch_unknown_tool() {
    let registry = registry();
    let call = ToolCall::new("call_1", "drop_tables", json!({}));

    let message = registry.dispatch(&call).await;
    assert_eq!(message.content, "Error: Unknown tool 'drop_tables'.");
    assert_eq!(message.tool_call_id.as_deref(), Some("call_1"));
}

#[tokio::test]
async fn test_dispatch_tool_error_becomes_text() {
    let registry = registry();
    let call = ToolCall::new("call_2", "echo", json!({"text": "wrong key"}));

    let message = registry.dispatch(&call).await;
    assert_eq!(message.content, "Error: message is required");
}
