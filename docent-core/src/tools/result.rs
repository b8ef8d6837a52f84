//! Tool error model
//!
//! Tool failures are part of the conversation, not process faults: the
//! registry renders every [`ToolError`] to text the model can react to.

/// Error taxonomy for tool execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    /// Arguments missing or of the wrong shape (the model should fix its call)
    Validation,

    /// Requested resource does not exist
    NotFound,

    /// No tool with the requested name is registered
    UnknownTool,

    /// Backing store failed
    Io,

    /// Internal tool error
    Internal,
}

/// Structured tool error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ToolError {
    /// Error kind
    pub kind: ToolErrorKind,

    /// Human-readable error message, shown to the model
    pub message: String,
}

impl ToolError {
    /// Create a new tool error
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, message)
    }

    pub fn unknown_tool(name: &str) -> Self {
        Self::new(ToolErrorKind::UnknownTool, format!("Unknown tool '{}'.", name))
    }

    /// Text of the tool-result message reporting this error
    pub fn to_tool_output(&self) -> String {
        format!("Error: {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_output_prefix() {
        let err = ToolError::not_found("Skill file 'x.md' not found.");
        assert_eq!(err.to_tool_output(), "Error: Skill file 'x.md' not found.");
        assert_eq!(err.kind, ToolErrorKind::NotFound);
    }

    #[test]
    fn test_unknown_tool_message() {
        let err = ToolError::unknown_tool("drop_tables");
        assert_eq!(err.to_tool_output(), "Error: Unknown tool 'drop_tables'.");
    }
}
