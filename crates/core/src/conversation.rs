//! Conversation types shared between the agent loop and model backends.
//!
//! A conversation is a sequence of messages whose content is a list of
//! blocks: plain text, tool invocations requested by the model, and tool
//! results fed back to it. These mirror the Messages API content format.

use serde::{Deserialize, Serialize};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// A single content block within a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        is_error: bool,
    },
}

/// A message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<Block>,
}

impl Message {
    /// A user message containing plain text.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![Block::Text { text: text.into() }],
        }
    }

    /// An assistant message with the given blocks.
    pub fn assistant(content: Vec<Block>) -> Self {
        Self {
            role: Role::Assistant,
            content,
        }
    }

    /// A user message carrying tool results back to the model.
    pub fn tool_results(results: Vec<Block>) -> Self {
        Self {
            role: Role::User,
            content: results,
        }
    }
}

/// Descriptor for a tool exposed to the model.
///
/// Registered once at startup and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Why the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
    Other(String),
}

/// Token usage for one model call.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl Usage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// One complete model response.
#[derive(Debug, Clone)]
pub struct ModelTurn {
    pub blocks: Vec<Block>,
    pub stop_reason: StopReason,
    pub usage: Option<Usage>,
}

impl ModelTurn {
    /// All text content in this turn, joined with newlines.
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Tool invocations requested in this turn, in model order.
    pub fn tool_uses(&self) -> Vec<(&str, &str, &serde_json::Value)> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::ToolUse { id, name, input } => {
                    Some((id.as_str(), name.as_str(), input))
                }
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_serialization() {
        let block = Block::ToolUse {
            id: "tu_1".into(),
            name: "get_issue_from_git_branch".into(),
            input: serde_json::json!({"branch_name": "PROJ-123-fix-login"}),
        };
        let json = serde_json::to_string(&block).unwrap();
        assert!(json.contains("\"type\":\"tool_use\""));

        let parsed: Block = serde_json::from_str(&json).unwrap();
        assert!(matches!(parsed, Block::ToolUse { name, .. } if name == "get_issue_from_git_branch"));
    }

    #[test]
    fn test_turn_text_and_tool_uses() {
        let turn = ModelTurn {
            blocks: vec![
                Block::Text {
                    text: "Checking the branch.".into(),
                },
                Block::ToolUse {
                    id: "tu_1".into(),
                    name: "get_issue_from_git_branch".into(),
                    input: serde_json::json!({"branch_name": "main"}),
                },
            ],
            stop_reason: StopReason::ToolUse,
            usage: None,
        };

        assert_eq!(turn.text(), "Checking the branch.");
        let uses = turn.tool_uses();
        assert_eq!(uses.len(), 1);
        assert_eq!(uses[0].1, "get_issue_from_git_branch");
    }
}
