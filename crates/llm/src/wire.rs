//! Messages API wire format.
//!
//! Request and response types for `POST /v1/messages`, plus conversions
//! to and from the core conversation types.

use serde::{Deserialize, Serialize};

use branchsync_core::{Block, Message, ModelTurn, Role, StopReason, ToolSpec, Usage};

/// Request body for a messages call.
#[derive(Debug, Clone, Serialize)]
pub struct ApiRequest {
    pub model: String,
    pub max_tokens: usize,
    pub system: String,
    pub messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ApiTool>,
}

/// A message on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub role: String,
    pub content: Vec<ApiBlock>,
}

/// Content block on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ApiBlock {
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
        #[serde(default)]
        is_error: bool,
    },
}

/// Tool definition on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ApiTool {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Response body from a messages call.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    #[allow(dead_code)]
    pub id: String,
    pub content: Vec<ApiBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Option<ApiUsage>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ApiUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

impl From<&Block> for ApiBlock {
    fn from(block: &Block) -> Self {
        match block {
            Block::Text { text } => ApiBlock::Text { text: text.clone() },
            Block::ToolUse { id, name, input } => ApiBlock::ToolUse {
                id: id.clone(),
                name: name.clone(),
                input: input.clone(),
            },
            Block::ToolResult {
                tool_use_id,
                content,
                is_error,
            } => ApiBlock::ToolResult {
                tool_use_id: tool_use_id.clone(),
                content: content.clone(),
                is_error: *is_error,
            },
        }
    }
}

impl From<ApiBlock> for Block {
    fn from(block: ApiBlock) -> Self {
        match block {
            ApiBlock::Text { text } => Block::Text { text },
            ApiBlock::ToolUse { id, name, input } => Block::ToolUse { id, name, input },
            ApiBlock::ToolResult {
                tool_use_id,
                content,
                is_error,
            } => Block::ToolResult {
                tool_use_id,
                content,
                is_error,
            },
        }
    }
}

impl From<&Message> for ApiMessage {
    fn from(message: &Message) -> Self {
        let role = match message.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        ApiMessage {
            role: role.into(),
            content: message.content.iter().map(ApiBlock::from).collect(),
        }
    }
}

impl From<&ToolSpec> for ApiTool {
    fn from(spec: &ToolSpec) -> Self {
        ApiTool {
            name: spec.name.clone(),
            description: spec.description.clone(),
            input_schema: spec.input_schema.clone(),
        }
    }
}

impl ApiResponse {
    /// Convert the response into a model turn.
    pub fn into_turn(self) -> ModelTurn {
        let stop_reason = match self.stop_reason.as_deref() {
            Some("end_turn") => StopReason::EndTurn,
            Some("tool_use") => StopReason::ToolUse,
            Some("max_tokens") => StopReason::MaxTokens,
            Some(other) => StopReason::Other(other.into()),
            None => StopReason::EndTurn,
        };

        let usage = self.usage.map(|u| Usage {
            input_tokens: u.input_tokens,
            output_tokens: u.output_tokens,
        });

        ModelTurn {
            blocks: self.content.into_iter().map(Block::from).collect(),
            stop_reason,
            usage,
        }
    }
}
