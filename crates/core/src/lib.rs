//! Core agent loop and types for the Git/Jira sync agent.

pub mod controller;
pub mod conversation;
pub mod event;
pub mod state;
pub mod stream;

pub use controller::{ActionExecutor, AgentController, ModelBackend};
pub use conversation::{Block, Message, ModelTurn, Role, StopReason, ToolSpec, Usage};
pub use event::{Action, Event, EventId, EventPayload, Observation};
pub use state::{AgentState, Metrics, State};
pub use stream::EventStream;

/// Error types for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("model API error: {0}")]
    ModelApi(String),

    #[error("invalid tool input: {0}")]
    InvalidToolInput(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("max iterations exceeded")]
    MaxIterations,
}
