//! Agent state management.
//!
//! One `State` covers a single console prompt/response exchange. Nothing
//! here survives to the next prompt; the agent is stateless across
//! exchanges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Current state of the agent within one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    /// Awaiting console input.
    Idle,
    /// User text has been sent to the model.
    Dispatched,
    /// One or more tool calls are executing.
    ToolExecuting,
    /// The model produced its final text.
    Finished,
    /// The exchange failed.
    Error,
}

impl Default for AgentState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Metrics for one agent exchange.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metrics {
    /// When the exchange started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the exchange finished.
    pub finished_at: Option<DateTime<Utc>>,
    /// Number of model API calls made.
    pub api_calls: u32,
    /// Total tokens used (input + output).
    pub total_tokens: u64,
    /// Number of tool calls executed.
    pub tool_calls: u32,
    /// Number of errors encountered.
    pub errors: u32,
}

impl Metrics {
    pub fn start(&mut self) {
        self.started_at = Some(Utc::now());
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn duration_secs(&self) -> Option<f64> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds() as f64 / 1000.0),
            _ => None,
        }
    }
}

/// Complete state of one prompt/response exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    /// Current agent state.
    pub agent_state: AgentState,
    /// Event history for this exchange.
    pub history: Vec<Event>,
    /// Execution metrics.
    pub metrics: Metrics,
    /// Final answer text (if finished).
    pub answer: Option<String>,
    /// Error message (if in error state).
    pub error: Option<String>,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    pub fn new() -> Self {
        Self {
            agent_state: AgentState::Idle,
            history: Vec::new(),
            metrics: Metrics::default(),
            answer: None,
            error: None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(
            self.agent_state,
            AgentState::Dispatched | AgentState::ToolExecuting
        )
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.agent_state, AgentState::Finished | AgentState::Error)
    }

    pub fn set_dispatched(&mut self) {
        self.agent_state = AgentState::Dispatched;
        if self.metrics.started_at.is_none() {
            self.metrics.start();
        }
    }

    pub fn set_tool_executing(&mut self) {
        self.agent_state = AgentState::ToolExecuting;
    }

    pub fn set_finished(&mut self, answer: impl Into<String>) {
        self.agent_state = AgentState::Finished;
        self.answer = Some(answer.into());
        self.metrics.finish();
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.agent_state = AgentState::Error;
        self.error = Some(message.into());
        self.metrics.errors += 1;
        self.metrics.finish();
    }

    pub fn add_event(&mut self, event: Event) {
        self.history.push(event);
    }

    pub fn record_api_call(&mut self, tokens: u64) {
        self.metrics.api_calls += 1;
        self.metrics.total_tokens += tokens;
    }

    pub fn record_tool_call(&mut self) {
        self.metrics.tool_calls += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let mut state = State::new();
        assert_eq!(state.agent_state, AgentState::Idle);
        assert!(!state.is_active());

        state.set_dispatched();
        assert_eq!(state.agent_state, AgentState::Dispatched);
        assert!(state.is_active());
        assert!(state.metrics.started_at.is_some());

        state.set_tool_executing();
        assert_eq!(state.agent_state, AgentState::ToolExecuting);
        assert!(state.is_active());

        state.set_finished("done");
        assert_eq!(state.agent_state, AgentState::Finished);
        assert!(state.is_finished());
        assert_eq!(state.answer.as_deref(), Some("done"));
    }

    #[test]
    fn test_error_state() {
        let mut state = State::new();
        state.set_dispatched();
        state.set_error("model API error");
        assert_eq!(state.agent_state, AgentState::Error);
        assert!(state.is_finished());
        assert_eq!(state.error.as_deref(), Some("model API error"));
        assert_eq!(state.metrics.errors, 1);
    }

    #[test]
    fn test_metrics() {
        let mut metrics = Metrics::default();
        metrics.start();
        std::thread::sleep(std::time::Duration::from_millis(10));
        metrics.finish();

        let duration = metrics.duration_secs().unwrap();
        assert!(duration >= 0.01);
    }
}
