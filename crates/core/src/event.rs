//! Event types for agent communication.
//!
//! Events flow between the agent and environment:
//! - Actions: Agent initiates (run a command, parse a branch, scrape docs)
//! - Observations: Environment responds (command output, issue key, errors)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Actions that the agent can initiate.
///
/// One variant per registered tool; tool-call JSON is validated into a
/// variant before anything executes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Run a shell command in a working directory.
    RunCommand { directory: String, command: String },

    /// Derive a Jira issue key from a Git branch name.
    IssueFromBranch { branch: String },

    /// List example Jira CLI invocations scraped from its README.
    JiraCliCommands,

    /// Report the configured project directory.
    ProjectDirectory,

    /// Build the Jira CLI command that updates an issue description.
    UpdateDescriptionCommand {
        issue_key: String,
        new_description: String,
    },
}

/// Observations from the environment in response to actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Observation {
    /// Captured output from a shell command.
    CommandOutput { stdout: String, stderr: String },

    /// Issue key derived from a branch name.
    IssueKey { key: String },

    /// Example commands scraped from the Jira CLI README.
    CommandList { commands: Vec<String> },

    /// The configured project directory.
    Directory { path: String },

    /// A formatted Jira CLI command string.
    Command { command: String },

    /// An error occurred.
    Error { message: String },
}

impl Observation {
    /// Flatten the observation into the plain text fed back to the model.
    ///
    /// Errors render as text like any other result; the model sees no
    /// separate failure signal.
    pub fn render(&self) -> String {
        match self {
            Observation::CommandOutput { stdout, stderr } => {
                format!("stdout:\n{stdout}\nstderr:\n{stderr}")
            }
            Observation::IssueKey { key } => key.clone(),
            Observation::CommandList { commands } => commands.join("\n"),
            Observation::Directory { path } => path.clone(),
            Observation::Command { command } => command.clone(),
            Observation::Error { message } => message.clone(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Observation::Error { .. })
    }
}

/// A timestamped event in the agent's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: DateTime<Utc>,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(payload: EventPayload) -> Self {
        Self {
            id: EventId::new(),
            timestamp: Utc::now(),
            payload,
        }
    }

    pub fn action(action: Action) -> Self {
        Self::new(EventPayload::Action(action))
    }

    pub fn observation(observation: Observation) -> Self {
        Self::new(EventPayload::Observation(observation))
    }

    pub fn message(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(EventPayload::Message {
            role: role.into(),
            content: content.into(),
        })
    }
}

/// The payload of an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    /// An action initiated by the agent.
    Action(Action),

    /// An observation from the environment.
    Observation(Observation),

    /// A message (user or assistant).
    Message { role: String, content: String },
}
