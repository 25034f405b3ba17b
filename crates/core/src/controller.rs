//! Agent controller - main execution loop.

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::conversation::{Block, Message, ModelTurn, ToolSpec};
use crate::event::{Action, Event, Observation};
use crate::state::State;
use crate::stream::EventStream;
use crate::Error;

/// Maximum number of model round-trips before forcing termination.
const MAX_ITERATIONS: u32 = 25;

/// Trait for hosted model integration.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Send the conversation and registered tools, get back one turn.
    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<ModelTurn, Error>;
}

/// Trait for executing actions in the environment.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Execute an action and return the observation.
    async fn execute(&self, action: &Action) -> Result<Observation, Error>;
}

/// The main agent controller.
///
/// Drives one console prompt to completion: dispatch to the model, execute
/// any requested tool calls, feed results back, repeat until the model
/// answers with plain text. Constructed fresh for every prompt.
pub struct AgentController<B, E> {
    pub state: State,
    pub stream: EventStream,
    backend: B,
    executor: E,
    system_prompt: String,
    tools: Vec<ToolSpec>,
}

impl<B, E> AgentController<B, E>
where
    B: ModelBackend,
    E: ActionExecutor,
{
    pub fn new(
        backend: B,
        executor: E,
        system_prompt: impl Into<String>,
        tools: Vec<ToolSpec>,
    ) -> Self {
        Self {
            state: State::new(),
            stream: EventStream::new(),
            backend,
            executor,
            system_prompt: system_prompt.into(),
            tools,
        }
    }

    /// Run the agent loop for one user prompt and return the final text.
    pub async fn run(&mut self, input: &str) -> Result<String, Error> {
        info!("Starting agent exchange");
        self.state.set_dispatched();

        let user_event = Event::message("user", input);
        self.state.add_event(user_event.clone());
        self.stream.add_event(user_event).await;

        let mut messages = vec![Message::user_text(input)];
        let mut iterations = 0;

        while iterations < MAX_ITERATIONS {
            iterations += 1;
            debug!(iteration = iterations, "Agent iteration");

            let turn = match self
                .backend
                .complete(&self.system_prompt, &messages, &self.tools)
                .await
            {
                Ok(t) => t,
                Err(e) => {
                    error!(error = %e, "Model API error");
                    self.state.set_error(format!("Model API error: {e}"));
                    return Err(e);
                }
            };

            if let Some(usage) = turn.usage {
                self.state.record_api_call(usage.total());
            } else {
                self.state.record_api_call(0);
            }

            let text = turn.text();
            if !text.is_empty() {
                let event = Event::message("assistant", &text);
                self.state.add_event(event.clone());
                self.stream.add_event(event).await;
            }

            let tool_uses: Vec<(String, String, serde_json::Value)> = turn
                .tool_uses()
                .into_iter()
                .map(|(id, name, input)| (id.to_string(), name.to_string(), input.clone()))
                .collect();

            messages.push(Message::assistant(turn.blocks.clone()));

            // No tool calls requested: the turn's text is the final answer.
            if tool_uses.is_empty() {
                info!(iterations, "Agent finished");
                self.state.set_finished(text.clone());
                return Ok(text);
            }

            self.state.set_tool_executing();

            // Execute sequentially, in the order the model listed them.
            let mut results = Vec::with_capacity(tool_uses.len());
            for (id, name, input) in tool_uses {
                let observation = self.dispatch(&name, &input).await;

                let is_error = observation.is_error();
                let content = observation.render();

                let obs_event = Event::observation(observation);
                self.state.add_event(obs_event.clone());
                self.stream.add_event(obs_event).await;

                results.push(Block::ToolResult {
                    tool_use_id: id,
                    content,
                    is_error,
                });
            }

            messages.push(Message::tool_results(results));
            self.state.set_dispatched();
        }

        let err = format!("Max iterations ({MAX_ITERATIONS}) exceeded");
        error!("{}", err);
        self.state.set_error(&err);
        Err(Error::MaxIterations)
    }

    /// Parse and execute one tool call, converting every failure into an
    /// error observation the model can read.
    async fn dispatch(&mut self, name: &str, input: &serde_json::Value) -> Observation {
        let action = match parse_action(name, input) {
            Ok(a) => a,
            Err(e) => {
                warn!(error = %e, tool = %name, "Failed to parse tool call");
                return Observation::Error {
                    message: format!("Invalid tool call: {e}"),
                };
            }
        };

        debug!(tool = %name, "Tool use requested");
        self.state.record_tool_call();

        let action_event = Event::action(action.clone());
        self.state.add_event(action_event.clone());
        self.stream.add_event(action_event).await;

        match self.executor.execute(&action).await {
            Ok(obs) => obs,
            Err(e) => {
                error!(error = %e, "Action execution error");
                Observation::Error {
                    message: format!("Execution error: {e}"),
                }
            }
        }
    }
}

/// Closed mapping from tool name and JSON input to a typed action.
///
/// Inputs are validated here, before anything executes; an unknown name or
/// missing field never reaches the executor.
pub fn parse_action(name: &str, input: &serde_json::Value) -> Result<Action, Error> {
    match name {
        "run_command_in_directory" => {
            let directory = require_str(input, "directory")?;
            let command = require_str(input, "command")?;
            Ok(Action::RunCommand {
                directory: directory.into(),
                command: command.into(),
            })
        }
        "get_issue_from_git_branch" => {
            let branch = require_str(input, "branch_name")?;
            Ok(Action::IssueFromBranch {
                branch: branch.into(),
            })
        }
        "jira_cli_commands" => Ok(Action::JiraCliCommands),
        "get_project_directory" => Ok(Action::ProjectDirectory),
        "get_jira_cli_update_description_command" => {
            let issue_key = require_str(input, "issue_key")?;
            let new_description = require_str(input, "new_description")?;
            Ok(Action::UpdateDescriptionCommand {
                issue_key: issue_key.into(),
                new_description: new_description.into(),
            })
        }
        _ => Err(Error::UnknownTool(name.into())),
    }
}

fn require_str<'a>(input: &'a serde_json::Value, field: &str) -> Result<&'a str, Error> {
    input
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::InvalidToolInput(format!("missing {field}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::StopReason;
    use std::sync::Mutex;

    struct MockBackend {
        turns: Mutex<Vec<ModelTurn>>,
    }

    impl MockBackend {
        fn new(mut turns: Vec<ModelTurn>) -> Self {
            turns.reverse();
            Self {
                turns: Mutex::new(turns),
            }
        }
    }

    #[async_trait]
    impl ModelBackend for MockBackend {
        async fn complete(
            &self,
            _system: &str,
            _messages: &[Message],
            _tools: &[ToolSpec],
        ) -> Result<ModelTurn, Error> {
            self.turns
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| Error::ModelApi("no more turns".into()))
        }
    }

    struct MockExecutor;

    #[async_trait]
    impl ActionExecutor for MockExecutor {
        async fn execute(&self, action: &Action) -> Result<Observation, Error> {
            match action {
                Action::IssueFromBranch { branch } => Ok(Observation::IssueKey {
                    key: branch.split('-').take(2).collect::<Vec<_>>().join("-"),
                }),
                Action::ProjectDirectory => Ok(Observation::Directory {
                    path: "/repo".into(),
                }),
                _ => Ok(Observation::Error {
                    message: "not implemented".into(),
                }),
            }
        }
    }

    fn text_turn(text: &str) -> ModelTurn {
        ModelTurn {
            blocks: vec![Block::Text { text: text.into() }],
            stop_reason: StopReason::EndTurn,
            usage: None,
        }
    }

    fn tool_turn(id: &str, name: &str, input: serde_json::Value) -> ModelTurn {
        ModelTurn {
            blocks: vec![Block::ToolUse {
                id: id.into(),
                name: name.into(),
                input,
            }],
            stop_reason: StopReason::ToolUse,
            usage: None,
        }
    }

    #[test]
    fn test_parse_action() {
        let input = serde_json::json!({"branch_name": "PROJ-123-fix-login"});
        let action = parse_action("get_issue_from_git_branch", &input).unwrap();
        assert!(matches!(action, Action::IssueFromBranch { branch } if branch == "PROJ-123-fix-login"));
    }

    #[test]
    fn test_parse_action_missing_field() {
        let input = serde_json::json!({});
        let err = parse_action("run_command_in_directory", &input).unwrap_err();
        assert!(matches!(err, Error::InvalidToolInput(_)));
    }

    #[test]
    fn test_parse_action_unknown_tool() {
        let err = parse_action("delete_everything", &serde_json::json!({})).unwrap_err();
        assert!(matches!(err, Error::UnknownTool(_)));
    }

    #[tokio::test]
    async fn test_run_plain_answer() {
        let backend = MockBackend::new(vec![text_turn("Nothing to sync.")]);
        let mut controller =
            AgentController::new(backend, MockExecutor, "sync git and jira", vec![]);

        let answer = controller.run("status?").await.unwrap();
        assert_eq!(answer, "Nothing to sync.");
        assert!(controller.state.is_finished());
        assert_eq!(controller.state.metrics.api_calls, 1);
        assert_eq!(controller.state.metrics.tool_calls, 0);
    }

    #[tokio::test]
    async fn test_run_with_tool_call() {
        let backend = MockBackend::new(vec![
            tool_turn(
                "tu_1",
                "get_issue_from_git_branch",
                serde_json::json!({"branch_name": "PROJ-123-fix-login"}),
            ),
            text_turn("The issue key is PROJ-123."),
        ]);
        let mut controller =
            AgentController::new(backend, MockExecutor, "sync git and jira", vec![]);

        let answer = controller.run("what issue is this branch?").await.unwrap();
        assert_eq!(answer, "The issue key is PROJ-123.");
        assert_eq!(controller.state.metrics.api_calls, 2);
        assert_eq!(controller.state.metrics.tool_calls, 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_becomes_error_observation() {
        let backend = MockBackend::new(vec![
            tool_turn("tu_1", "nonexistent_tool", serde_json::json!({})),
            text_turn("I could not do that."),
        ]);
        let mut controller =
            AgentController::new(backend, MockExecutor, "sync git and jira", vec![]);

        // The invalid call is fed back as an error observation, not a crash.
        let answer = controller.run("do something odd").await.unwrap();
        assert_eq!(answer, "I could not do that.");
        // Parse failures are not counted as executed tool calls.
        assert_eq!(controller.state.metrics.tool_calls, 0);
    }

    #[tokio::test]
    async fn test_backend_error_is_fatal() {
        let backend = MockBackend::new(vec![]);
        let mut controller =
            AgentController::new(backend, MockExecutor, "sync git and jira", vec![]);

        let err = controller.run("hello").await.unwrap_err();
        assert!(matches!(err, Error::ModelApi(_)));
        assert!(controller.state.error.is_some());
    }

    #[tokio::test]
    async fn test_max_iterations() {
        // A backend that always asks for another tool call never converges.
        let turns: Vec<ModelTurn> = (0..30)
            .map(|i| {
                tool_turn(
                    &format!("tu_{i}"),
                    "get_project_directory",
                    serde_json::json!({}),
                )
            })
            .collect();
        let backend = MockBackend::new(turns);
        let mut controller =
            AgentController::new(backend, MockExecutor, "sync git and jira", vec![]);

        let err = controller.run("loop forever").await.unwrap_err();
        assert!(matches!(err, Error::MaxIterations));
    }
}
