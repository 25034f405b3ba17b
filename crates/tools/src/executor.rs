//! Action executor wiring the tools to the agent loop.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use branchsync_core::{Action, ActionExecutor, Observation};

use crate::readme::ReadmeScraper;
use crate::{branch, jira, shell};

/// Executes sync-agent actions against the local environment.
///
/// Tool failures never propagate: HTTP and IO errors are rendered into
/// `Observation::Error` text that flows back into the conversation.
pub struct SyncToolExecutor {
    project_dir: PathBuf,
    scraper: ReadmeScraper,
}

impl SyncToolExecutor {
    pub fn new(project_dir: impl Into<PathBuf>, scraper: ReadmeScraper) -> Self {
        Self {
            project_dir: project_dir.into(),
            scraper,
        }
    }
}

#[async_trait]
impl ActionExecutor for SyncToolExecutor {
    async fn execute(&self, action: &Action) -> Result<Observation, branchsync_core::Error> {
        debug!(?action, "Executing action");

        let observation = match action {
            Action::RunCommand { directory, command } => {
                match shell::run_in_directory(directory, command).await {
                    Ok((stdout, stderr)) => Observation::CommandOutput { stdout, stderr },
                    Err(e) => Observation::Error {
                        message: e.to_string(),
                    },
                }
            }

            Action::IssueFromBranch { branch } => Observation::IssueKey {
                key: branch::issue_key_from_branch(branch),
            },

            Action::JiraCliCommands => match self.scraper.example_commands().await {
                Ok(commands) => Observation::CommandList { commands },
                Err(e) => Observation::Error {
                    message: e.to_string(),
                },
            },

            Action::ProjectDirectory => Observation::Directory {
                path: self.project_dir.display().to_string(),
            },

            Action::UpdateDescriptionCommand {
                issue_key,
                new_description,
            } => Observation::Command {
                command: jira::build_description_update_command(issue_key, new_description),
            },
        };

        Ok(observation)
    }
}
