//! Branchsync CLI
//!
//! Interactive agent that keeps Git branch names and Jira issues in sync
//! by driving the `jira` CLI through a tool-calling model loop.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use branchsync_core::{Action, AgentController, Event, EventPayload, Observation};
use branchsync_llm::{AnthropicClient, Model};
use branchsync_tools::readme::DEFAULT_CACHE_FILE;
use branchsync_tools::{tool_specs, ReadmeScraper, SyncToolExecutor, SYSTEM_PROMPT};

#[derive(Parser)]
#[command(name = "branchsync")]
#[command(about = "Agent that keeps Git branch names and Jira issues in sync")]
struct Cli {
    /// Model to use: opus, sonnet, or haiku
    #[arg(long, default_value = "sonnet")]
    model: Model,

    /// Maximum tokens per model response
    #[arg(long, default_value = "4096")]
    max_tokens: usize,

    /// Project directory reported to the model
    #[arg(long, default_value = ".")]
    project_dir: String,

    /// README cache file path
    #[arg(long, default_value = DEFAULT_CACHE_FILE)]
    cache_file: String,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive prompt loop (default)
    Repl,

    /// Print the example Jira CLI commands scraped from its README
    Commands,

    /// Print the heuristic issue key for a branch name
    Issue {
        /// Git branch name
        branch: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match &cli.command {
        Some(Commands::Issue { branch }) => {
            println!("{}", branchsync_tools::branch::issue_key_from_branch(branch));
            Ok(())
        }

        Some(Commands::Commands) => {
            let scraper = ReadmeScraper::new(&cli.cache_file);
            let commands = scraper
                .example_commands()
                .await
                .context("Failed to scrape Jira CLI README")?;
            for command in commands {
                println!("{command}");
            }
            Ok(())
        }

        Some(Commands::Repl) | None => repl(&cli).await,
    }
}

/// The read-eval loop: one independent agent exchange per console line.
async fn repl(cli: &Cli) -> Result<()> {
    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
        print!("Prompt: ");
        std::io::stdout().flush()?;

        line.clear();
        let bytes_read = stdin.lock().read_line(&mut line)?;
        if bytes_read == 0 {
            // EOF on stdin; nothing left to read.
            return Ok(());
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        // Fresh controller per prompt: no conversation memory carries over.
        let backend =
            AnthropicClient::new(cli.api_key.as_str(), cli.model).with_max_tokens(cli.max_tokens);
        let scraper = ReadmeScraper::new(&cli.cache_file);
        let executor = SyncToolExecutor::new(&cli.project_dir, scraper);

        let mut controller =
            AgentController::new(backend, executor, SYSTEM_PROMPT, tool_specs());

        let mut events = controller.stream.subscribe("console");
        let printer = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                print_event(&event);
            }
        });

        let result = controller.run(input).await;

        // Dropping the controller closes the stream so the printer drains
        // and exits before the final answer is shown.
        drop(controller);
        let _ = printer.await;

        match result {
            Ok(answer) => {
                if answer.is_empty() {
                    println!("(no answer)");
                } else {
                    println!("{answer}");
                }
            }
            Err(e) => eprintln!("error: {e}"),
        }
    }
}

/// Render one agent event for the console.
fn print_event(event: &Event) {
    match &event.payload {
        EventPayload::Message { role, content } if role == "assistant" => {
            println!("> {content}");
        }
        EventPayload::Message { .. } => {}

        EventPayload::Action(action) => match action {
            Action::RunCommand { directory, command } => {
                println!("[tool] run_command_in_directory {directory}: {command}");
            }
            Action::IssueFromBranch { branch } => {
                println!("[tool] get_issue_from_git_branch {branch}");
            }
            Action::JiraCliCommands => println!("[tool] jira_cli_commands"),
            Action::ProjectDirectory => println!("[tool] get_project_directory"),
            Action::UpdateDescriptionCommand { issue_key, .. } => {
                println!("[tool] get_jira_cli_update_description_command {issue_key}");
            }
        },

        EventPayload::Observation(observation) => {
            let rendered = observation.render();
            let preview: String = rendered.chars().take(200).collect();
            if observation.is_error() {
                println!("[tool error] {preview}");
            } else if matches!(observation, Observation::CommandOutput { .. }) {
                println!("[output] {preview}");
            } else {
                println!("[result] {preview}");
            }
        }
    }
}
