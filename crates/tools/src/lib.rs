//! Tools the model can invoke, and their executor.
//!
//! Each tool is a small, single-purpose function: parse a branch name, run
//! a shell command, scrape the Jira CLI README for example commands, or
//! format a fixed Jira CLI invocation. `SyncToolExecutor` wires them to
//! the agent loop; `registry` declares them to the model.

pub mod branch;
pub mod executor;
pub mod jira;
pub mod readme;
pub mod registry;
pub mod shell;

pub use executor::SyncToolExecutor;
pub use readme::{HttpFetcher, PageFetcher, ReadmeScraper};
pub use registry::{tool_specs, SYSTEM_PROMPT};

/// Error types for tool execution.
///
/// These never abort the agent loop; the executor renders them into text
/// the model reads as an ordinary tool result.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP Error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP Error: status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("Error: {0}")]
    Io(#[from] std::io::Error),
}
