//! Hosted model backend for the sync agent.
//!
//! Implements `ModelBackend` against the Anthropic Messages API, including
//! tool definitions and tool-result round-trips.

pub mod client;
pub mod model;
pub mod wire;

pub use client::AnthropicClient;
pub use model::Model;
