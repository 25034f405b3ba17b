//! Anthropic Messages API client.
//!
//! One blocking-on-await HTTP call per model turn. There is no retry,
//! backoff, or timeout here: a failed call ends the current exchange.

use async_trait::async_trait;
use tracing::{debug, info};

use branchsync_core::{Error, Message, ModelBackend, ModelTurn, ToolSpec};

use crate::model::Model;
use crate::wire::{ApiMessage, ApiRequest, ApiResponse, ApiTool};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: usize = 4096;

/// Client for the hosted messages endpoint.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    model: Model,
    max_tokens: usize,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, model: Model) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Set max tokens for responses.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl ModelBackend for AnthropicClient {
    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<ModelTurn, Error> {
        let request = ApiRequest {
            model: self.model.api_name().into(),
            max_tokens: self.max_tokens,
            system: system.into(),
            messages: messages.iter().map(ApiMessage::from).collect(),
            tools: tools.iter().map(ApiTool::from).collect(),
        };

        debug!(
            model = %self.model,
            messages = messages.len(),
            tools = tools.len(),
            "Sending messages request"
        );

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::ModelApi(format!("failed to send request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown".to_string());
            return Err(Error::ModelApi(format!("API error {status}: {body}")));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| Error::ModelApi(format!("failed to parse response: {e}")))?;

        let turn = api_response.into_turn();

        if let Some(usage) = turn.usage {
            info!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Model turn complete"
            );
        }

        Ok(turn)
    }
}
