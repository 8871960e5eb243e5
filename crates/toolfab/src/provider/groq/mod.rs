//! Groq API client for chat completions with function calling.
//!
//! Groq exposes an OpenAI-compatible endpoint, so the wire types in [`api`]
//! follow the chat/completions schema.

use async_trait::async_trait;
use http::{Request, Response};
use url::Url;

use crate::{
    chat::{ChatMessage, ChatProvider, ChatResponse, Tool, ToolChoice, http::HTTPChatProvider},
    error::HarnessError,
    outbound::call_outbound,
};

pub mod api;

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "GROQ_API_KEY";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Client configuration for Groq's chat API.
///
/// This is a cheap value type: the HTTP connection pool lives in
/// [`crate::outbound`], so cloning a `Groq` to give one tool its own sampling
/// settings costs a few string copies.
#[derive(Debug, Clone)]
pub struct Groq {
    pub api_key: String,
    pub base_url: Url,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub tool_choice: Option<ToolChoice>,
}

impl Groq {
    pub fn default_base_url() -> Url {
        Url::parse("https://api.groq.com/openai/v1/").unwrap()
    }

    /// Creates a client, failing fast on a missing credential so no request
    /// is ever attempted without one.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, HarnessError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(HarnessError::AuthError("Missing Groq API key".to_string()));
        }
        Ok(Self {
            api_key,
            base_url: Self::default_base_url(),
            model: model.into(),
            max_tokens: None,
            temperature: None,
            tool_choice: None,
        })
    }

    /// Resolves the credential from `GROQ_API_KEY` at startup.
    pub fn from_env() -> Result<Self, HarnessError> {
        match std::env::var(API_KEY_VAR) {
            Ok(key) if !key.is_empty() => Self::new(key, DEFAULT_MODEL),
            _ => Err(HarnessError::AuthError(format!(
                "{API_KEY_VAR} is not set"
            ))),
        }
    }

    /// Returns the same client with different sampling settings.
    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = Some(temperature);
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }
}

impl HTTPChatProvider for Groq {
    fn chat_request(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> Result<Request<Vec<u8>>, HarnessError> {
        api::groq_chat_request(self, messages, tools)
    }

    fn parse_chat(&self, response: Response<Vec<u8>>) -> Result<Box<dyn ChatResponse>, HarnessError> {
        api::groq_parse_chat(response)
    }
}

#[async_trait]
impl ChatProvider for Groq {
    async fn chat_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> Result<Box<dyn ChatResponse>, HarnessError> {
        let request = self.chat_request(messages, tools)?;
        let response = call_outbound(request).await?;
        self.parse_chat(response)
    }
}
