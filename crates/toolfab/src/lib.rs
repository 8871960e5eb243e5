//! toolfab is a demonstration harness for LLM function calling.
//!
//! A user prompt is sent to a hosted chat-completion endpoint together with a
//! catalog of callable tool descriptors. When the model elects to call tools,
//! the harness resolves each requested name against a dispatch table, executes
//! the implementation, feeds the outputs back into the conversation and lets
//! the model continue for a bounded number of rounds.
//!
//! The tools themselves are synthetic: each one issues its own single-turn
//! model call that fabricates a plausible JSON answer instead of querying a
//! real data source.
//!
//! # Architecture
//! - [`chat`] holds the conversation data model and the provider traits
//! - [`provider`] implements the Groq OpenAI-compatible chat endpoint
//! - [`registry`] is the name-to-implementation dispatch table
//! - [`synthetic`] contains the demo tool catalog
//! - [`orchestrator`] drives the bounded tool-calling loop

use serde::{Deserialize, Serialize};

pub mod builder;
pub mod chat;
pub mod error;
pub mod orchestrator;
pub mod outbound;
pub mod provider;
pub mod registry;
pub mod synthetic;

/// A function call the model wants executed on its behalf.
///
/// The `id` is opaque and supplied by the model; it correlates the later
/// tool output with this request.
#[derive(Debug, Deserialize, Serialize, Clone, Eq, PartialEq)]
pub struct ToolCall {
    /// The ID of the tool call.
    pub id: String,
    /// The type of the tool call (always "function" today).
    #[serde(rename = "type")]
    pub call_type: String,
    /// The function to call.
    pub function: FunctionCall,
}

/// Which function to call and with what arguments.
#[derive(Debug, Deserialize, Serialize, Clone, Eq, PartialEq)]
pub struct FunctionCall {
    /// The name of the function to call.
    pub name: String,
    /// The arguments, kept as the raw JSON text the model supplied.
    pub arguments: String,
}

/// The text a tool produced for one call.
///
/// The content is opaque: the harness never validates that it is well-formed
/// JSON, only that it is serializable text.
#[derive(Debug, Deserialize, Serialize, Clone, Eq, PartialEq)]
pub struct ToolOutput {
    /// The `ToolCall::id` this output answers.
    pub call_id: String,
    /// The raw text the tool returned.
    pub content: String,
}

/// Token accounting reported by the provider.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Default)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}
