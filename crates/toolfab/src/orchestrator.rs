//! The bounded tool-calling loop.
//!
//! One `run` owns one conversation: ask the model, execute whatever tools it
//! requested, append the outputs, ask again. The loop ends when the model
//! answers without tool calls or when the round budget is exhausted.

use log::{debug, info, warn};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    ToolCall, ToolOutput,
    chat::{ChatMessage, ChatProvider, MessageType, Tool},
    error::HarnessError,
    registry::{ToolRegistry, error_payload},
};

/// Default number of model rounds per prompt.
pub const DEFAULT_MAX_ROUNDS: usize = 3;

/// Drives the ask-model / run-tools cycle for a single prompt.
///
/// Holds no mutable state; the conversation lives inside one `run` call and
/// is discarded when it returns.
pub struct Orchestrator {
    provider: Arc<dyn ChatProvider>,
    registry: ToolRegistry,
    max_rounds: usize,
}

/// Terminal outcome of a run.
///
/// `NoAnswer` means the round budget ran out before the model produced a
/// final text. It is a recognized outcome, not an error, and is distinct
/// from `Answer(String::new())`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Answer(String),
    NoAnswer,
}

/// One executed tool call, as rendered for a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub call_id: String,
    pub name: String,
    pub arguments: String,
    pub output: String,
}

/// Everything that happened in one request/response exchange with the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    /// Text the assistant produced this round, if any.
    pub assistant_text: Option<String>,
    /// Tools executed this round, in receipt order. Empty on the final round.
    pub invocations: Vec<ToolInvocation>,
}

/// Structured record of a completed run, enough for any presentation layer
/// to display the whole exchange.
#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub rounds: Vec<Round>,
    pub conversation: Vec<ChatMessage>,
}

impl Orchestrator {
    pub fn new(provider: Arc<dyn ChatProvider>, registry: ToolRegistry) -> Self {
        Self {
            provider,
            registry,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Runs the loop for one prompt.
    pub async fn run(&self, prompt: &str) -> Result<RunReport, HarnessError> {
        self.run_observed(prompt, |_| {}).await
    }

    /// Like [`run`](Self::run), with a callback invoked after each completed
    /// round so an interactive frontend can render progress.
    pub async fn run_observed(
        &self,
        prompt: &str,
        mut observer: impl FnMut(&Round),
    ) -> Result<RunReport, HarnessError> {
        let mut conversation = vec![ChatMessage::user().content(prompt).build()];
        let mut rounds = Vec::new();
        let mut outcome = RunOutcome::NoAnswer;

        for round_index in 0..self.max_rounds {
            debug!(
                "round {}/{}: requesting completion ({} messages)",
                round_index + 1,
                self.max_rounds,
                conversation.len()
            );
            let response = self
                .provider
                .chat_with_tools(&conversation, Some(self.registry.catalog()))
                .await?;
            if let Some(usage) = response.usage() {
                info!(
                    "tokens used (prompt/completion): {}/{}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            let text = response.text();
            match response.tool_calls() {
                Some(calls) if !calls.is_empty() => {
                    // The assistant turn goes in verbatim before any tool
                    // runs; providers reject tool outputs that are not
                    // preceded by the requesting message.
                    conversation.push(ChatMessage::from(response.as_ref()));

                    let mut invocations = Vec::with_capacity(calls.len());
                    let mut outputs = Vec::with_capacity(calls.len());
                    for call in &calls {
                        let output = self.execute_call(call).await;
                        invocations.push(ToolInvocation {
                            call_id: call.id.clone(),
                            name: call.function.name.clone(),
                            arguments: call.function.arguments.clone(),
                            output: output.clone(),
                        });
                        outputs.push(ToolOutput {
                            call_id: call.id.clone(),
                            content: output,
                        });
                    }
                    conversation.push(ChatMessage::user().tool_result(outputs).build());

                    let round = Round {
                        assistant_text: text,
                        invocations,
                    };
                    observer(&round);
                    rounds.push(round);
                }
                _ => {
                    let answer = text.unwrap_or_default();
                    conversation.push(ChatMessage::assistant().content(answer.clone()).build());
                    let round = Round {
                        assistant_text: Some(answer.clone()),
                        invocations: Vec::new(),
                    };
                    observer(&round);
                    rounds.push(round);
                    outcome = RunOutcome::Answer(answer);
                    break;
                }
            }
        }

        if outcome == RunOutcome::NoAnswer {
            warn!(
                "round limit ({}) reached without a final answer",
                self.max_rounds
            );
        }
        Ok(RunReport {
            outcome,
            rounds,
            conversation,
        })
    }

    /// Resolves and executes one tool call. Failures never escape: unknown
    /// names and malformed arguments both produce an error-payload output so
    /// the call still gets its paired tool message.
    async fn execute_call(&self, call: &ToolCall) -> String {
        debug!(
            "dispatching {} -> {}({})",
            call.id, call.function.name, call.function.arguments
        );
        let Some(tool) = self.registry.find(&call.function.name) else {
            warn!("model requested unknown tool '{}'", call.function.name);
            return error_payload(
                &format!("call {}", call.function.name),
                "no function found",
            );
        };
        match bind_arguments(&tool.descriptor(), &call.function.arguments) {
            Ok(args) => tool.call(args).await,
            Err(message) => {
                warn!(
                    "bad arguments for '{}': {}",
                    call.function.name, message
                );
                error_payload(&format!("call {}", call.function.name), &message)
            }
        }
    }
}

/// Explicit argument-binding step between the model's raw argument text and
/// a tool invocation.
///
/// The text must parse to a JSON object (empty text counts as `{}`).
/// Declared-required parameters that are missing, and parameters whose JSON
/// type disagrees with the declared one, are logged but do not block the
/// call: the tools fabricate answers anyway, so the schema stays
/// descriptive rather than enforced.
pub fn bind_arguments(descriptor: &Tool, raw: &str) -> Result<Value, String> {
    let raw = if raw.trim().is_empty() { "{}" } else { raw };
    let args: Value =
        serde_json::from_str(raw).map_err(|e| format!("bad argument JSON '{raw}': {e}"))?;
    if !args.is_object() {
        return Err(format!("arguments must be a JSON object, got: {args}"));
    }

    let schema = &descriptor.function.parameters;
    for name in &schema.required {
        if args.get(name).is_none() {
            warn!(
                "tool '{}' call is missing required argument '{}'",
                descriptor.function.name, name
            );
        }
    }
    for (name, property) in &schema.properties {
        if let Some(value) = args.get(name) {
            let matches = match property.property_type.as_str() {
                "string" => value.is_string(),
                "number" => value.is_number(),
                "boolean" => value.is_boolean(),
                _ => true,
            };
            if !matches {
                warn!(
                    "tool '{}' argument '{}' is not a {}: {}",
                    descriptor.function.name, name, property.property_type, value
                );
            }
        }
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{FunctionBuilder, ParamBuilder};

    fn weather_descriptor() -> Tool {
        FunctionBuilder::new("get_current_weather")
            .param(ParamBuilder::new("location").type_of("string"))
            .required(["location"])
            .build()
    }

    #[test]
    fn well_formed_arguments_bind() {
        let args = bind_arguments(&weather_descriptor(), r#"{"location": "Chennai"}"#).unwrap();
        assert_eq!(args["location"], "Chennai");
    }

    #[test]
    fn empty_argument_text_binds_to_an_empty_object() {
        let args = bind_arguments(&weather_descriptor(), "").unwrap();
        assert_eq!(args, serde_json::json!({}));
    }

    #[test]
    fn missing_required_argument_still_binds() {
        // The required list is descriptive, not enforced.
        let args = bind_arguments(&weather_descriptor(), r#"{"city": "Chennai"}"#).unwrap();
        assert_eq!(args["city"], "Chennai");
    }

    #[test]
    fn malformed_argument_text_is_an_error() {
        let err = bind_arguments(&weather_descriptor(), "{not json").unwrap_err();
        assert!(err.contains("bad argument JSON"));
    }

    #[test]
    fn non_object_arguments_are_an_error() {
        let err = bind_arguments(&weather_descriptor(), "[1, 2]").unwrap_err();
        assert!(err.contains("must be a JSON object"));
    }
}
