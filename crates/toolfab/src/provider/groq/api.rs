use http::{
    Method, Request, Response,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};

use crate::{
    ToolCall, Usage,
    chat::{ChatMessage, ChatResponse, ChatRole, FinishReason, MessageType, Tool, ToolChoice},
    error::HarnessError,
};

use super::Groq;

/// Individual message in a Groq chat conversation.
#[derive(Serialize, Debug)]
struct GroqChatMessage<'a> {
    role: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<GroqToolCall<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<&'a str>,
}

#[derive(Serialize, Debug)]
struct GroqFunctionPayload<'a> {
    name: &'a str,
    arguments: &'a str,
}

#[derive(Serialize, Debug)]
struct GroqToolCall<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    call_type: &'a str,
    function: GroqFunctionPayload<'a>,
}

/// Request payload for Groq's chat API endpoint.
#[derive(Serialize, Debug)]
struct GroqChatRequest<'a> {
    model: &'a str,
    messages: Vec<GroqChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [Tool]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'a ToolChoice>,
}

/// Response from Groq's chat API endpoint.
#[derive(Deserialize, Debug)]
pub(crate) struct GroqChatResponse {
    choices: Vec<GroqChatChoice>,
    usage: Option<Usage>,
}

#[derive(Deserialize, Debug)]
struct GroqChatChoice {
    finish_reason: Option<String>,
    message: GroqChatMsg,
}

#[derive(Deserialize, Debug)]
struct GroqChatMsg {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}

impl ChatResponse for GroqChatResponse {
    fn text(&self) -> Option<String> {
        self.choices.first().and_then(|c| c.message.content.clone())
    }

    fn tool_calls(&self) -> Option<Vec<ToolCall>> {
        self.choices
            .first()
            .and_then(|c| c.message.tool_calls.clone())
    }

    fn finish_reason(&self) -> Option<FinishReason> {
        self.choices
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            .map(|reason| match reason {
                "stop" => FinishReason::Stop,
                "length" => FinishReason::Length,
                "content_filter" => FinishReason::ContentFilter,
                "tool_calls" | "function_call" => FinishReason::ToolCalls,
                _ => FinishReason::Unknown,
            })
    }

    fn usage(&self) -> Option<Usage> {
        self.usage
    }
}

impl std::fmt::Display for GroqChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(calls) = self.tool_calls() {
            for call in calls {
                writeln!(f, "{}({})", call.function.name, call.function.arguments)?;
            }
        }
        write!(f, "{}", self.text().unwrap_or_default())
    }
}

pub(crate) fn groq_chat_request(
    cfg: &Groq,
    messages: &[ChatMessage],
    tools: Option<&[Tool]>,
) -> Result<Request<Vec<u8>>, HarnessError> {
    if cfg.api_key.is_empty() {
        return Err(HarnessError::AuthError("Missing Groq API key".to_string()));
    }

    let mut groq_msgs: Vec<GroqChatMessage> = Vec::with_capacity(messages.len());

    for msg in messages {
        match &msg.message_type {
            // Each tool output becomes its own provider-level "tool" message
            // carrying the id of the call it answers.
            MessageType::ToolResult(outputs) => {
                for output in outputs {
                    groq_msgs.push(GroqChatMessage {
                        role: "tool",
                        content: Some(&output.content),
                        tool_calls: None,
                        tool_call_id: Some(&output.call_id),
                    });
                }
            }
            MessageType::ToolUse(calls) => {
                groq_msgs.push(GroqChatMessage {
                    role: "assistant",
                    content: if msg.content.is_empty() {
                        None
                    } else {
                        Some(&msg.content)
                    },
                    tool_calls: Some(
                        calls
                            .iter()
                            .map(|c| GroqToolCall {
                                id: &c.id,
                                call_type: "function",
                                function: GroqFunctionPayload {
                                    name: &c.function.name,
                                    arguments: &c.function.arguments,
                                },
                            })
                            .collect(),
                    ),
                    tool_call_id: None,
                });
            }
            MessageType::Text => {
                groq_msgs.push(GroqChatMessage {
                    role: match msg.role {
                        ChatRole::User => "user",
                        ChatRole::Assistant => "assistant",
                    },
                    content: Some(&msg.content),
                    tool_calls: None,
                    tool_call_id: None,
                });
            }
        }
    }

    // tool_choice is only meaningful when a catalog rides along.
    let tool_choice = tools.and(cfg.tool_choice.as_ref());

    let body = GroqChatRequest {
        model: &cfg.model,
        messages: groq_msgs,
        max_tokens: cfg.max_tokens,
        temperature: cfg.temperature,
        tools,
        tool_choice,
    };

    let json_body = serde_json::to_vec(&body)?;
    let url = cfg
        .base_url
        .join("chat/completions")
        .map_err(|e| HarnessError::HttpError(e.to_string()))?;

    Ok(Request::builder()
        .method(Method::POST)
        .uri(url.to_string())
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {}", cfg.api_key))
        .body(json_body)?)
}

pub(crate) fn groq_parse_chat(
    response: Response<Vec<u8>>,
) -> Result<Box<dyn ChatResponse>, HarnessError> {
    if !response.status().is_success() {
        let status = response.status();
        let body_text = String::from_utf8_lossy(response.body());
        return Err(HarnessError::ProviderError(format!(
            "HTTP {status}: {body_text}"
        )));
    }

    match serde_json::from_slice::<GroqChatResponse>(response.body()) {
        Ok(parsed) => Ok(Box::new(parsed)),
        Err(e) => Err(HarnessError::ResponseFormatError {
            message: format!("Failed to decode API response: {e}"),
            raw_response: String::from_utf8_lossy(response.body()).into_owned(),
        }),
    }
}
