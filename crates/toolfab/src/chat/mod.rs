use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ToolCall, ToolOutput, Usage, error::HarnessError};

pub mod http;

/// Role of a participant in a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    /// The user/human participant in the conversation
    User,
    /// The AI assistant participant in the conversation
    Assistant,
}

/// The type of a message in a chat conversation.
///
/// Tool outputs ride on a message of their own kind rather than a role: on
/// the wire each [`ToolOutput`] becomes one provider-level "tool" message
/// carrying the originating call id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MessageType {
    /// A text message
    #[default]
    Text,
    /// Tool calls requested by the assistant
    ToolUse(Vec<ToolCall>),
    /// Outputs answering a previous assistant tool-use turn
    ToolResult(Vec<ToolOutput>),
}

/// A single message in a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of who sent this message (user or assistant)
    pub role: ChatRole,
    /// The type of the message (text, tool use, tool result)
    pub message_type: MessageType,
    /// The text content of the message
    pub content: String,
}

/// Represents a parameter in a function tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterProperty {
    /// The type of the parameter (e.g. "string", "number")
    #[serde(rename = "type")]
    pub property_type: String,
    /// Description of what the parameter does
    pub description: String,
}

/// Represents the parameters schema for a function tool.
///
/// Properties keep declaration order so that the serialized catalog is
/// byte-identical across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParametersSchema {
    /// The type of the parameters object (always "object")
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Map of parameter names to their properties
    pub properties: IndexMap<String, ParameterProperty>,
    /// List of required parameter names
    pub required: Vec<String>,
}

/// Represents a function definition for a tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionTool {
    /// The name of the function
    pub name: String,
    /// Description of what the function does
    pub description: String,
    /// The parameters schema for the function
    pub parameters: ParametersSchema,
}

/// Represents a tool that can be used in chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    /// The type of tool (e.g. "function")
    #[serde(rename = "type")]
    pub tool_type: String,
    /// The function definition if this is a function tool
    pub function: FunctionTool,
}

/// Tool choice determines how the model uses the advertised tools.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ToolChoice {
    /// Model must use at least one tool.
    Any,

    /// Model can use any tool, and may elect to use none.
    /// This is the default behavior.
    #[default]
    Auto,

    /// Model must use the named tool and only that tool.
    Tool(String),

    /// Explicitly disables the use of tools.
    None,
}

impl Serialize for ToolChoice {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            ToolChoice::Any => serializer.serialize_str("required"),
            ToolChoice::Auto => serializer.serialize_str("auto"),
            ToolChoice::None => serializer.serialize_str("none"),
            ToolChoice::Tool(name) => {
                use serde::ser::SerializeMap;

                // Serialized as {"type": "function", "function": {"name": ...}}
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "function")?;

                let mut function_obj = std::collections::HashMap::new();
                function_obj.insert("name", name.as_str());

                map.serialize_entry("function", &function_obj)?;
                map.end()
            }
        }
    }
}

/// Normalized stop reason reported by the provider.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    ToolCalls,
    Unknown,
}

/// One model response, as seen by the orchestration loop.
pub trait ChatResponse: fmt::Debug + fmt::Display + Send {
    fn text(&self) -> Option<String>;
    fn tool_calls(&self) -> Option<Vec<ToolCall>>;
    fn finish_reason(&self) -> Option<FinishReason>;
    fn usage(&self) -> Option<Usage> {
        None
    }
}

impl From<&dyn ChatResponse> for ChatMessage {
    fn from(response: &dyn ChatResponse) -> Self {
        let content = response.text().unwrap_or_default();
        let message_type = match response.tool_calls() {
            Some(calls) if !calls.is_empty() => MessageType::ToolUse(calls),
            _ => MessageType::Text,
        };
        ChatMessage {
            role: ChatRole::Assistant,
            message_type,
            content,
        }
    }
}

/// A chat-completion backend.
///
/// The harness only needs synchronous request/response exchanges; providers
/// carry their own sampling configuration, so a tool that wants a different
/// temperature simply holds its own configured provider handle.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Basic chat interaction without tools.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<Box<dyn ChatResponse>, HarnessError> {
        self.chat_with_tools(messages, None).await
    }

    /// Chat interaction with a tool catalog attached.
    ///
    /// `tools` is the catalog advertised for this request; pass `None` to
    /// issue a plain completion.
    async fn chat_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> Result<Box<dyn ChatResponse>, HarnessError>;
}

impl ChatMessage {
    /// Create a new builder for a user message
    pub fn user() -> ChatMessageBuilder {
        ChatMessageBuilder::new(ChatRole::User)
    }

    /// Create a new builder for an assistant message
    pub fn assistant() -> ChatMessageBuilder {
        ChatMessageBuilder::new(ChatRole::Assistant)
    }
}

/// Builder for ChatMessage
#[derive(Debug)]
pub struct ChatMessageBuilder {
    role: ChatRole,
    message_type: MessageType,
    content: String,
}

impl ChatMessageBuilder {
    /// Create a new ChatMessageBuilder with specified role
    pub fn new(role: ChatRole) -> Self {
        Self {
            role,
            message_type: MessageType::default(),
            content: String::new(),
        }
    }

    /// Set the message content
    pub fn content<S: Into<String>>(mut self, content: S) -> Self {
        self.content = content.into();
        self
    }

    /// Set the message type as ToolUse
    pub fn tool_use(mut self, calls: Vec<ToolCall>) -> Self {
        self.message_type = MessageType::ToolUse(calls);
        self
    }

    /// Set the message type as ToolResult
    pub fn tool_result(mut self, outputs: Vec<ToolOutput>) -> Self {
        self.message_type = MessageType::ToolResult(outputs);
        self
    }

    /// Build the ChatMessage
    pub fn build(self) -> ChatMessage {
        ChatMessage {
            role: self.role,
            message_type: self.message_type,
            content: self.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{FunctionBuilder, ParamBuilder};

    fn weather_tool() -> Tool {
        FunctionBuilder::new("get_current_weather")
            .description("Get the current weather in a given location")
            .param(
                ParamBuilder::new("location")
                    .type_of("string")
                    .description("The city and state, e.g. San Francisco, CA"),
            )
            .required(["location"])
            .build()
    }

    #[test]
    fn function_builder_produces_expected_shape() {
        let tool = weather_tool();
        assert_eq!(tool.tool_type, "function");
        assert_eq!(tool.function.name, "get_current_weather");
        assert_eq!(tool.function.parameters.schema_type, "object");
        assert_eq!(
            tool.function.parameters.properties["location"].property_type,
            "string"
        );
        assert_eq!(tool.function.parameters.required, vec!["location"]);
    }

    #[test]
    fn catalog_serialization_is_idempotent() {
        let catalog = vec![
            weather_tool(),
            FunctionBuilder::new("calculate_sum")
                .description("Calculate the sum of two numbers")
                .param(ParamBuilder::new("a").type_of("number").description("First number"))
                .param(ParamBuilder::new("b").type_of("number").description("Second number"))
                .required(["a", "b"])
                .build(),
        ];

        let first = serde_json::to_vec(&catalog).unwrap();
        let second = serde_json::to_vec(&catalog).unwrap();
        assert_eq!(first, second);

        // A catalog rebuilt from scratch serializes to the same bytes too:
        // property order is declaration order, not hash order.
        let rebuilt = serde_json::to_vec(&vec![
            weather_tool(),
            FunctionBuilder::new("calculate_sum")
                .description("Calculate the sum of two numbers")
                .param(ParamBuilder::new("a").type_of("number").description("First number"))
                .param(ParamBuilder::new("b").type_of("number").description("Second number"))
                .required(["a", "b"])
                .build(),
        ])
        .unwrap();
        assert_eq!(first, rebuilt);
    }

    #[test]
    fn tool_choice_serializes_to_wire_format() {
        assert_eq!(
            serde_json::to_value(ToolChoice::Auto).unwrap(),
            serde_json::json!("auto")
        );
        assert_eq!(
            serde_json::to_value(ToolChoice::Any).unwrap(),
            serde_json::json!("required")
        );
        assert_eq!(
            serde_json::to_value(ToolChoice::Tool("get_joke".into())).unwrap(),
            serde_json::json!({"type": "function", "function": {"name": "get_joke"}})
        );
    }

    #[test]
    fn assistant_message_from_response_keeps_tool_calls() {
        use crate::{FunctionCall, ToolCall};

        #[derive(Debug)]
        struct Fake(Vec<ToolCall>);
        impl fmt::Display for Fake {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "fake")
            }
        }
        impl ChatResponse for Fake {
            fn text(&self) -> Option<String> {
                Some("checking".into())
            }
            fn tool_calls(&self) -> Option<Vec<ToolCall>> {
                Some(self.0.clone())
            }
            fn finish_reason(&self) -> Option<FinishReason> {
                Some(FinishReason::ToolCalls)
            }
        }

        let call = ToolCall {
            id: "call-1".into(),
            call_type: "function".into(),
            function: FunctionCall {
                name: "get_joke".into(),
                arguments: "{}".into(),
            },
        };
        let fake = Fake(vec![call.clone()]);
        let msg = ChatMessage::from(&fake as &dyn ChatResponse);
        assert_eq!(msg.role, ChatRole::Assistant);
        assert_eq!(msg.content, "checking");
        assert_eq!(msg.message_type, MessageType::ToolUse(vec![call]));
    }
}
