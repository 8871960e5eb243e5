//! The demo tool catalog: six synthetic tools.
//!
//! Each tool fabricates its answer by issuing one single-turn model call with
//! a task-specific instruction prompt, instead of querying a real data
//! source. The reply is returned verbatim; it is expected, but never
//! guaranteed, to be JSON.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    builder::{FunctionBuilder, ParamBuilder},
    chat::{ChatMessage, ChatProvider, Tool},
    provider::groq::Groq,
    registry::{CallTool, ToolRegistry, error_payload},
};

/// A tool whose implementation is another model call.
///
/// The provider handle is injected so tests can script it; `operation` names
/// the action in the error payload ("get weather" → `Failed to get weather:
/// ...`).
pub struct SyntheticTool {
    descriptor: Tool,
    operation: &'static str,
    prompt: fn(&Value) -> String,
    provider: Arc<dyn ChatProvider>,
}

impl SyntheticTool {
    pub fn new(
        descriptor: Tool,
        operation: &'static str,
        prompt: fn(&Value) -> String,
        provider: Arc<dyn ChatProvider>,
    ) -> Self {
        Self {
            descriptor,
            operation,
            prompt,
            provider,
        }
    }

    pub fn weather(provider: Arc<dyn ChatProvider>) -> Self {
        let descriptor = FunctionBuilder::new("get_current_weather")
            .description("Get the current weather in a given location")
            .param(
                ParamBuilder::new("location")
                    .type_of("string")
                    .description("The city and state, e.g. San Francisco, CA"),
            )
            .required(["location"])
            .build();
        Self::new(descriptor, "get weather", weather_prompt, provider)
    }

    pub fn time(provider: Arc<dyn ChatProvider>) -> Self {
        let descriptor = FunctionBuilder::new("get_time")
            .description("Get the current time in a given location")
            .param(
                ParamBuilder::new("location")
                    .type_of("string")
                    .description("The city and state, e.g. San Francisco, CA"),
            )
            .required(["location"])
            .build();
        Self::new(descriptor, "get time", time_prompt, provider)
    }

    pub fn news(provider: Arc<dyn ChatProvider>) -> Self {
        let descriptor = FunctionBuilder::new("get_news")
            .description("Get the latest news about a topic")
            .param(
                ParamBuilder::new("topic")
                    .type_of("string")
                    .description("The topic to get news about"),
            )
            .required(["topic"])
            .build();
        Self::new(descriptor, "get news", news_prompt, provider)
    }

    pub fn sum(provider: Arc<dyn ChatProvider>) -> Self {
        let descriptor = FunctionBuilder::new("calculate_sum")
            .description("Calculate the sum of two numbers")
            .param(ParamBuilder::new("a").type_of("number").description("First number"))
            .param(ParamBuilder::new("b").type_of("number").description("Second number"))
            .required(["a", "b"])
            .build();
        Self::new(descriptor, "calculate sum", sum_prompt, provider)
    }

    pub fn joke(provider: Arc<dyn ChatProvider>) -> Self {
        let descriptor = FunctionBuilder::new("get_joke")
            .description("Get a random joke")
            .build();
        Self::new(descriptor, "get joke", joke_prompt, provider)
    }

    pub fn quote(provider: Arc<dyn ChatProvider>) -> Self {
        let descriptor = FunctionBuilder::new("get_quote")
            .description("Get a random inspirational quote")
            .build();
        Self::new(descriptor, "get quote", quote_prompt, provider)
    }
}

#[async_trait]
impl CallTool for SyntheticTool {
    fn descriptor(&self) -> Tool {
        self.descriptor.clone()
    }

    /// Never fails past this boundary: any provider error is folded into the
    /// `{"error": "Failed to <operation>: <message>"}` payload.
    async fn call(&self, args: Value) -> String {
        let instruction = (self.prompt)(&args);
        let messages = vec![ChatMessage::user().content(instruction).build()];
        match self.provider.chat(&messages).await {
            Ok(response) => response.text().unwrap_or_default(),
            Err(e) => error_payload(self.operation, &e.to_string()),
        }
    }
}

fn arg_str<'a>(args: &'a Value, name: &str) -> &'a str {
    args.get(name).and_then(Value::as_str).unwrap_or_default()
}

fn weather_prompt(args: &Value) -> String {
    format!(
        "You are a weather API. Given the location '{}', respond with a JSON object \
         with keys 'location' and 'temperature' (in Fahrenheit) for that location. \
         Make the temperature realistic for the location, but you can make it up.",
        arg_str(args, "location")
    )
}

fn time_prompt(args: &Value) -> String {
    format!(
        "You are a time API. Given the location '{}', respond with a JSON object \
         with keys 'location' and 'time' (in 12-hour format, e.g., '3:45 PM') for \
         the current local time in that location. Make up a plausible time.",
        arg_str(args, "location")
    )
}

fn news_prompt(args: &Value) -> String {
    format!(
        "You are a news API. Given the topic '{}', respond with a JSON object with \
         keys 'topic' and 'headline' where 'headline' is a plausible, \
         recent-sounding news headline about the topic.",
        arg_str(args, "topic")
    )
}

fn sum_prompt(args: &Value) -> String {
    format!(
        "You are a math API. Given the numbers a={} and b={}, respond with a JSON \
         object with keys 'a', 'b', and 'sum' (where 'sum' is the sum of a and b).",
        args.get("a").unwrap_or(&Value::Null),
        args.get("b").unwrap_or(&Value::Null)
    )
}

fn joke_prompt(_args: &Value) -> String {
    "You are a joke API. Respond with a JSON object with a single key 'joke' and a \
     value that is a short, funny joke."
        .to_string()
}

fn quote_prompt(_args: &Value) -> String {
    "You are a quote API. Respond with a JSON object with a single key 'quote' and \
     a value that is a short, inspirational quote."
        .to_string()
}

/// Wires the full demo catalog against one Groq client.
///
/// Sampling varies per tool: low temperature for arithmetic, high for
/// creative outputs, and a small output budget everywhere.
pub fn default_registry(client: &Groq) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(SyntheticTool::weather(Arc::new(
        client.clone().with_sampling(0.7, 100),
    ))));
    registry.register(Arc::new(SyntheticTool::time(Arc::new(
        client.clone().with_sampling(0.7, 60),
    ))));
    registry.register(Arc::new(SyntheticTool::news(Arc::new(
        client.clone().with_sampling(0.7, 80),
    ))));
    registry.register(Arc::new(SyntheticTool::sum(Arc::new(
        client.clone().with_sampling(0.0, 60),
    ))));
    registry.register(Arc::new(SyntheticTool::joke(Arc::new(
        client.clone().with_sampling(0.9, 60),
    ))));
    registry.register(Arc::new(SyntheticTool::quote(Arc::new(
        client.clone().with_sampling(0.8, 60),
    ))));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatResponse, FinishReason};
    use crate::error::HarnessError;
    use crate::provider::groq::DEFAULT_MODEL;
    use serde_json::json;
    use std::fmt;

    #[derive(Debug)]
    struct CannedResponse(&'static str);

    impl fmt::Display for CannedResponse {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl ChatResponse for CannedResponse {
        fn text(&self) -> Option<String> {
            Some(self.0.to_string())
        }
        fn tool_calls(&self) -> Option<Vec<crate::ToolCall>> {
            None
        }
        fn finish_reason(&self) -> Option<FinishReason> {
            Some(FinishReason::Stop)
        }
    }

    struct CannedProvider(&'static str);

    #[async_trait]
    impl ChatProvider for CannedProvider {
        async fn chat_with_tools(
            &self,
            _messages: &[ChatMessage],
            _tools: Option<&[Tool]>,
        ) -> Result<Box<dyn ChatResponse>, HarnessError> {
            Ok(Box::new(CannedResponse(self.0)))
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl ChatProvider for FailingProvider {
        async fn chat_with_tools(
            &self,
            _messages: &[ChatMessage],
            _tools: Option<&[Tool]>,
        ) -> Result<Box<dyn ChatResponse>, HarnessError> {
            Err(HarnessError::HttpError("connection reset".to_string()))
        }
    }

    #[test]
    fn prompts_embed_the_model_supplied_arguments() {
        let args = json!({"location": "Chennai"});
        assert!(weather_prompt(&args).contains("'Chennai'"));
        assert!(time_prompt(&args).contains("'Chennai'"));
        assert!(news_prompt(&json!({"topic": "rust"})).contains("'rust'"));
        assert!(sum_prompt(&json!({"a": 2, "b": 3.5})).contains("a=2 and b=3.5"));
    }

    #[test]
    fn default_registry_advertises_the_six_demo_tools() {
        let client = Groq::new("gsk-test", DEFAULT_MODEL).unwrap();
        let registry = default_registry(&client);
        let names: Vec<_> = registry
            .catalog()
            .iter()
            .map(|t| t.function.name.as_str())
            .collect();
        assert_eq!(
            names,
            [
                "get_current_weather",
                "get_time",
                "get_news",
                "calculate_sum",
                "get_joke",
                "get_quote"
            ]
        );
        // Zero-argument tools advertise an empty-but-present schema.
        let joke = &registry.catalog()[4];
        assert!(joke.function.parameters.properties.is_empty());
        assert!(joke.function.parameters.required.is_empty());
    }

    #[tokio::test]
    async fn tool_returns_the_raw_model_reply() {
        let tool = SyntheticTool::weather(Arc::new(CannedProvider(
            r#"{"location": "Chennai", "temperature": 92}"#,
        )));
        let output = tool.call(json!({"location": "Chennai"})).await;
        assert_eq!(output, r#"{"location": "Chennai", "temperature": 92}"#);
    }

    #[tokio::test]
    async fn transport_failure_becomes_an_error_payload() {
        let tool = SyntheticTool::weather(Arc::new(FailingProvider));
        let output = tool.call(json!({"location": "Chennai"})).await;
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let message = value["error"].as_str().unwrap();
        assert!(message.starts_with("Failed to get weather: "));
        assert!(message.contains("connection reset"));
    }
}
