use crate::{
    chat::{ChatMessage, ChatResponse, Tool},
    error::HarnessError,
};
use http::{Request, Response};

/// Splits a chat provider into pure request building and response parsing so
/// both halves can be tested without touching the network.
pub trait HTTPChatProvider: Send + Sync {
    fn chat_request(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> Result<Request<Vec<u8>>, HarnessError>;

    fn parse_chat(&self, resp: Response<Vec<u8>>) -> Result<Box<dyn ChatResponse>, HarnessError>;
}
