//! Wire types for the Anthropic Messages API.

use serde::{Deserialize, Serialize};

/// Request body for `POST /messages`
#[derive(Debug, Serialize)]
pub(crate) struct MessagesRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub system: &'a str,
    pub messages: Vec<ApiMessage>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessagesResponse {
    pub content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ResponseBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}
impl MessagesResponse {
    pub fn first_text(self) -> Option<String> {
        self.content.into_iter().find_map(|block| match block {
            ResponseBlock::Text { text } => Some(text),
            ResponseBlock::Other => None,
        })
    }
}
