pub mod client;
#[cfg(test)]
pub mod fake;
pub mod paginate;

use crate::error::ExportError;
use serde_json::{Map, Value};
use std::fmt;

/// One channel or message exactly as the Web API returned it.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ConversationsList,
    ConversationsHistory,
    ConversationsReplies,
}

impl Endpoint {
    pub fn method(self) -> &'static str {
        match self {
            Endpoint::ConversationsList => "conversations.list",
            Endpoint::ConversationsHistory => "conversations.history",
            Endpoint::ConversationsReplies => "conversations.replies",
        }
    }

    /// Response field holding the page's records.
    pub fn items_key(self) -> &'static str {
        match self {
            Endpoint::ConversationsList => "channels",
            Endpoint::ConversationsHistory | Endpoint::ConversationsReplies => "messages",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

pub trait SlackTransport {
    fn get(&self, endpoint: Endpoint, query: &[(&str, String)]) -> Result<HttpReply, ExportError>;
}
