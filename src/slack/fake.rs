//! Scripted transport for unit tests: replies are queued per endpoint and
//! every request is recorded.

use crate::error::ExportError;
use crate::slack::{Endpoint, HttpReply, SlackTransport};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub endpoint: Endpoint,
    pub query: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
pub struct ScriptedTransport {
    replies: RefCell<HashMap<Endpoint, VecDeque<HttpReply>>>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, endpoint: Endpoint, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.replies
            .borrow_mut()
            .entry(endpoint)
            .or_default()
            .push_back(HttpReply {
                status,
                body: body.into(),
            });
        self
    }

    pub fn page(self, endpoint: Endpoint, body: Value) -> Self {
        self.reply(endpoint, 200, body.to_string())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    pub fn requests_to(&self, endpoint: Endpoint) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.endpoint == endpoint)
            .collect()
    }
}

impl SlackTransport for ScriptedTransport {
    fn get(&self, endpoint: Endpoint, query: &[(&str, String)]) -> Result<HttpReply, ExportError> {
        self.requests.borrow_mut().push(RecordedRequest {
            endpoint,
            query: query
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        });
        let next = self
            .replies
            .borrow_mut()
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front);
        match next {
            Some(reply) => Ok(reply),
            None => panic!("no scripted reply left for {endpoint}"),
        }
    }
}
