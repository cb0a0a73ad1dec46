use crate::error::ExportError;
use crate::export::config::SlackApiConfig;
use crate::slack::{Endpoint, HttpReply, SlackTransport};
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub struct SlackClient {
    http: Client,
    base_url: String,
    token: String,
}

impl SlackClient {
    pub fn new(api: &SlackApiConfig, token: &str) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = api.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("failed to build slack http client")?;
        Ok(Self {
            http,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.method())
    }
}

impl SlackTransport for SlackClient {
    fn get(&self, endpoint: Endpoint, query: &[(&str, String)]) -> Result<HttpReply, ExportError> {
        let request_failed = |source: reqwest::Error| ExportError::Request {
            method: endpoint.method(),
            source,
        };

        let response = self
            .http
            .get(self.url(endpoint))
            .query(query)
            .bearer_auth(&self.token)
            .send()
            .map_err(request_failed)?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(request_failed)?;

        Ok(HttpReply {
            status,
            body: body.to_vec(),
        })
    }
}
