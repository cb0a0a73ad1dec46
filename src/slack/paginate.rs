use crate::error::ExportError;
use crate::slack::{Endpoint, Record, SlackTransport};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct PageQuery {
    pub endpoint: Endpoint,
    pub params: Vec<(&'static str, String)>,
    pub limit: u32,
}

impl PageQuery {
    pub fn new(endpoint: Endpoint, limit: u32) -> Self {
        Self {
            endpoint,
            params: Vec::new(),
            limit,
        }
    }

    pub fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    fn with_cursor(&self, cursor: &str) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(self.params.len() + 2);
        query.push(("limit", self.limit.to_string()));
        query.extend(self.params.iter().cloned());
        if !cursor.is_empty() {
            query.push(("cursor", cursor.to_string()));
        }
        query
    }
}

#[derive(Debug, Default, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: String,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

fn decode_page(endpoint: Endpoint, body: &[u8]) -> Result<(Vec<Record>, String), ExportError> {
    let decode_failed = |source: serde_json::Error| ExportError::Decode {
        method: endpoint.method(),
        source,
    };

    let mut page: Page = serde_json::from_slice(body).map_err(decode_failed)?;
    if !page.ok {
        return Err(ExportError::ApiRejected {
            method: endpoint.method(),
            reason: page.error.unwrap_or_else(|| "missing ok=true".to_string()),
        });
    }

    let records = match page.rest.remove(endpoint.items_key()) {
        None | Some(Value::Null) => Vec::new(),
        Some(items) => serde_json::from_value::<Vec<Record>>(items).map_err(decode_failed)?,
    };
    let next_cursor = page
        .response_metadata
        .map(|meta| meta.next_cursor)
        .unwrap_or_default();
    Ok((records, next_cursor))
}

/// Walk every page of `query`, folding each page's records into `acc`.
///
/// Pagination starts without a cursor and stops once the server answers
/// with an empty `next_cursor`. A server that never does keeps the loop
/// running.
pub fn fold_pages<T, A, F>(
    transport: &T,
    query: &PageQuery,
    init: A,
    mut step: F,
) -> Result<A, ExportError>
where
    T: SlackTransport + ?Sized,
    F: FnMut(A, Vec<Record>) -> A,
{
    let mut acc = init;
    let mut cursor = String::new();
    let mut page_no = 0usize;

    loop {
        let reply = transport.get(query.endpoint, &query.with_cursor(&cursor))?;
        if !(200..300).contains(&reply.status) {
            return Err(ExportError::Transport {
                method: query.endpoint.method(),
                status: reply.status,
            });
        }

        let (records, next_cursor) = decode_page(query.endpoint, &reply.body)?;
        page_no += 1;
        tracing::info!(
            method = query.endpoint.method(),
            page = page_no,
            records = records.len(),
            "processed a batch"
        );
        acc = step(acc, records);

        if next_cursor.is_empty() {
            return Ok(acc);
        }
        cursor = next_cursor;
    }
}

pub fn fetch_all<T>(transport: &T, query: &PageQuery) -> Result<Vec<Record>, ExportError>
where
    T: SlackTransport + ?Sized,
{
    fold_pages(transport, query, Vec::new(), |mut acc, records| {
        acc.extend(records);
        acc
    })
}
