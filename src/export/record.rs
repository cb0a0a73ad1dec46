use crate::error::ExportError;
use crate::slack::Record;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::Write;

pub const GROUPS_ENTRY: &str = "groups.json";

/// Same indent the export itself uses.
const EXPORT_INDENT: &[u8] = b"    ";

pub fn messages_entry(channel_name: &str) -> String {
    format!("{channel_name}/messages.json")
}

pub fn replies_entry(channel_name: &str) -> String {
    format!("{channel_name}/replies.json")
}

/// An open archive entry that receives one JSON document.
pub struct EntrySink<'a, W: Write> {
    name: &'a str,
    out: &'a mut W,
}

impl<'a, W: Write> EntrySink<'a, W> {
    pub fn new(name: &'a str, out: &'a mut W) -> Self {
        Self { name, out }
    }

    pub fn write_records(self, records: &[Record]) -> Result<(), ExportError> {
        let write_failed = |source: serde_json::Error| ExportError::Write {
            entry: self.name.to_string(),
            source,
        };

        let formatter = PrettyFormatter::with_indent(EXPORT_INDENT);
        let mut ser = Serializer::with_formatter(&mut *self.out, formatter);
        records.serialize(&mut ser).map_err(write_failed)?;
        self.out
            .write_all(b"\n")
            .map_err(|err| write_failed(serde_json::Error::io(err)))?;
        Ok(())
    }
}

/// `ts` of a message that heads a thread: it carries a numeric
/// `reply_count` and a non-empty string `ts`.
pub fn thread_parent_ts(message: &Record) -> Option<&str> {
    if !matches!(message.get("reply_count"), Some(Value::Number(_))) {
        return None;
    }
    message
        .get("ts")
        .and_then(Value::as_str)
        .filter(|ts| !ts.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelIdentity<'a> {
    pub id: &'a str,
    pub name: &'a str,
}

pub fn channel_identity(channel: &Record) -> Result<ChannelIdentity<'_>, ExportError> {
    let field = |key: &str| {
        channel
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| ExportError::MalformedRecord {
                kind: "channel",
                detail: format!("missing string field `{key}`"),
            })
    };

    let id = field("id")?;
    let name = field("name")?;
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ExportError::MalformedRecord {
            kind: "channel",
            detail: format!("channel {id} has unusable name `{name}`"),
        });
    }
    Ok(ChannelIdentity { id, name })
}
