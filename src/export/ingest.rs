use crate::error::ExportError;
use crate::export::channels::list_private_channels;
use crate::export::config::PagingConfig;
use crate::export::history::fetch_history;
use crate::export::record::{
    EntrySink, GROUPS_ENTRY, channel_identity, messages_entry, replies_entry,
};
use crate::export::replies::fetch_replies;
use crate::slack::SlackTransport;
use serde::Serialize;
use std::io::{Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChannelSummary {
    pub name: String,
    pub messages: usize,
    pub threads: usize,
    pub replies: usize,
}

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

fn start_entry<W: Write + Seek>(writer: &mut ZipWriter<W>, name: &str) -> Result<(), ExportError> {
    writer
        .start_file(name, entry_options())
        .map_err(|source| ExportError::EntryCreate {
            entry: name.to_string(),
            source,
        })
}

/// Write `groups.json` from the private channel listing, then one
/// `messages.json` and one `replies.json` per channel, in listing order.
/// The first failure aborts the remaining channels.
pub fn ingest_private_channels<T, W>(
    writer: &mut ZipWriter<W>,
    transport: &T,
    paging: &PagingConfig,
) -> Result<Vec<ChannelSummary>, ExportError>
where
    T: SlackTransport + ?Sized,
    W: Write + Seek,
{
    tracing::info!("creating {GROUPS_ENTRY} by fetching private channels");
    let channels = list_private_channels(transport, paging)?;

    start_entry(writer, GROUPS_ENTRY)?;
    EntrySink::new(GROUPS_ENTRY, &mut *writer).write_records(&channels)?;

    tracing::info!("fetching the contents of private channels");
    let mut summaries = Vec::with_capacity(channels.len());
    for channel in &channels {
        let identity = channel_identity(channel)?;
        tracing::info!(channel = identity.name, "fetching history and replies");

        let messages_name = messages_entry(identity.name);
        start_entry(writer, &messages_name)?;
        let history = fetch_history(
            transport,
            paging,
            identity.id,
            EntrySink::new(&messages_name, &mut *writer),
        )?;

        let replies_name = replies_entry(identity.name);
        start_entry(writer, &replies_name)?;
        let replies = fetch_replies(
            transport,
            paging,
            identity.id,
            &history.thread_parents,
            EntrySink::new(&replies_name, &mut *writer),
        )?;

        tracing::info!(
            channel = identity.name,
            messages = history.message_count,
            threads = history.thread_parents.len(),
            replies,
            "done with private channel"
        );
        summaries.push(ChannelSummary {
            name: identity.name.to_string(),
            messages: history.message_count,
            threads: history.thread_parents.len(),
            replies,
        });
    }

    Ok(summaries)
}
