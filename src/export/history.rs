use crate::error::ExportError;
use crate::export::config::PagingConfig;
use crate::export::record::{EntrySink, thread_parent_ts};
use crate::slack::paginate::{PageQuery, fold_pages};
use crate::slack::{Endpoint, Record, SlackTransport};
use std::io::Write;

#[derive(Debug, Default)]
struct HistoryAccumulator {
    messages: Vec<Record>,
    thread_parents: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelHistory {
    pub message_count: usize,
    /// `ts` of every thread parent, in first-seen order.
    pub thread_parents: Vec<String>,
}

pub fn fetch_history<T, W>(
    transport: &T,
    paging: &PagingConfig,
    channel_id: &str,
    sink: EntrySink<'_, W>,
) -> Result<ChannelHistory, ExportError>
where
    T: SlackTransport + ?Sized,
    W: Write,
{
    let query = PageQuery::new(Endpoint::ConversationsHistory, paging.history_limit)
        .param("channel", channel_id);

    let acc = fold_pages(
        transport,
        &query,
        HistoryAccumulator::default(),
        |mut acc, page| {
            acc.thread_parents
                .extend(page.iter().filter_map(thread_parent_ts).map(str::to_string));
            acc.messages.extend(page);
            acc
        },
    )?;

    sink.write_records(&acc.messages)?;
    Ok(ChannelHistory {
        message_count: acc.messages.len(),
        thread_parents: acc.thread_parents,
    })
}
