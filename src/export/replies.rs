use crate::error::ExportError;
use crate::export::config::PagingConfig;
use crate::export::record::EntrySink;
use crate::slack::paginate::{PageQuery, fold_pages};
use crate::slack::{Endpoint, Record, SlackTransport};
use std::io::Write;

/// Fetch every reply of every thread in `thread_parents` and write them as
/// one array, grouped by thread in the given order.
///
/// Each thread is paginated from an empty cursor. Returns the number of
/// replies written.
pub fn fetch_replies<T, W>(
    transport: &T,
    paging: &PagingConfig,
    channel_id: &str,
    thread_parents: &[String],
    sink: EntrySink<'_, W>,
) -> Result<usize, ExportError>
where
    T: SlackTransport + ?Sized,
    W: Write,
{
    let mut replies: Vec<Record> = Vec::new();
    for ts in thread_parents {
        let query = PageQuery::new(Endpoint::ConversationsReplies, paging.replies_limit)
            .param("channel", channel_id)
            .param("ts", ts.as_str());
        replies = fold_pages(transport, &query, replies, |mut acc, page| {
            acc.extend(page);
            acc
        })?;
    }

    sink.write_records(&replies)?;
    Ok(replies.len())
}
