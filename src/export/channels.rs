use crate::error::ExportError;
use crate::export::config::PagingConfig;
use crate::slack::paginate::{PageQuery, fetch_all};
use crate::slack::{Endpoint, Record, SlackTransport};

pub fn list_private_channels<T>(
    transport: &T,
    paging: &PagingConfig,
) -> Result<Vec<Record>, ExportError>
where
    T: SlackTransport + ?Sized,
{
    tracing::info!("fetching private channels from slack api");
    let query = PageQuery::new(Endpoint::ConversationsList, paging.channels_limit)
        .param("types", "private_channel");
    let channels = fetch_all(transport, &query)?;
    tracing::info!(count = channels.len(), "fetched all private channels");
    Ok(channels)
}

#[cfg(test)]
mod tests {
    use super::list_private_channels;
    use crate::export::config::PagingConfig;
    use crate::slack::Endpoint;
    use crate::slack::fake::ScriptedTransport;
    use serde_json::json;

    #[test]
    fn lists_private_channels_across_pages() {
        let transport = ScriptedTransport::new()
            .page(
                Endpoint::ConversationsList,
                json!({"ok": true, "channels": [{"id": "C1", "name": "proj"}],
                       "response_metadata": {"next_cursor": "next"}}),
            )
            .page(
                Endpoint::ConversationsList,
                json!({"ok": true, "channels": [{"id": "C2", "name": "ops"}],
                       "response_metadata": {"next_cursor": ""}}),
            );

        let channels =
            list_private_channels(&transport, &PagingConfig::default()).expect("channels");
        let names: Vec<&str> = channels
            .iter()
            .filter_map(|c| c.get("name").and_then(|v| v.as_str()))
            .collect();
        assert_eq!(names, vec!["proj", "ops"]);

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].param("types"), Some("private_channel"));
        assert_eq!(requests[0].param("limit"), Some("1000"));
        assert_eq!(requests[1].param("cursor"), Some("next"));
    }
}
