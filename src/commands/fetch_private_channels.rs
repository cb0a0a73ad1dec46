use anyhow::{Result, bail};
use std::path::PathBuf;

use crate::commands::CommandReport;
use crate::error::ExportError;
use crate::export::config::load_config;
use crate::export::rewrite::rewrite_archive;
use crate::slack::client::SlackClient;

#[derive(Debug, Clone)]
pub struct FetchPrivateChannelsOptions {
    pub input_archive: PathBuf,
    pub output_archive: PathBuf,
    pub api_token: String,
}

pub fn run(opts: &FetchPrivateChannelsOptions) -> Result<CommandReport> {
    let token = opts.api_token.trim();
    if token.is_empty() {
        bail!("--api-token is required and cannot be empty");
    }

    let cfg = load_config()?;
    let client = SlackClient::new(&cfg.api, token)?;
    let mut report = CommandReport::new("fetch-private-channels");

    report.detail(format!("input_archive={}", opts.input_archive.display()));
    report.detail(format!("output_archive={}", opts.output_archive.display()));
    report.detail(format!("slack_api={}", cfg.api.base_url));

    let outcome = match rewrite_archive(
        &opts.input_archive,
        &opts.output_archive,
        &client,
        &cfg.paging,
    ) {
        Ok(outcome) => outcome,
        Err(err) if err.is_close_failure() => {
            report.issue(close_issue(err));
            return Ok(report);
        }
        Err(err) => return Err(err.into()),
    };

    report.detail(format!("copied_entries={}", outcome.copied_entries));
    if outcome.groups_present {
        report.detail("groups.json already present in the export; nothing fetched");
        return Ok(report);
    }

    report.detail(format!("private_channels={}", outcome.channels.len()));
    for channel in &outcome.channels {
        report.detail(format!(
            "channel={} messages={} threads={} replies={}",
            channel.name, channel.messages, channel.threads, channel.replies
        ));
    }

    Ok(report)
}

/// The close error with its causes, the way `main` prints fatal errors.
fn close_issue(err: ExportError) -> String {
    format!("{:#}", anyhow::Error::from(err))
}
