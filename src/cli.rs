use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::CommandReport;
use crate::commands::fetch_private_channels::{self, FetchPrivateChannelsOptions};
use crate::logging;

#[derive(Debug, Parser)]
#[command(name = "slack-export-augment")]
#[command(version, about = "Add what a Slack export leaves out to the export archive")]
pub struct Cli {
    /// Slack export archive to read
    #[arg(short = 'i', long = "input-archive")]
    pub input_archive: PathBuf,

    /// Archive to write, containing the input plus fetched data
    #[arg(short = 'o', long = "output-archive")]
    pub output_archive: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the command report as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch all private channels accessible to the user, with history and replies
    FetchPrivateChannels {
        /// Slack API token, e.g. a user OAuth token with the groups:read and groups:history scopes
        #[arg(long = "api-token", env = "SLACK_API_TOKEN", hide_env_values = true)]
        api_token: String,
    },
}

fn print_report(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let report = match &cli.command {
        Command::FetchPrivateChannels { api_token } => {
            fetch_private_channels::run(&FetchPrivateChannelsOptions {
                input_archive: cli.input_archive.clone(),
                output_archive: cli.output_archive.clone(),
                api_token: api_token.clone(),
            })?
        }
    };

    print_report(&report, cli.json)?;
    if !report.ok {
        bail!("{} finished with issues", report.command);
    }
    Ok(())
}
