// Command-line surface: argument parsing and command dispatch over a loaded
// dataset. Output is returned as text so main only has to print it.

use crate::config::ViewConfig;
use crate::render;
use anyhow::Context;
use clap::{Parser, Subcommand};
use hoopcast_core::{parse_date, Dataset};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "hoopcast", about = "Browse player stat predictions against recent form")]
pub struct Cli {
    /// Directory holding `config/` and `defaults/`.
    #[arg(long, global = true, default_value = ".")]
    pub base_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every date with predictions.
    Dates,
    /// List players with predictions.
    Players {
        /// Case-insensitive name filter.
        #[arg(long)]
        search: Option<String>,
    },
    /// Show the composed view for one player and date.
    Show {
        #[arg(long)]
        player: String,
        /// Game date, YYYY-MM-DD.
        #[arg(long)]
        date: String,
        #[arg(long)]
        json: bool,
    },
    /// Show model quality against the rolling averages.
    Quality,
    /// Show which sources loaded.
    Status,
}

pub fn run(command: &Command, dataset: &Dataset, view: &ViewConfig) -> anyhow::Result<String> {
    match command {
        Command::Dates => Ok(render::render_dates(dataset)),
        Command::Players { search: None } => Ok(render::render_players(&dataset.players())),
        Command::Players { search: Some(q) } => Ok(render::render_players(
            &dataset.search_players(q, view.search_limit),
        )),
        Command::Show { player, date, json } => {
            let date = parse_date(date)
                .with_context(|| format!("invalid date `{date}`, expected YYYY-MM-DD"))?;
            let outcome = dataset.compose_with(player, date, view.windows());
            if *json {
                let mut text = serde_json::to_string_pretty(&outcome)
                    .context("failed to serialize view")?;
                text.push('\n');
                Ok(text)
            } else {
                Ok(render::render_outcome(&outcome))
            }
        }
        Command::Quality => Ok(render::render_quality(dataset.quality())),
        Command::Status => Ok(render::render_report(dataset.report())),
    }
}
