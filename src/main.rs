mod captions;
mod cli;
mod commands;
mod common;
mod config;
mod export;
mod subtitles;
mod ui;

use clap::Parser;

use crate::cli::Cli;
use crate::ui::prelude::*;

fn main() {
    let cli = Cli::parse();

    ui::set_debug_mode(cli.debug);
    ui::init(cli.output, !cli.no_color);
    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = commands::dispatch(&cli) {
        emit(
            Level::Error,
            "command.failed",
            &format!("Error: {e:#}"),
            Some(serde_json::json!({
                "chain": e.chain().map(|cause| cause.to_string()).collect::<Vec<_>>()
            })),
        );
        std::process::exit(1);
    }
}
