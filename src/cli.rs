use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::subtitles::SerializeMode;
use crate::ui::OutputFormat;

/// Word-level caption timing, placement and ASS subtitle tool
#[derive(Parser, Debug)]
#[command(name = "captune", author, version, about, long_about = None)]
pub struct Cli {
    /// Activate debug mode
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// How messages are printed
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file to use instead of the default location
    #[arg(long, value_hint = ValueHint::FilePath, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Style and place captions from a transcript or caption list
    Optimize(OptimizeArgs),
    /// Write captions as an ASS or SRT subtitle file
    Export(ExportArgs),
    /// Inspect an ASS file and recover its captions
    Preview(PreviewArgs),
    /// Change the timing or style of a single caption
    Edit(EditArgs),
    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    /// Transcript (word JSON, WhisperX JSON, SRT) or captions JSON
    #[arg(value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// Captions JSON output; defaults to stdout
    #[arg(short = 'o', long = "out-file", value_hint = ValueHint::FilePath)]
    pub out_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Ass,
    Srt,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Ass => "ass",
            ExportFormat::Srt => "srt",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Captions JSON or transcript to export
    #[arg(value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// Subtitle format to write
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Ass)]
    pub format: ExportFormat,

    /// ASS text mode; overrides the configured one
    #[arg(long, value_enum)]
    pub mode: Option<SerializeMode>,

    /// Run the optimizer before exporting
    #[arg(long)]
    pub optimize: bool,

    /// Output file; defaults to the configured export directory, then stdout
    #[arg(short = 'o', long = "out-file", value_hint = ValueHint::FilePath)]
    pub out_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct PreviewArgs {
    /// ASS document to read
    #[arg(value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// Print the recovered captions as JSON instead of a listing
    #[arg(long)]
    pub captions: bool,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Captions JSON file to edit
    #[arg(value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// Zero-based index of the caption
    #[arg(short, long)]
    pub index: usize,

    /// Move the caption by this many seconds, keeping its duration
    #[arg(long, allow_negative_numbers = true)]
    pub shift: Option<f64>,

    #[arg(long)]
    pub word: Option<String>,

    /// New start time in seconds
    #[arg(long)]
    pub start: Option<f64>,

    /// New end time in seconds
    #[arg(long)]
    pub end: Option<f64>,

    #[arg(long)]
    pub keyword: Option<bool>,

    #[arg(long)]
    pub font_size: Option<f64>,

    #[arg(long)]
    pub font_family: Option<String>,

    /// Text color as #RRGGBB
    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub background: Option<String>,

    /// Horizontal position in percent of the frame width
    #[arg(long, allow_negative_numbers = true)]
    pub x: Option<f64>,

    /// Vertical position in percent of the frame height
    #[arg(long, allow_negative_numbers = true)]
    pub y: Option<f64>,

    /// Write the result here instead of back to the input
    #[arg(short = 'o', long = "out-file", value_hint = ValueHint::FilePath)]
    pub out_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the configuration file location
    Path,
    /// Write a documented configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn cli_command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "captune", "export", "caps.json", "--format", "srt", "--output", "json", "--debug",
        ])
        .unwrap();
        assert!(cli.debug);
        assert_eq!(cli.output, OutputFormat::Json);
        let Commands::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.format, ExportFormat::Srt);
        assert!(args.mode.is_none());
    }

    #[test]
    fn parses_negative_shift() {
        let cli =
            Cli::try_parse_from(["captune", "edit", "caps.json", "-i", "2", "--shift", "-0.5"])
                .unwrap();
        let Commands::Edit(args) = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(args.index, 2);
        assert_eq!(args.shift, Some(-0.5));
    }

    #[test]
    fn parses_styled_mode() {
        let cli = Cli::try_parse_from(["captune", "export", "c.json", "--mode", "styled-override"])
            .unwrap();
        let Commands::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.mode, Some(SerializeMode::StyledOverride));
    }
}
