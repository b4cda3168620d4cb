use anyhow::{Context, Result, bail};
use colored::Colorize;
use serde_json::json;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::captions::Caption;
use crate::captions::color::ass_color_to_hex;
use crate::captions::edit::{CaptionEdit, apply_edit, shift_caption};
use crate::captions::optimize::optimize_captions;
use crate::captions::timecode::seconds_to_ass_time;
use crate::captions::transcript::{captions_from_srt, parse_transcript_json};
use crate::cli::{
    Cli, Commands, ConfigCommands, EditArgs, ExportArgs, ExportFormat, OptimizeArgs, PreviewArgs,
    cli_command,
};
use crate::common::config::DocumentedConfig;
use crate::config::CaptuneConfig;
use crate::export::{Delivered, DirectorySink, TextSink, mime_type_for, sink_for};
use crate::subtitles::srt::write_srt;
use crate::subtitles::{ParsedAss, dialogues_to_captions, parse_ass, serialize_ass};
use crate::ui::prelude::*;

pub fn dispatch(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Optimize(args) => handle_optimize(cli, args),
        Commands::Export(args) => handle_export(cli, args),
        Commands::Preview(args) => handle_preview(args),
        Commands::Edit(args) => handle_edit(cli, args),
        Commands::Config { command } => handle_config(cli, command),
        Commands::Completions { shell } => {
            clap_complete::generate(*shell, &mut cli_command(), "captune", &mut io::stdout());
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<CaptuneConfig> {
    let (config, path) = CaptuneConfig::resolve(cli.config.as_deref())?;
    emit(
        Level::Debug,
        "config.loaded",
        &format!("Using config {}", path.display()),
        None,
    );
    Ok(config)
}

fn config_location(cli: &Cli) -> Result<PathBuf> {
    match &cli.config {
        Some(path) => Ok(path.clone()),
        None => CaptuneConfig::config_path(),
    }
}

/// Read captions from a captions JSON list, a transcript JSON or an SRT file.
///
/// Every JSON input goes through the transcript clean-up; caption lists keep
/// any styling they carry.
fn load_captions(path: &Path) -> Result<Vec<Caption>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    let is_srt = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("srt"));

    let captions = if is_srt {
        captions_from_srt(&contents)
    } else {
        parse_transcript_json(&contents)
    }
    .with_context(|| format!("loading captions from {}", path.display()))?;

    emit(
        Level::Debug,
        "captions.loaded",
        &format!("Loaded {} captions from {}", captions.len(), path.display()),
        None,
    );
    Ok(captions)
}

fn report_delivery(delivered: &Delivered, code: &str, what: &str, data: serde_json::Value) {
    match delivered {
        Delivered::File(path) => emit(
            Level::Success,
            code,
            &format!("{what} written to {}", path.display()),
            Some(data),
        ),
        // Keep stdout clean for the payload itself
        Delivered::Stdout => emit(Level::Debug, code, what, Some(data)),
    }
}

fn captions_json(captions: &[Caption]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(captions).context("serializing captions")?;
    json.push('\n');
    Ok(json)
}

fn deliver_to(output: Option<&Path>, default_name: &str, content: &str) -> Result<Delivered> {
    let (sink, name) = sink_for(output);
    let filename = name.unwrap_or_else(|| default_name.to_string());
    sink.deliver(&filename, content, mime_type_for(&filename))
}

fn handle_optimize(cli: &Cli, args: &OptimizeArgs) -> Result<()> {
    let config = load_config(cli)?;
    let captions = load_captions(&args.input)?;

    let optimized = optimize_captions(&captions, &config.optimizer());
    let keywords = optimized.iter().filter(|c| c.is_keyword).count();

    let delivered = deliver_to(
        args.out_file.as_deref(),
        "captions.json",
        &captions_json(&optimized)?,
    )?;
    report_delivery(
        &delivered,
        "captions.optimize.done",
        &format!("Optimized {} captions ({keywords} keywords)", optimized.len()),
        json!({ "captions": optimized.len(), "keywords": keywords }),
    );
    Ok(())
}

fn handle_export(cli: &Cli, args: &ExportArgs) -> Result<()> {
    let config = load_config(cli)?;
    let mut captions = load_captions(&args.input)?;
    if args.optimize {
        captions = optimize_captions(&captions, &config.optimizer());
    }

    let content = match args.format {
        ExportFormat::Ass => {
            let mut options = config.ass_options();
            if let Some(mode) = args.mode {
                options.mode = mode;
            }
            serialize_ass(&captions, &options).context("rendering ASS document")?
        }
        ExportFormat::Srt => {
            if let Some(mode) = args.mode {
                emit(
                    Level::Warn,
                    "subtitles.export.mode_ignored",
                    &format!("--mode {mode:?} only applies to ASS export, ignoring it for SRT"),
                    None,
                );
            }
            write_srt(&captions)?
        }
    };

    let stem = args
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "captions".to_string());
    let default_name = format!("{stem}.{}", args.format.extension());

    let delivered = match (&args.out_file, config.export_dir()) {
        (None, Some(dir)) => DirectorySink::new(dir).deliver(
            &default_name,
            &content,
            mime_type_for(&default_name),
        )?,
        (out_file, _) => deliver_to(out_file.as_deref(), &default_name, &content)?,
    };

    report_delivery(
        &delivered,
        "subtitles.export.done",
        &format!(
            "Exported {} captions as {}",
            captions.len(),
            args.format.extension().to_uppercase()
        ),
        json!({ "captions": captions.len(), "format": args.format.extension() }),
    );
    Ok(())
}

fn handle_preview(args: &PreviewArgs) -> Result<()> {
    let document = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let parsed = parse_ass(&document);

    for skipped in &parsed.skipped {
        emit(
            Level::Warn,
            "ass.parse.skipped",
            &format!("Skipped line {}: {}", skipped.line, skipped.reason),
            Some(json!({ "line": skipped.line, "reason": skipped.reason })),
        );
    }

    if args.captions {
        let captions = dialogues_to_captions(&parsed);
        print!("{}", captions_json(&captions)?);
        return Ok(());
    }

    match get_output_format() {
        OutputFormat::Json => emit(
            Level::Info,
            "ass.preview",
            &format!("{} dialogue lines", parsed.dialogues.len()),
            Some(serde_json::to_value(&parsed).context("serializing parsed document")?),
        ),
        OutputFormat::Text => print_listing(&parsed)?,
    }
    Ok(())
}

fn print_listing(parsed: &ParsedAss) -> Result<()> {
    let info = &parsed.script_info;
    emit(
        Level::Info,
        "ass.preview",
        &format!(
            "{} ({}x{}), {} styles, {} dialogue lines",
            info.title.as_deref().unwrap_or("Untitled"),
            info.play_res_x,
            info.play_res_y,
            parsed.styles.len(),
            parsed.dialogues.len()
        ),
        None,
    );

    for style in &parsed.styles {
        let color = ass_color_to_hex(&style.primary_color)
            .unwrap_or_else(|_| style.primary_color.clone());
        println!(
            "{: <10} {} {} {}",
            style.name.bold(),
            style.font_name,
            style.font_size,
            color
        );
    }

    for (idx, dialogue) in parsed.dialogues.iter().enumerate() {
        println!(
            "{: >4}  {} --> {}  {: <10} {}",
            idx,
            seconds_to_ass_time(dialogue.start)?,
            seconds_to_ass_time(dialogue.end)?,
            dialogue.style,
            dialogue.plain_text
        );
    }
    Ok(())
}

fn handle_edit(cli: &Cli, args: &EditArgs) -> Result<()> {
    let config = load_config(cli)?;
    let mut captions = load_captions(&args.input)?;

    let edit = CaptionEdit {
        word: args.word.clone(),
        start: args.start,
        end: args.end,
        is_keyword: args.keyword,
        font_size: args.font_size,
        font_family: args.font_family.clone(),
        color: args.color.clone(),
        background_color: args.background.clone(),
        position_x: args.x,
        position_y: args.y,
    };
    if edit.is_empty() && args.shift.is_none() {
        bail!("nothing to change, pass --shift or at least one field to edit");
    }

    if let Some(delta) = args.shift {
        shift_caption(&mut captions, args.index, delta)?;
    }
    if !edit.is_empty() {
        apply_edit(&mut captions, args.index, &edit, &config.edit_limits())?;
    }

    let target = args.out_file.as_deref().unwrap_or(&args.input);
    let delivered = deliver_to(Some(target), "captions.json", &captions_json(&captions)?)?;
    report_delivery(
        &delivered,
        "captions.edit.done",
        &format!("Updated caption {}", args.index),
        json!({ "index": args.index, "caption": captions[args.index] }),
    );
    Ok(())
}

fn handle_config(cli: &Cli, command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let config = load_config(cli)?;
            match get_output_format() {
                OutputFormat::Json => emit(
                    Level::Info,
                    "config.show",
                    "Current configuration",
                    Some(serde_json::to_value(&config).context("serializing config")?),
                ),
                OutputFormat::Text => print!("{}", config.to_documented_toml()),
            }
        }
        ConfigCommands::Path => {
            let path = config_location(cli)?;
            emit(
                Level::Info,
                "config.path",
                &path.display().to_string(),
                Some(json!({ "path": path })),
            );
        }
        ConfigCommands::Init { force } => {
            let path = config_location(cli)?;
            if path.exists() && !force {
                bail!(
                    "{} already exists, pass --force to overwrite",
                    path.display()
                );
            }
            CaptuneConfig::default().save_to_path(&path)?;
            emit(
                Level::Success,
                "config.init",
                &format!("Wrote default configuration to {}", path.display()),
                Some(json!({ "path": path })),
            );
        }
    }
    Ok(())
}
