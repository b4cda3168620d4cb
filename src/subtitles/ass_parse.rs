//! ASS document parsing for preview and round-trip editing.
//!
//! Parsing is fail-soft: a malformed `Style:` or `Dialogue:` line is
//! recorded in [`ParsedAss::skipped`] and the rest of the document is still
//! read, so one bad hand edit never discards the whole caption set.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::ass::StyleRecord;
use crate::captions::color::override_color_to_hex;
use crate::captions::timecode::ass_time_to_seconds;
use crate::captions::{Caption, Position};

static FONT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\fn([^\\]+)").expect("valid font tag regex"));
static SIZE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\fs(\d+(?:\.\d+)?)").expect("valid size tag regex"));
static COLOR_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\1?c(&[Hh][0-9A-Fa-f]+&?)").expect("valid color tag regex"));
static POS_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\pos\(\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*\)")
        .expect("valid pos tag regex")
});

/// Values read from the `[Script Info]` section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptInfo {
    pub title: Option<String>,
    pub play_res_x: u32,
    pub play_res_y: u32,
}

impl Default for ScriptInfo {
    fn default() -> Self {
        Self {
            title: None,
            play_res_x: 1920,
            play_res_y: 1080,
        }
    }
}

/// One `Dialogue:` line of the `[Events]` section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogueRecord {
    pub layer: u32,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    pub style: String,
    pub name: String,
    pub margin_l: i32,
    pub margin_r: i32,
    pub margin_v: i32,
    pub effect: String,
    /// Raw text including override blocks
    pub text: String,
    /// Text with override blocks removed and escapes decoded
    pub plain_text: String,
}

/// A line the parser could not use.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number in the document
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedAss {
    pub script_info: ScriptInfo,
    pub styles: Vec<StyleRecord>,
    pub dialogues: Vec<DialogueRecord>,
    pub skipped: Vec<SkippedLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    ScriptInfo,
    Styles,
    Events,
    Other,
}

impl Section {
    fn from_header(header: &str) -> Self {
        match header.to_lowercase().as_str() {
            "script info" => Section::ScriptInfo,
            "v4+ styles" | "v4 styles" => Section::Styles,
            "events" => Section::Events,
            _ => Section::Other,
        }
    }
}

/// Parse an ASS document into script info, style rows and dialogue lines.
pub fn parse_ass(document: &str) -> ParsedAss {
    let mut parsed = ParsedAss::default();
    let mut section = Section::Other;

    for (idx, raw_line) in document.lines().enumerate() {
        let line = raw_line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = Section::from_header(&line[1..line.len() - 1]);
            continue;
        }

        let result = match section {
            Section::ScriptInfo => {
                parse_script_info(line, &mut parsed.script_info);
                Ok(())
            }
            Section::Styles => match line.strip_prefix("Style:") {
                Some(rest) => parse_style_line(rest).map(|style| parsed.styles.push(style)),
                None => Ok(()),
            },
            // Dialogue text keeps its trailing whitespace
            Section::Events => match raw_line.trim_start().strip_prefix("Dialogue:") {
                Some(rest) => {
                    parse_dialogue_line(rest).map(|dialogue| parsed.dialogues.push(dialogue))
                }
                None => Ok(()),
            },
            Section::Other => Ok(()),
        };

        if let Err(reason) = result {
            parsed.skipped.push(SkippedLine {
                line: idx + 1,
                reason,
            });
        }
    }

    parsed
}

fn parse_script_info(line: &str, info: &mut ScriptInfo) {
    let Some((key, value)) = line.split_once(':') else {
        return;
    };
    let value = value.trim();

    match key.trim().to_lowercase().as_str() {
        "title" => info.title = Some(value.to_string()),
        "playresx" => {
            if let Ok(x) = value.parse::<u32>()
                && x > 0
            {
                info.play_res_x = x;
            }
        }
        "playresy" => {
            if let Ok(y) = value.parse::<u32>()
                && y > 0
            {
                info.play_res_y = y;
            }
        }
        _ => {}
    }
}

/// Map a style row positionally. Name, font, size and primary color are
/// required; later columns fall back to the defaults of a generated style.
fn parse_style_line(line: &str) -> Result<StyleRecord, String> {
    let values: Vec<&str> = line.split(',').map(str::trim).collect();
    if values.len() < 4 {
        return Err(format!(
            "style line has {} fields, at least 4 are required",
            values.len()
        ));
    }

    let font_size = values[2]
        .parse::<f64>()
        .map_err(|_| format!("invalid font size '{}'", values[2]))?;

    let mut style = StyleRecord::default_style(values[1], font_size);
    style.name = values[0].to_string();
    style.primary_color = values[3].to_string();

    let text = |i: usize, target: &mut String| {
        if let Some(v) = values.get(i) {
            *target = v.to_string();
        }
    };
    text(4, &mut style.secondary_color);
    text(5, &mut style.outline_color);
    text(6, &mut style.back_color);

    let flag = |i: usize, target: &mut bool| {
        if let Some(v) = values.get(i).and_then(|v| v.parse::<i32>().ok()) {
            *target = v != 0;
        }
    };
    flag(7, &mut style.bold);
    flag(8, &mut style.italic);
    flag(9, &mut style.underline);
    flag(10, &mut style.strike_out);

    fn number<T: std::str::FromStr>(values: &[&str], i: usize, target: &mut T) {
        if let Some(v) = values.get(i).and_then(|v| v.parse::<T>().ok()) {
            *target = v;
        }
    }
    number(&values, 11, &mut style.scale_x);
    number(&values, 12, &mut style.scale_y);
    number(&values, 13, &mut style.spacing);
    number(&values, 14, &mut style.angle);
    number(&values, 15, &mut style.border_style);
    number(&values, 16, &mut style.outline);
    number(&values, 17, &mut style.shadow);
    number(&values, 18, &mut style.alignment);
    number(&values, 19, &mut style.margin_l);
    number(&values, 20, &mut style.margin_r);
    number(&values, 21, &mut style.margin_v);
    number(&values, 22, &mut style.encoding);

    Ok(style)
}

/// Map a dialogue line positionally: `Layer, Start, End, Style, Name,
/// MarginL, MarginR, MarginV, Effect, Text`. Text is everything from the
/// tenth field on, commas included.
fn parse_dialogue_line(line: &str) -> Result<DialogueRecord, String> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 10 {
        return Err(format!(
            "dialogue line has {} fields, at least 10 are required",
            fields.len()
        ));
    }

    let start = ass_time_to_seconds(fields[1]).map_err(|e| e.to_string())?;
    let end = ass_time_to_seconds(fields[2]).map_err(|e| e.to_string())?;
    let text = fields[9..].join(",");
    let plain_text = split_override_blocks(&text).0;

    Ok(DialogueRecord {
        layer: fields[0].trim().parse().unwrap_or(0),
        start,
        end,
        style: fields[3].trim().to_string(),
        name: fields[4].trim().to_string(),
        margin_l: fields[5].trim().parse().unwrap_or(0),
        margin_r: fields[6].trim().parse().unwrap_or(0),
        margin_v: fields[7].trim().parse().unwrap_or(0),
        effect: fields[8].trim().to_string(),
        text,
        plain_text,
    })
}

/// Separate dialogue text into its visible text and its override blocks.
///
/// Each unescaped `{` runs to the next `}` (blocks do not nest); a `{`
/// without a closing brace is kept as text. `\{`, `\}`, `\\` and `\N`
/// decode to their literal characters.
fn split_override_blocks(text: &str) -> (String, Vec<String>) {
    let mut plain = String::with_capacity(text.len());
    let mut blocks = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => match chars.peek().map(|&(_, next)| next) {
                Some(next @ ('{' | '}' | '\\')) => {
                    plain.push(next);
                    chars.next();
                }
                Some('N' | 'n') => {
                    plain.push('\n');
                    chars.next();
                }
                Some('h') => {
                    plain.push('\u{a0}');
                    chars.next();
                }
                _ => plain.push('\\'),
            },
            '{' => match text[idx + 1..].find('}') {
                Some(len) => {
                    blocks.push(text[idx + 1..idx + 1 + len].to_string());
                    let close = idx + 1 + len;
                    while chars.next_if(|&(i, _)| i <= close).is_some() {}
                }
                None => plain.push('{'),
            },
            _ => plain.push(c),
        }
    }

    (plain, blocks)
}

/// Rebuild a caption list from parsed dialogue lines for preview.
///
/// Font, size, color and position come from the `\fn`, `\fs`, `\c` and
/// `\pos` tags of each line (the last occurrence wins). Style rows are not
/// applied. Lines without visible text are dropped.
pub fn dialogues_to_captions(parsed: &ParsedAss) -> Vec<Caption> {
    let info = &parsed.script_info;

    parsed
        .dialogues
        .iter()
        .filter(|d| !d.plain_text.trim().is_empty())
        .map(|dialogue| {
            let mut caption =
                Caption::new(dialogue.plain_text.trim(), dialogue.start, dialogue.end);
            // Separate blocks so a tag never runs into the next block
            let tags = split_override_blocks(&dialogue.text).1.join("\\");

            if let Some(font) = last_capture(&FONT_TAG, &tags) {
                caption.font_family = Some(font.trim().to_string());
            }
            if let Some(size) = last_capture(&SIZE_TAG, &tags).and_then(|s| s.parse().ok()) {
                caption.font_size = Some(size);
            }
            if let Some(color) =
                last_capture(&COLOR_TAG, &tags).and_then(|c| override_color_to_hex(c).ok())
            {
                caption.color = Some(color);
            }
            if let Some(pos) = POS_TAG.captures_iter(&tags).last() {
                let px: f64 = pos[1].parse().unwrap_or(0.0);
                let py: f64 = pos[2].parse().unwrap_or(0.0);
                let position = Position::from_pixels(px, py, info.play_res_x, info.play_res_y);
                caption.position_x = Some(position.x.clamp(0.0, 100.0));
                caption.position_y = Some(position.y.clamp(0.0, 100.0));
            }

            caption
        })
        .collect()
}

fn last_capture<'t>(regex: &Regex, haystack: &'t str) -> Option<&'t str> {
    regex
        .captures_iter(haystack)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtitles::ass::{AssOptions, SerializeMode, serialize_ass};

    fn plain(text: &str) -> String {
        split_override_blocks(text).0
    }

    const SAMPLE_ASS: &str = r#"[Script Info]
Title: Test Subtitles
ScriptType: v4.00+
PlayResX: 1280
PlayResY: 720

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,-1,0,0,0,100,100,0,0,1,2,2,8,10,10,10,1
Style: Short,Roboto,36,&H0000D7FF

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
Dialogue: 0,0:00:01.00,0:00:04.00,Default,,0,0,0,,Hello, world!
Dialogue: 1,0:00:05.00,0:00:08.50,Short,Narrator,0,0,0,,This is a {\b1}bold{\b0} test.
Comment: 0,0:00:09.00,0:00:10.00,Default,,0,0,0,,ignored
"#;

    #[test]
    fn parses_script_info_and_styles() {
        let parsed = parse_ass(SAMPLE_ASS);
        assert_eq!(parsed.script_info.title.as_deref(), Some("Test Subtitles"));
        assert_eq!(parsed.script_info.play_res_x, 1280);
        assert_eq!(parsed.script_info.play_res_y, 720);

        assert_eq!(parsed.styles.len(), 2);
        let default = &parsed.styles[0];
        assert_eq!(default.name, "Default");
        assert_eq!(default.font_name, "Arial");
        assert_eq!(default.font_size, 20.0);
        assert_eq!(default.primary_color, "&H00FFFFFF");
        assert!(default.bold);
        assert_eq!(default.alignment, 8);

        let short = &parsed.styles[1];
        assert_eq!(short.name, "Short");
        assert_eq!(short.font_size, 36.0);
        assert_eq!(short.primary_color, "&H0000D7FF");
        assert_eq!(short.alignment, 2);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn parses_dialogues_with_commas_and_tags() {
        let parsed = parse_ass(SAMPLE_ASS);
        assert_eq!(parsed.dialogues.len(), 2);

        let first = &parsed.dialogues[0];
        assert_eq!(first.start, 1.0);
        assert_eq!(first.end, 4.0);
        assert_eq!(first.style, "Default");
        assert_eq!(first.text, "Hello, world!");
        assert_eq!(first.plain_text, "Hello, world!");

        let second = &parsed.dialogues[1];
        assert_eq!(second.layer, 1);
        assert_eq!(second.name, "Narrator");
        assert!((second.end - 8.5).abs() < 1e-9);
        assert_eq!(second.text, r"This is a {\b1}bold{\b0} test.");
        assert_eq!(second.plain_text, "This is a bold test.");
    }

    #[test]
    fn skips_malformed_lines() {
        let doc = "[Events]\n\
                   Dialogue: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,Good line\n\
                   Dialogue: 0,0:00:01.00,0:00:02.00,Default\n\
                   Dialogue: 0,bad,0:00:02.00,Default,,0,0,0,,Bad time\n";
        let parsed = parse_ass(doc);
        assert_eq!(parsed.dialogues.len(), 1);
        assert_eq!(parsed.dialogues[0].plain_text, "Good line");
        assert_eq!(parsed.skipped.len(), 2);
        assert_eq!(parsed.skipped[0].line, 3);
        assert_eq!(parsed.skipped[1].line, 4);
    }

    #[test]
    fn skips_short_or_broken_style_rows() {
        let doc = "[V4+ Styles]\nStyle: Default,Arial\nStyle: Big,Arial,huge,&H00FFFFFF\nStyle: Ok,Arial,30,&H00FFFFFF\n";
        let parsed = parse_ass(doc);
        assert_eq!(parsed.styles.len(), 1);
        assert_eq!(parsed.styles[0].name, "Ok");
        assert_eq!(parsed.skipped.len(), 2);
    }

    #[test]
    fn empty_document() {
        let parsed = parse_ass("");
        assert!(parsed.styles.is_empty());
        assert!(parsed.dialogues.is_empty());
        assert_eq!(parsed.script_info, ScriptInfo::default());
    }

    #[test]
    fn strips_override_blocks() {
        assert_eq!(plain(r"{\fnInter\fs32}Hi"), "Hi");
        assert_eq!(plain(r"a{\b1}b{\b0}c"), "abc");
        assert_eq!(plain(r"open { brace"), "open { brace");
        assert_eq!(plain(r"\{literal\}"), "{literal}");
        assert_eq!(plain(r"one\Ntwo"), "one\ntwo");
        assert_eq!(plain(r"back\\slash"), r"back\slash");
    }

    #[test]
    fn plain_round_trip() {
        let captions = vec![Caption::new("Hello", 0.0, 0.5), Caption::new("world", 0.5, 1.0)];
        let document = serialize_ass(&captions, &AssOptions::default()).unwrap();
        let parsed = parse_ass(&document);

        assert_eq!(parsed.dialogues.len(), 2);
        for (dialogue, caption) in parsed.dialogues.iter().zip(&captions) {
            assert!((dialogue.start - caption.start).abs() <= 0.01);
            assert!((dialogue.end - caption.end).abs() <= 0.01);
            assert_eq!(dialogue.plain_text, caption.word);
        }
        assert_eq!(parsed.styles.len(), 1);
        assert_eq!(parsed.styles[0].font_name, "Inter");
    }

    #[test]
    fn escaped_text_round_trips() {
        let captions = vec![Caption::new(r"{odd} \text, here", 0.0, 1.0)];
        let document = serialize_ass(&captions, &AssOptions::default()).unwrap();
        let parsed = parse_ass(&document);
        assert_eq!(parsed.dialogues[0].plain_text, r"{odd} \text, here");
    }

    #[test]
    fn styled_round_trip_recovers_captions() {
        let mut caption = Caption::new("Wow!", 2.0, 2.5);
        caption.font_family = Some("Roboto".into());
        caption.font_size = Some(41.6);
        caption.color = Some("#FFD700".into());
        caption.position_x = Some(20.0);
        caption.position_y = Some(15.0);

        let options = AssOptions {
            mode: SerializeMode::StyledOverride,
            ..AssOptions::default()
        };
        let document = serialize_ass(&[caption], &options).unwrap();
        let recovered = dialogues_to_captions(&parse_ass(&document));

        assert_eq!(recovered.len(), 1);
        let c = &recovered[0];
        assert_eq!(c.word, "Wow!");
        assert_eq!(c.font_family.as_deref(), Some("Roboto"));
        assert_eq!(c.font_size, Some(41.6));
        assert_eq!(c.color.as_deref(), Some("#FFD700"));
        assert!((c.position_x.unwrap() - 20.0).abs() < 0.1);
        assert!((c.position_y.unwrap() - 15.0).abs() < 0.1);
    }

    #[test]
    fn preview_uses_script_resolution_and_inline_colors() {
        let doc = "[Script Info]\nPlayResX: 1280\nPlayResY: 720\n\n[Events]\n\
                   Dialogue: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,{\\c&H0000FF&\\pos(640,360)}Red\n\
                   Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,{\\b1}\n";
        let captions = dialogues_to_captions(&parse_ass(doc));
        assert_eq!(captions.len(), 1);
        assert_eq!(captions[0].color.as_deref(), Some("#FF0000"));
        assert_eq!(captions[0].position_x, Some(50.0));
        assert_eq!(captions[0].position_y, Some(50.0));
        assert_eq!(captions[0].font_size, None);
    }

    #[test]
    fn tags_do_not_run_into_the_next_block() {
        let doc = "[Events]\nDialogue: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,{\\fnArial}{note}Hi\n";
        let captions = dialogues_to_captions(&parse_ass(doc));
        assert_eq!(captions.len(), 1);
        assert_eq!(captions[0].word, "Hi");
        assert_eq!(captions[0].font_family.as_deref(), Some("Arial"));
    }

    #[test]
    fn keeps_trailing_spaces_in_dialogue_text() {
        let doc = "[Events]\n  Dialogue: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,padded  \n";
        let parsed = parse_ass(doc);
        assert_eq!(parsed.dialogues.len(), 1);
        assert_eq!(parsed.dialogues[0].text, "padded  ");
        assert_eq!(parsed.dialogues[0].plain_text, "padded  ");
        assert_eq!(dialogues_to_captions(&parsed)[0].word, "padded");
    }
}
