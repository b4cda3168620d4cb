//! ASS (Advanced SubStation Alpha) document generation.
//!
//! Produces v4.00+ scripts that ffmpeg's `ass` filter and common players
//! accept verbatim: one `Default` style and one dialogue line per caption.

use serde::{Deserialize, Serialize};

use crate::captions::color::hex_to_ass_color;
use crate::captions::timecode::seconds_to_ass_time;
use crate::captions::{Caption, Result, StyleDefaults, resolve_style};

pub const STYLE_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";
pub const EVENT_FORMAT: &str =
    "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// How caption text is written into dialogue lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SerializeMode {
    /// Bare word, styling comes from the `Default` style only
    #[default]
    Plain,
    /// Per-word `\fn \fs \c \pos` override block in front of the word
    StyledOverride,
}

/// One row of the `[V4+ Styles]` section, fields in ASS column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleRecord {
    pub name: String,
    pub font_name: String,
    pub font_size: f64,
    /// Packed `&HAABBGGRR` colors
    pub primary_color: String,
    pub secondary_color: String,
    pub outline_color: String,
    pub back_color: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike_out: bool,
    pub scale_x: f64,
    pub scale_y: f64,
    pub spacing: f64,
    pub angle: f64,
    pub border_style: u8,
    pub outline: f64,
    pub shadow: f64,
    /// Numpad layout: 1-3 bottom, 4-6 middle, 7-9 top
    pub alignment: u8,
    pub margin_l: i32,
    pub margin_r: i32,
    pub margin_v: i32,
    pub encoding: i32,
}

impl StyleRecord {
    /// White text with a thin black outline, bottom-center aligned.
    pub fn default_style(font_name: &str, font_size: f64) -> Self {
        Self {
            name: "Default".to_string(),
            font_name: font_name.to_string(),
            font_size,
            primary_color: "&H00FFFFFF".to_string(),
            secondary_color: "&H000000FF".to_string(),
            outline_color: "&H00000000".to_string(),
            back_color: "&H80000000".to_string(),
            bold: false,
            italic: false,
            underline: false,
            strike_out: false,
            scale_x: 100.0,
            scale_y: 100.0,
            spacing: 0.0,
            angle: 0.0,
            border_style: 1,
            outline: 2.0,
            shadow: 1.0,
            alignment: 2,
            margin_l: 10,
            margin_r: 10,
            margin_v: 30,
            encoding: 1,
        }
    }

    /// Format the style line for the ASS file.
    pub fn to_style_line(&self) -> String {
        let flag = |on: bool| if on { -1 } else { 0 };
        format!(
            "Style: {name},{font},{size},{primary},{secondary},{outline_c},{back},{bold},{italic},{underline},{strike},{sx},{sy},{spacing},{angle},{border},{outline},{shadow},{align},{ml},{mr},{mv},{enc}",
            name = self.name,
            font = self.font_name,
            size = self.font_size,
            primary = self.primary_color,
            secondary = self.secondary_color,
            outline_c = self.outline_color,
            back = self.back_color,
            bold = flag(self.bold),
            italic = flag(self.italic),
            underline = flag(self.underline),
            strike = flag(self.strike_out),
            sx = self.scale_x,
            sy = self.scale_y,
            spacing = self.spacing,
            angle = self.angle,
            border = self.border_style,
            outline = self.outline,
            shadow = self.shadow,
            align = self.alignment,
            ml = self.margin_l,
            mr = self.margin_r,
            mv = self.margin_v,
            enc = self.encoding,
        )
    }
}

/// Document-level settings for [`serialize_ass`].
#[derive(Debug, Clone, PartialEq)]
pub struct AssOptions {
    pub title: String,
    pub play_res_x: u32,
    pub play_res_y: u32,
    pub mode: SerializeMode,
    /// Used for the `Default` style and for unset per-word fields
    pub defaults: StyleDefaults,
}

impl Default for AssOptions {
    fn default() -> Self {
        Self {
            title: "Captions".to_string(),
            play_res_x: 1920,
            play_res_y: 1080,
            mode: SerializeMode::Plain,
            defaults: StyleDefaults::default(),
        }
    }
}

/// Render `captions` as a complete ASS document.
///
/// Fails only when a caption carries a negative time or a malformed color.
pub fn serialize_ass(captions: &[Caption], options: &AssOptions) -> Result<String> {
    let mut output = String::new();

    // Script Info section
    output.push_str("[Script Info]\n");
    output.push_str(&format!("Title: {}\n", options.title));
    output.push_str("ScriptType: v4.00+\n");
    output.push_str("WrapStyle: 0\n");
    output.push_str(&format!("PlayResX: {}\n", options.play_res_x));
    output.push_str(&format!("PlayResY: {}\n", options.play_res_y));
    output.push_str("ScaledBorderAndShadow: yes\n\n");

    // V4+ Styles section, seeded from the first caption
    let first = captions.first();
    let font = first
        .and_then(|c| c.font_family.as_deref())
        .unwrap_or(options.defaults.font_family.as_str());
    let size = first
        .and_then(|c| c.font_size)
        .unwrap_or(options.defaults.font_size);
    let style = StyleRecord::default_style(&sanitize_tag_value(font), size);

    output.push_str("[V4+ Styles]\n");
    output.push_str(STYLE_FORMAT);
    output.push('\n');
    output.push_str(&style.to_style_line());
    output.push_str("\n\n");

    // Events section
    output.push_str("[Events]\n");
    output.push_str(EVENT_FORMAT);
    output.push('\n');

    for caption in captions {
        let text = match options.mode {
            SerializeMode::Plain => escape_ass_text(&caption.word),
            SerializeMode::StyledOverride => styled_text(caption, options)?,
        };
        output.push_str(&format!(
            "Dialogue: 0,{start},{end},{style},,0,0,0,,{text}\n",
            start = seconds_to_ass_time(caption.start)?,
            end = seconds_to_ass_time(caption.end)?,
            style = style.name,
        ));
    }

    Ok(output)
}

/// Override block carrying the caption's own font, size, color and position.
fn styled_text(caption: &Caption, options: &AssOptions) -> Result<String> {
    let resolved = resolve_style(caption, &options.defaults);
    let (px, py) = resolved
        .position
        .to_pixels(options.play_res_x, options.play_res_y);

    Ok(format!(
        "{{\\fn{font}\\fs{size}\\c{color}\\pos({px},{py})}}{text}",
        font = sanitize_tag_value(&resolved.font_family),
        size = resolved.font_size,
        color = hex_to_ass_color(&resolved.color)?,
        text = escape_ass_text(&caption.word),
    ))
}

/// Escape special characters in ASS text.
pub fn escape_ass_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('{', "\\{")
        .replace('}', "\\}")
        .replace('\n', "\\N")
}

/// Font names end at the next `\` or `}` inside a tag, and a `,` would
/// shift the style row's columns.
fn sanitize_tag_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '\\' | '{' | '}' | ',' | '\n'))
        .collect()
}
