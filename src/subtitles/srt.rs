use anyhow::{Context, Result, bail};

use crate::captions::Caption;
use crate::captions::timecode::{seconds_to_srt_time, srt_time_to_seconds};

#[derive(Debug, Clone, PartialEq)]
pub struct SrtCue {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    pub text: String,
}

pub fn parse_srt(input: &str) -> Result<Vec<SrtCue>> {
    let mut cues = Vec::new();
    let mut lines = input.lines().peekable();

    while let Some(line) = lines.next() {
        let index_line = line.trim().trim_start_matches('\u{feff}');
        if index_line.is_empty() {
            continue;
        }

        // Index line can sometimes be omitted; then this line is the timing line
        let times = if index_line.contains("-->") {
            index_line
        } else {
            lines
                .next()
                .map(str::trim)
                .context("SRT cue is missing a timestamp line")?
        };

        let (start_raw, end_raw) = times
            .split_once("-->")
            .map(|(a, b)| (a.trim(), b.trim()))
            .context("SRT cue timestamp line must contain '-->'")?;

        let start = srt_time_to_seconds(start_raw)
            .with_context(|| format!("Failed to parse SRT start timestamp '{start_raw}'"))?;
        let end = srt_time_to_seconds(end_raw)
            .with_context(|| format!("Failed to parse SRT end timestamp '{end_raw}'"))?;

        if end < start {
            bail!("SRT cue ends before it starts: {start_raw} --> {end_raw}");
        }

        let mut text_lines = Vec::new();
        while let Some(next) = lines.next_if(|next| !next.trim().is_empty()) {
            text_lines.push(next.trim().to_string());
        }

        cues.push(SrtCue {
            start,
            end,
            text: text_lines.join(" "),
        });
    }

    cues.sort_by(|a, b| a.start.total_cmp(&b.start));
    Ok(cues)
}

/// Render captions as numbered SRT cues, one cue per caption.
pub fn write_srt(captions: &[Caption]) -> Result<String> {
    let mut output = String::new();

    for (i, caption) in captions.iter().enumerate() {
        let start = seconds_to_srt_time(caption.start)
            .with_context(|| format!("Invalid start time for caption {}", i + 1))?;
        let end = seconds_to_srt_time(caption.end)
            .with_context(|| format!("Invalid end time for caption {}", i + 1))?;

        output.push_str(&format!("{}\n{} --> {}\n{}\n\n", i + 1, start, end, caption.word));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_srt() {
        let input = "1\n00:00:01,000 --> 00:00:03,500\nHello world!\n\n2\n00:00:04,000 --> 00:00:05,000\nNext line\n";
        let cues = parse_srt(input).expect("parse srt");
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "Hello world!");
        assert_eq!(cues[1].start, 4.0);
    }

    #[test]
    fn parse_multiline_and_missing_index() {
        let input = "00:00:02,000 --> 00:00:03,000\nsecond\n\n\n1\n00:00:00,500 --> 00:00:01,000\nfirst\nline\n";
        let cues = parse_srt(input).expect("parse srt");
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "first line");
        assert_eq!(cues[1].text, "second");
    }

    #[test]
    fn rejects_reversed_cue() {
        let input = "1\n00:00:05,000 --> 00:00:01,000\nbackwards\n";
        assert!(parse_srt(input).is_err());
    }

    #[test]
    fn writes_numbered_cues() {
        let captions = vec![Caption::new("Hello", 0.0, 0.5), Caption::new("world", 0.5, 1.25)];
        let output = write_srt(&captions).expect("write srt");
        assert_eq!(
            output,
            "1\n00:00:00,000 --> 00:00:00,500\nHello\n\n2\n00:00:00,500 --> 00:00:01,250\nworld\n\n"
        );

        let cues = parse_srt(&output).expect("parse written srt");
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[1].text, "world");
    }
}
