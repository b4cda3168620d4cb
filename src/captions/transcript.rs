//! Turning transcription output into the initial caption list.

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use super::model::Caption;
use crate::subtitles::srt::parse_srt;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TranscriptDocument {
    /// Bare `{word, start, end}` entries, or a caption list carrying styling
    Words(Vec<Caption>),
    Whisper { segments: Vec<WhisperSegment> },
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    #[serde(default)]
    words: Vec<WhisperWord>,
    // Fallback if words are missing (e.g. no alignment)
    #[serde(default)]
    start: f64,
    #[serde(default)]
    end: f64,
    #[serde(default)]
    text: String,
}

/// WhisperX drops timings for words it could not align.
#[derive(Debug, Deserialize)]
struct WhisperWord {
    word: String,
    start: Option<f64>,
    end: Option<f64>,
}

/// Parse a transcript into one caption per word, in transcript order.
///
/// Accepts a bare `[{"word", "start", "end"}]` array, a caption list with
/// styling (kept as is) or WhisperX JSON output. Words are trimmed, blank
/// words are dropped and unaligned WhisperX words are skipped.
pub fn parse_transcript_json(json_str: &str) -> Result<Vec<Caption>> {
    let document: TranscriptDocument =
        serde_json::from_str(json_str).context("Failed to parse transcript JSON")?;

    let words: Vec<Caption> = match document {
        TranscriptDocument::Words(words) => words,
        TranscriptDocument::Whisper { segments } => segments
            .into_iter()
            .flat_map(|segment| {
                if segment.words.is_empty() {
                    vec![Caption::new(segment.text, segment.start, segment.end)]
                } else {
                    segment
                        .words
                        .into_iter()
                        .filter_map(|w| Some(Caption::new(w.word, w.start?, w.end?)))
                        .collect()
                }
            })
            .collect(),
    };

    let mut captions = Vec::with_capacity(words.len());
    for mut caption in words {
        let text = caption.word.trim();
        if text.is_empty() {
            continue;
        }
        if !caption.start.is_finite()
            || !caption.end.is_finite()
            || caption.start < 0.0
            || caption.end < caption.start
        {
            bail!(
                "Transcript word '{text}' has invalid timing {} --> {}",
                caption.start,
                caption.end
            );
        }
        caption.word = text.to_string();
        captions.push(caption);
    }

    Ok(captions)
}

/// Build captions from SRT cues, one caption per cue.
pub fn captions_from_srt(input: &str) -> Result<Vec<Caption>> {
    let cues = parse_srt(input)?;
    Ok(cues
        .into_iter()
        .filter(|cue| !cue.text.trim().is_empty())
        .map(|cue| Caption::new(cue.text, cue.start, cue.end))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_word_array() {
        let json = r#"[{"word":"Hello","start":0.0,"end":0.5},{"word":" world ","start":0.5,"end":1.0}]"#;
        let captions = parse_transcript_json(json).expect("parse transcript");
        assert_eq!(captions.len(), 2);
        assert_eq!(captions[1].word, "world");
        assert_eq!(captions[1].start, 0.5);
        assert!(captions[0].position_x.is_none());
    }

    #[test]
    fn parses_whisperx_segments() {
        let json = r#"{
            "segments": [
                {"start": 0.0, "end": 1.2, "text": " Hi there", "words": [
                    {"word": " Hi", "start": 0.0, "end": 0.4, "score": 0.9},
                    {"word": "3", "score": 0.1},
                    {"word": " there", "start": 0.5, "end": 1.2}
                ]},
                {"start": 2.0, "end": 3.0, "text": " unaligned"}
            ]
        }"#;
        let captions = parse_transcript_json(json).expect("parse whisperx");
        let words: Vec<_> = captions.iter().map(|c| c.word.as_str()).collect();
        assert_eq!(words, ["Hi", "there", "unaligned"]);
        assert_eq!(captions[2].start, 2.0);
    }

    #[test]
    fn normalizes_caption_lists_and_keeps_styling() {
        let json = r##"[
            {"word":" wow","start":0.0,"end":0.5,"color":"#FF0000","positionX":20.0},
            {"word":"  ","start":0.5,"end":1.0}
        ]"##;
        let captions = parse_transcript_json(json).expect("parse caption list");
        assert_eq!(captions.len(), 1);
        assert_eq!(captions[0].word, "wow");
        assert_eq!(captions[0].color.as_deref(), Some("#FF0000"));
        assert_eq!(captions[0].position_x, Some(20.0));

        let json = r#"[{"word":"ok","start":0.0,"end":0.5},{"word":"x","start":-2.0,"end":1.0}]"#;
        assert!(parse_transcript_json(json).is_err());
        let json = r#"[{"word":"back","start":2.0,"end":1.0}]"#;
        assert!(parse_transcript_json(json).is_err());
    }

    #[test]
    fn rejects_garbage_and_bad_timing() {
        assert!(parse_transcript_json("{\"foo\": 1}").is_err());
        assert!(parse_transcript_json(r#"[{"word":"x","start":-1.0,"end":0.5}]"#).is_err());
    }

    #[test]
    fn builds_captions_from_srt() {
        let input = "1\n00:00:01,000 --> 00:00:01,500\nHey\n\n2\n00:00:02,000 --> 00:00:02,400\nyou\n";
        let captions = captions_from_srt(input).expect("parse srt");
        assert_eq!(captions.len(), 2);
        assert_eq!(captions[0].word, "Hey");
        assert!((captions[1].end - 2.4).abs() < 1e-9);
    }
}
