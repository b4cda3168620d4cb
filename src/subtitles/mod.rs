//! Subtitle file formats.
//!
//! This module provides functionality to:
//! - Render a caption list as an ASS (Advanced SubStation Alpha) document
//! - Parse ASS documents back into styles, dialogue lines and captions
//! - Read and write SRT for plain subtitle export

pub mod ass;
pub mod ass_parse;
pub mod srt;

pub use ass::{AssOptions, SerializeMode, serialize_ass};
pub use ass_parse::{ParsedAss, dialogues_to_captions, parse_ass};
