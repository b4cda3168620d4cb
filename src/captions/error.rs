use thiserror::Error;

/// Errors raised by the caption core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptionError {
    #[error("invalid time value: {0}")]
    InvalidTime(f64),

    #[error("failed to parse timestamp '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("invalid color '{0}'")]
    InvalidColor(String),

    #[error("invalid timing: {0}")]
    InvalidTiming(String),

    #[error("caption index {index} is out of range (list has {len} captions)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("font size {size} is outside the allowed range {min}..={max}")]
    FontSizeOutOfRange { size: f64, min: f64, max: f64 },
}

impl CaptionError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        CaptionError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CaptionError>;
