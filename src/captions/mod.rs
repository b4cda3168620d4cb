//! Caption core: timing, styling and placement of word-level captions.
//!
//! Everything in here is pure and synchronous. Functions take the caption
//! list by reference and hand back new data; only [`edit`] mutates, and only
//! the list the caller passes in.

pub mod color;
pub mod edit;
mod error;
pub mod keyword;
pub mod model;
pub mod optimize;
pub mod placement;
pub mod timecode;
pub mod transcript;

pub use error::{CaptionError, Result};
pub use model::{Caption, Position, StyleDefaults, resolve_style};
