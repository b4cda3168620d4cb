//! Delivery of generated text files (subtitles, caption lists).

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// MIME type for a file name, by extension.
pub fn mime_type_for(filename: &str) -> &'static str {
    match Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("ass") | Some("ssa") => "text/x-ssa",
        Some("srt") => "application/x-subrip",
        Some("json") => "application/json",
        _ => "text/plain",
    }
}

/// Where a delivered file ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivered {
    File(PathBuf),
    Stdout,
}

/// Hands generated text to the user, the way a browser download would.
pub trait TextSink {
    fn deliver(&self, filename: &str, content: &str, mime_type: &str) -> Result<Delivered>;
}

/// Writes files into a directory, replacing them atomically.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TextSink for DirectorySink {
    fn deliver(&self, filename: &str, content: &str, _mime_type: &str) -> Result<Delivered> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating export directory {}", self.dir.display()))?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("creating temporary file in {}", self.dir.display()))?;
        tmp.write_all(content.as_bytes())
            .with_context(|| format!("writing {}", target.display()))?;
        tmp.persist(&target)
            .with_context(|| format!("saving {}", target.display()))?;

        Ok(Delivered::File(target))
    }
}

/// Prints file content to standard output.
pub struct StdoutSink;

impl TextSink for StdoutSink {
    fn deliver(&self, _filename: &str, content: &str, _mime_type: &str) -> Result<Delivered> {
        let mut out = io::stdout().lock();
        out.write_all(content.as_bytes())
            .context("writing to stdout")?;
        out.flush().context("flushing stdout")?;
        Ok(Delivered::Stdout)
    }
}

/// Pick a sink for an optional output path: a file path goes to its
/// directory, no path goes to stdout.
pub fn sink_for(output: Option<&Path>) -> (Box<dyn TextSink>, Option<String>) {
    match output {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned());
            (Box::new(DirectorySink::new(dir)), name)
        }
        None => (Box::new(StdoutSink), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_types_by_extension() {
        assert_eq!(mime_type_for("captions.ass"), "text/x-ssa");
        assert_eq!(mime_type_for("captions.SRT"), "application/x-subrip");
        assert_eq!(mime_type_for("captions.json"), "application/json");
        assert_eq!(mime_type_for("notes"), "text/plain");
    }

    #[test]
    fn directory_sink_writes_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("out"));

        let delivered = sink.deliver("a.srt", "first", "application/x-subrip").unwrap();
        let Delivered::File(path) = delivered else {
            panic!("expected a file");
        };
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");

        sink.deliver("a.srt", "second", "application/x-subrip").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn sink_for_splits_output_path() {
        let (_, name) = sink_for(Some(Path::new("subs/out.ass")));
        assert_eq!(name.as_deref(), Some("out.ass"));
        let (_, name) = sink_for(None);
        assert!(name.is_none());
    }
}
