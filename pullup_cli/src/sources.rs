//! Frame sources for replaying recorded keypoints.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use pullup_core::error::FrameError;
use pullup_core::openpose::{KeypointLayout, parse_document};
use pullup_core::{KeypointFrame, Point};
use pullup_traits::FrameSource;

type SourceResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

fn io_context(path: &Path, e: &std::io::Error) -> std::io::Error {
    std::io::Error::new(e.kind(), format!("{}: {e}", path.display()))
}

/// OpenPose `--write_json` output directory, replayed in file-name order.
///
/// Documents without any detected person are skipped.
#[derive(Debug)]
pub struct OpenPoseDirSource {
    files: std::vec::IntoIter<PathBuf>,
    layout: KeypointLayout,
    confidence_threshold: f64,
    skipped: u64,
}

impl OpenPoseDirSource {
    pub fn open(
        dir: &Path,
        layout: KeypointLayout,
        confidence_threshold: f64,
    ) -> std::io::Result<Self> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|e| io_context(dir, &e))? {
            let path = entry.map_err(|e| io_context(dir, &e))?.path();
            let is_keypoints = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with("_keypoints.json"));
            if is_keypoints && path.is_file() {
                files.push(path);
            }
        }
        if files.is_empty() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{}: no *_keypoints.json files", dir.display()),
            ));
        }
        files.sort();
        tracing::debug!(dir = %dir.display(), files = files.len(), "openpose replay");
        Ok(Self {
            files: files.into_iter(),
            layout,
            confidence_threshold,
            skipped: 0,
        })
    }

    pub fn remaining(&self) -> usize {
        self.files.len()
    }
}

impl FrameSource for OpenPoseDirSource {
    type Frame = KeypointFrame;

    fn next_frame(&mut self) -> SourceResult<Option<KeypointFrame>> {
        for path in self.files.by_ref() {
            let text = std::fs::read_to_string(&path).map_err(|e| io_context(&path, &e))?;
            match parse_document(&text, self.layout, self.confidence_threshold) {
                Ok(Some(frame)) => return Ok(Some(frame)),
                Ok(None) => {
                    self.skipped += 1;
                    tracing::trace!(file = %path.display(), "no people detected; skipping");
                }
                Err(FrameError::Malformed(msg)) => {
                    return Err(Box::new(FrameError::Malformed(format!(
                        "{}: {msg}",
                        path.display()
                    ))));
                }
                Err(e) => return Err(Box::new(e)),
            }
        }
        if self.skipped > 0 {
            tracing::info!(skipped = self.skipped, "documents without people were skipped");
        }
        Ok(None)
    }
}

/// JSON Lines of `{"Nose": [x, y] | null, ...}` maps. Blank lines are ignored.
pub struct JsonlSource<R> {
    reader: R,
    line_no: u64,
    buf: String,
}

impl<R: BufRead> JsonlSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: String::new(),
        }
    }
}

/// Parse one line into a frame, keeping contract violations typed.
pub fn parse_frame_line(line: &str) -> Result<KeypointFrame, FrameError> {
    let map: BTreeMap<String, Option<Point>> =
        serde_json::from_str(line).map_err(|e| FrameError::Malformed(e.to_string()))?;
    KeypointFrame::try_from(map)
}

impl<R: BufRead> FrameSource for JsonlSource<R> {
    type Frame = KeypointFrame;

    fn next_frame(&mut self) -> SourceResult<Option<KeypointFrame>> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }
            return match parse_frame_line(line) {
                Ok(frame) => Ok(Some(frame)),
                Err(FrameError::Malformed(msg)) => Err(Box::new(FrameError::Malformed(format!(
                    "line {}: {msg}",
                    self.line_no
                )))),
                Err(e) => Err(Box::new(e)),
            };
        }
    }
}
