//! Delivery of finished export artifacts.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use mapsheet_core::OutputFormat;

/// An encoded export, ready for delivery.
#[derive(Clone)]
pub struct ExportArtifact {
    pub format: OutputFormat,
    /// Suggested file name, extension included.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ExportArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportArtifact")
            .field("format", &self.format)
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Where a finished export goes. The two destinations are mutually
/// exclusive per call: saving produces a file and returns nothing,
/// returning produces no file side effect.
#[derive(Debug, Clone)]
pub enum ExportSink {
    /// Write to this path. A path naming an existing directory gets the
    /// artifact's suggested file name appended.
    Save(PathBuf),
    /// Hand the artifact back to the caller.
    Return,
}

impl ExportSink {
    pub fn deliver(&self, artifact: ExportArtifact) -> Result<Option<ExportArtifact>> {
        match self {
            ExportSink::Save(path) => {
                let target = if path.is_dir() {
                    path.join(&artifact.file_name)
                } else {
                    path.clone()
                };
                fs::write(&target, &artifact.bytes)
                    .with_context(|| format!("Failed to write {}", target.display()))?;
                log::info!("Wrote {} ({} bytes)", target.display(), artifact.bytes.len());
                Ok(None)
            }
            ExportSink::Return => Ok(Some(artifact)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> ExportArtifact {
        ExportArtifact {
            format: OutputFormat::Png,
            file_name: "map-export-2026-01-15.png".to_string(),
            bytes: vec![1, 2, 3, 4],
        }
    }

    #[test]
    fn test_save_into_directory_uses_suggested_name() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ExportSink::Save(dir.path().to_path_buf());
        let returned = sink.deliver(artifact()).unwrap();
        assert!(returned.is_none());
        let written = dir.path().join("map-export-2026-01-15.png");
        assert_eq!(fs::read(written).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_save_to_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.png");
        let sink = ExportSink::Save(path.clone());
        sink.deliver(artifact()).unwrap();
        assert_eq!(fs::read(path).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_return_produces_no_file() {
        let returned = ExportSink::Return.deliver(artifact()).unwrap();
        assert_eq!(returned.unwrap().bytes, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("sheet.png");
        let sink = ExportSink::Save(path);
        assert!(sink.deliver(artifact()).is_err());
    }

    #[test]
    fn test_debug_omits_byte_contents() {
        let text = format!("{:?}", artifact());
        assert!(text.contains("bytes: 4"));
    }
}
