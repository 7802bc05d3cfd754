//! Platform share surface.
//!
//! A share target may not exist, may refuse the file, may be cancelled by
//! the user or may fail outright. The exporter treats all of these the same
//! way: fall back to a local preview.

use chrono::NaiveDate;
use thiserror::Error;

use super::{ExportArtifact, SHARE_TEXT, SHARE_TITLE};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    #[error("Sharing is not supported on this platform")]
    Unsupported,

    #[error("Share was cancelled")]
    Cancelled,

    #[error("Share failed: {0}")]
    Failed(String),
}

/// A named file offered to the share target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub files: Vec<ExportFile>,
    pub title: String,
    pub text: String,
}

impl ShareRequest {
    /// The standard request for a rendered roster image.
    pub fn for_artifact(artifact: &ExportArtifact, date: NaiveDate) -> Self {
        Self {
            files: vec![ExportFile {
                name: artifact.file_name(date),
                mime_type: artifact.format.mime_type(),
                bytes: artifact.bytes.clone(),
            }],
            title: SHARE_TITLE.to_string(),
            text: SHARE_TEXT.to_string(),
        }
    }
}

pub trait ShareTarget: Send + Sync {
    /// Whether this target would accept these files.
    fn can_share(&self, files: &[ExportFile]) -> bool;

    /// Hand the files off. Blocks until the share completes or is dismissed.
    fn share(&self, request: &ShareRequest) -> Result<(), ShareError>;
}
