use crate::diff::LineDiff;
use std::path::PathBuf;

/// Where a proposed revision came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionSource {
    /// The copy of the current document on disk
    SavedCopy(PathBuf),
    /// Another file picked by the user
    File(PathBuf),
}

impl RevisionSource {
    pub fn label(&self) -> String {
        match self {
            RevisionSource::SavedCopy(path) => format!("saved copy of {}", path.display()),
            RevisionSource::File(path) => path.display().to_string(),
        }
    }
}

/// A revision diffed against the editor content
#[derive(Debug, Clone)]
pub struct Review {
    pub source: RevisionSource,
    pub revised: String,
    pub diff: LineDiff,
}

/// Response messages from background operations
pub enum ResponseMessage {
    FileLoaded(Result<(PathBuf, String), String>),
    FileSaved(Result<(PathBuf, String), String>),
    /// `id` is the request id the review was asked for with
    ReviewReady { id: u64, result: Result<Review, String> },
}
