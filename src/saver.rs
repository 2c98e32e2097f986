use crate::constant::DRAFT_FILE_NAME;
use crate::diff::compute_line_diff;
use crate::messages::{ResponseMessage, Review, RevisionSource};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum SaverError {
    #[error("Failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

pub enum SaverMessage {
    Open(PathBuf),
    Save { path: PathBuf, content: String },
    StoreDraft(String),
    ClearDraft,
    /// Read `source`, then diff the editor content against it
    Review {
        id: u64,
        original: String,
        source: RevisionSource,
    },
}

pub struct Saver<F> {
    receiver: Receiver<SaverMessage>,
    response_sender: Sender<ResponseMessage>,
    data_dir: PathBuf,
    /// Wakes the UI after a response is sent
    notify: F,
}

impl<F: Fn()> Saver<F> {
    pub fn new(
        receiver: Receiver<SaverMessage>,
        response_sender: Sender<ResponseMessage>,
        data_dir: PathBuf,
        notify: F,
    ) -> Self {
        Self {
            receiver,
            response_sender,
            data_dir,
            notify,
        }
    }

    pub fn run(&self) {
        while let Ok(message) = self.receiver.recv() {
            let response = match message {
                SaverMessage::Open(path) => Some(ResponseMessage::FileLoaded(
                    read_document(&path)
                        .map(|content| (path, content))
                        .map_err(|e| e.to_string()),
                )),
                SaverMessage::Save { path, content } => Some(ResponseMessage::FileSaved(
                    write_document(&path, &content)
                        .map(|()| (path, content))
                        .map_err(|e| e.to_string()),
                )),
                SaverMessage::StoreDraft(content) => {
                    if let Err(e) = store_draft(&self.data_dir, &content) {
                        error!("Failed to store draft: {}", e);
                    }
                    None
                }
                SaverMessage::ClearDraft => {
                    clear_draft(&self.data_dir);
                    None
                }
                SaverMessage::Review {
                    id,
                    original,
                    source,
                } => Some(ResponseMessage::ReviewReady {
                    id,
                    result: build_review(&original, source).map_err(|e| e.to_string()),
                }),
            };

            if let Some(response) = response {
                if self.response_sender.send(response).is_err() {
                    // the UI is gone
                    break;
                }
                (self.notify)();
            }
        }
    }
}

pub fn spawn_saver<F>(data_dir: PathBuf, notify: F) -> (Sender<SaverMessage>, Receiver<ResponseMessage>)
where
    F: Fn() + Send + 'static,
{
    let (sender, receiver) = std::sync::mpsc::channel();
    let (response_sender, response_receiver) = std::sync::mpsc::channel();
    thread::spawn(move || {
        let saver = Saver::new(receiver, response_sender, data_dir, notify);
        saver.run();
    });
    (sender, response_receiver)
}

pub fn read_document(path: &Path) -> Result<String, SaverError> {
    let content = fs::read_to_string(path).map_err(|source| SaverError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded {:?} ({} bytes)", path, content.len());
    Ok(content)
}

pub fn write_document(path: &Path, content: &str) -> Result<(), SaverError> {
    fs::write(path, content).map_err(|source| SaverError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("File saved successfully to {:?}", path);
    Ok(())
}

fn build_review(original: &str, source: RevisionSource) -> Result<Review, SaverError> {
    let path = match &source {
        RevisionSource::SavedCopy(path) | RevisionSource::File(path) => path,
    };
    let revised = read_document(path)?;
    let diff = compute_line_diff(original, &revised);
    Ok(Review {
        source,
        revised,
        diff,
    })
}

pub fn draft_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DRAFT_FILE_NAME)
}

/// The draft left by the previous session, if any
pub fn load_draft(data_dir: &Path) -> Option<String> {
    let path = draft_path(data_dir);
    if !path.exists() {
        return None;
    }
    match read_document(&path) {
        Ok(content) => Some(content),
        Err(e) => {
            error!("{}", e);
            None
        }
    }
}

pub fn store_draft(data_dir: &Path, content: &str) -> Result<(), SaverError> {
    fs::create_dir_all(data_dir).map_err(|source| SaverError::Write {
        path: data_dir.to_path_buf(),
        source,
    })?;
    let path = draft_path(data_dir);
    fs::write(&path, content).map_err(|source| SaverError::Write { path, source })
}

pub fn clear_draft(data_dir: &Path) {
    let path = draft_path(data_dir);
    if path.exists()
        && let Err(e) = fs::remove_file(&path)
    {
        error!("Failed to remove draft {:?}: {}", path, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn setup_test_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("reddown_test_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup_test_dir(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    fn recv(receiver: &Receiver<ResponseMessage>) -> ResponseMessage {
        receiver.recv_timeout(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn write_then_read() {
        let dir = setup_test_dir();
        let path = dir.join("a.md");
        write_document(&path, "# hi\n").unwrap();
        assert_eq!(read_document(&path).unwrap(), "# hi\n");
        cleanup_test_dir(&dir);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = setup_test_dir();
        let err = read_document(&dir.join("missing.md")).unwrap_err();
        assert!(matches!(err, SaverError::Read { .. }));
        assert!(err.to_string().contains("missing.md"));
        cleanup_test_dir(&dir);
    }

    #[test]
    fn draft_lifecycle() {
        let dir = setup_test_dir();
        let data_dir = dir.join("nested");
        assert_eq!(load_draft(&data_dir), None);

        store_draft(&data_dir, "draft text").unwrap();
        assert_eq!(load_draft(&data_dir).as_deref(), Some("draft text"));

        clear_draft(&data_dir);
        assert_eq!(load_draft(&data_dir), None);
        cleanup_test_dir(&dir);
    }

    #[test]
    fn worker_saves_and_opens() {
        let dir = setup_test_dir();
        let (sender, receiver) = spawn_saver(dir.clone(), || {});
        let path = dir.join("doc.md");

        sender
            .send(SaverMessage::Save {
                path: path.clone(),
                content: "body".to_string(),
            })
            .unwrap();
        match recv(&receiver) {
            ResponseMessage::FileSaved(Ok((saved, content))) => {
                assert_eq!(saved, path);
                assert_eq!(content, "body");
            }
            _ => panic!("expected FileSaved"),
        }

        sender.send(SaverMessage::Open(path.clone())).unwrap();
        match recv(&receiver) {
            ResponseMessage::FileLoaded(Ok((opened, content))) => {
                assert_eq!(opened, path);
                assert_eq!(content, "body");
            }
            _ => panic!("expected FileLoaded"),
        }
        cleanup_test_dir(&dir);
    }

    #[test]
    fn worker_reports_open_failure() {
        let dir = setup_test_dir();
        let (sender, receiver) = spawn_saver(dir.clone(), || {});
        sender.send(SaverMessage::Open(dir.join("nope.md"))).unwrap();
        assert!(matches!(recv(&receiver), ResponseMessage::FileLoaded(Err(_))));
        cleanup_test_dir(&dir);
    }

    #[test]
    fn worker_builds_reviews_with_request_id() {
        let dir = setup_test_dir();
        let path = dir.join("revision.md");
        fs::write(&path, "one\nTWO\nthree").unwrap();

        let (sender, receiver) = spawn_saver(dir.clone(), || {});
        sender
            .send(SaverMessage::Review {
                id: 7,
                original: "one\ntwo\nthree".to_string(),
                source: RevisionSource::File(path.clone()),
            })
            .unwrap();

        match recv(&receiver) {
            ResponseMessage::ReviewReady { id, result } => {
                assert_eq!(id, 7);
                let review = result.unwrap();
                assert_eq!(review.revised, "one\nTWO\nthree");
                assert_eq!(review.source, RevisionSource::File(path));
                assert_eq!(review.diff.stats.changed_lines, 2);
            }
            _ => panic!("expected ReviewReady"),
        }
        cleanup_test_dir(&dir);
    }
}
