// SPDX-License-Identifier: MIT OR Apache-2.0
//! Debounced watching of camera path files.
//!
//! Editors often save by writing a temporary file and renaming it over the
//! original, so the watcher observes the parent directory and filters events
//! down to the watched file names.

use notify::RecursiveMode;
use notify_debouncer_full::{
    new_debouncer, notify::EventKind, DebounceEventResult, Debouncer, RecommendedCache,
};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

/// Events emitted by the file watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    /// A watched file was created or modified
    Modified(PathBuf),
    /// A watched file was deleted
    Deleted(PathBuf),
    /// An error occurred
    Error(String),
}

/// Configuration for the file watcher
#[derive(Debug, Clone)]
pub struct FileWatcherConfig {
    /// Debounce duration for events
    pub debounce_duration: Duration,
}

impl Default for FileWatcherConfig {
    fn default() -> Self {
        Self {
            debounce_duration: Duration::from_millis(250),
        }
    }
}

/// Watches individual files for changes
pub struct FileWatcher {
    /// The underlying debounced watcher
    debouncer: Debouncer<notify::RecommendedWatcher, RecommendedCache>,
    /// Receiver for file events
    event_rx: Receiver<FileEvent>,
    /// Watched files, shared with the notify callback
    watched_files: Arc<RwLock<HashSet<PathBuf>>>,
}

impl FileWatcher {
    /// Create a new file watcher with the given configuration
    pub fn new(config: FileWatcherConfig) -> Result<Self, notify::Error> {
        let (event_tx, event_rx) = mpsc::channel();
        let watched_files: Arc<RwLock<HashSet<PathBuf>>> = Arc::default();
        let filter = Arc::clone(&watched_files);

        let debouncer = new_debouncer(
            config.debounce_duration,
            None,
            move |result: DebounceEventResult| match result {
                Ok(events) => {
                    let watched = filter.read();
                    for event in events {
                        for path in event.paths.iter().filter(|p| is_watched(&watched, p)) {
                            let file_event = match event.kind {
                                EventKind::Create(_) | EventKind::Modify(_) => {
                                    FileEvent::Modified(path.clone())
                                }
                                EventKind::Remove(_) => FileEvent::Deleted(path.clone()),
                                EventKind::Any | EventKind::Access(_) | EventKind::Other => {
                                    continue
                                }
                            };
                            let _ = event_tx.send(file_event);
                        }
                    }
                }
                Err(errors) => {
                    for error in errors {
                        let _ = event_tx.send(FileEvent::Error(error.to_string()));
                    }
                }
            },
        )?;

        Ok(Self {
            debouncer,
            event_rx,
            watched_files,
        })
    }

    /// Start watching a file
    pub fn watch(&mut self, path: impl AsRef<Path>) -> Result<(), notify::Error> {
        let path = absolute(path.as_ref());
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        self.debouncer.watch(&dir, RecursiveMode::NonRecursive)?;
        self.watched_files.write().insert(path.clone());
        tracing::info!("Watching camera path for changes: {:?}", path);
        Ok(())
    }

    /// Poll for pending file events (non-blocking)
    pub fn poll_events(&self) -> Vec<FileEvent> {
        let mut events = Vec::new();
        loop {
            match self.event_rx.try_recv() {
                Ok(event) => {
                    if !events.contains(&event) {
                        events.push(event);
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("File watcher channel disconnected");
                    break;
                }
            }
        }
        events
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn is_watched(watched: &HashSet<PathBuf>, path: &Path) -> bool {
    watched.contains(path) || watched.contains(&absolute(path))
}
