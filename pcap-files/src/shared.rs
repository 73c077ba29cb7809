//! Thread-safe sequential access to a capture file list

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};

/// A file list that several consumers can drain concurrently.
///
/// Clones share the same cursor, so every file is handed out exactly once
/// across all of them.
#[derive(Debug, Clone)]
pub struct SharedFileList {
    files: Arc<[PathBuf]>,
    cursor: Arc<AtomicUsize>,
}

impl SharedFileList {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            files: files.into(),
            cursor: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Return the next file, or [`Error::OutOfFiles`] once every file has been
    /// handed out.
    pub fn next_file(&self) -> Result<PathBuf> {
        let len = self.files.len();
        self.cursor
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |cursor| {
                (cursor < len).then_some(cursor + 1)
            })
            .map(|cursor| self.files[cursor].clone())
            .map_err(|_| Error::OutOfFiles)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.files.len() - self.cursor.load(Ordering::Relaxed)
    }
}
