//! Capture file lists
//!
//! A [`PcapFileList`] is built once, from a single directory scan, and then
//! drained sequentially with [`PcapFileList::next_file`].
//!
//! There are two ways to build one:
//!
//! - **Seed mode**: the event names a capture file. The list starts with that
//!   file and continues with every file of the same capture thread whose
//!   timestamp is strictly later. Problems reading the directory are logged and
//!   the list degrades to whatever could be read, possibly just the seed.
//! - **Full scan**: there is no capture file to anchor on. The list holds every
//!   file of the directory that conforms to the naming template. Failing to read
//!   the directory is an error.
//!
//! Files are kept in the order the [`DirectorySource`] returned them unless
//! [`FileOrder::Timestamp`] is requested.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::directory::{DirectorySource, FsDirectory};
use crate::error::{Error, Result};
use crate::event::Event;
use crate::pattern::{Candidate, FileNamePattern};
use crate::shared::SharedFileList;

/// Order of the files following the seed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOrder {
    /// Directory enumeration order
    #[default]
    Discovery,
    /// Ascending capture timestamp; files without a usable timestamp go last
    Timestamp,
}

/// An accepted file along with the timestamp used for ordering
#[derive(Debug)]
struct Accepted {
    path: PathBuf,
    timestamp: Option<i64>,
}

/// Builds a [`PcapFileList`] from a directory and a naming template
#[derive(Debug, Clone)]
pub struct FileListBuilder<D = FsDirectory> {
    directory: PathBuf,
    pattern: FileNamePattern,
    order: FileOrder,
    source: D,
}

impl FileListBuilder<FsDirectory> {
    /// Compile `template` and prepare to scan `directory` on the file system
    pub fn new(directory: impl Into<PathBuf>, template: &str) -> Result<Self> {
        Ok(Self::with_pattern(
            directory,
            FileNamePattern::compile(template)?,
        ))
    }

    pub fn with_pattern(directory: impl Into<PathBuf>, pattern: FileNamePattern) -> Self {
        Self {
            directory: directory.into(),
            pattern,
            order: FileOrder::default(),
            source: FsDirectory,
        }
    }
}

impl<D: DirectorySource> FileListBuilder<D> {
    /// Replace the collaborator used to enumerate the directory
    pub fn directory_source<S: DirectorySource>(self, source: S) -> FileListBuilder<S> {
        FileListBuilder {
            directory: self.directory,
            pattern: self.pattern,
            order: self.order,
            source,
        }
    }

    pub fn order(mut self, order: FileOrder) -> Self {
        self.order = order;
        self
    }

    pub fn pattern(&self) -> &FileNamePattern {
        &self.pattern
    }

    /// Build in seed mode when the event names a capture file, otherwise scan
    /// the whole directory.
    pub fn build(self, event: &Event) -> Result<PcapFileList> {
        match event.capture_file() {
            Some(capture_file) => self.build_from_seed(capture_file),
            None => {
                debug!("Scanning will start soon");
                self.scan_directory()
            }
        }
    }

    /// Seed mode: `capture_file` plus the later files of its capture thread
    pub fn build_from_seed(self, capture_file: &str) -> Result<PcapFileList> {
        if capture_file.is_empty() {
            return Err(Error::NoFileAvailable);
        }

        // The seed is a bare name inside the capture directory, never a path.
        let mut components = Path::new(capture_file).components();
        let (Some(Component::Normal(seed_name)), None) = (components.next(), components.next())
        else {
            error!(file = capture_file, "Capture file is not a bare file name");
            return Err(Error::InvalidFileName {
                name: capture_file.to_string(),
            });
        };
        let Some(seed_name) = seed_name.to_str() else {
            return Err(Error::NoFileAvailable);
        };

        let directory = self.directory.as_path();
        let seed = directory.join(seed_name);

        debug!(directory = %directory.display(), "Scanning directory");

        let Some(fields) = self.pattern.fields(seed_name) else {
            error!(
                file = seed_name,
                template = self.pattern.template(),
                "File does not match file format"
            );
            return Err(Error::InvalidFileName {
                name: seed_name.to_string(),
            });
        };

        let seed_thread = match fields.thread() {
            Some(Ok(thread)) => Some(thread),
            Some(Err(err)) => {
                warn!(
                    file = seed_name,
                    value = fields.thread_str().unwrap_or_default(),
                    "Can't parse thread: {}",
                    err
                );
                None
            }
            None => None,
        };

        let seed_timestamp = match fields.timestamp() {
            Some(Ok(timestamp)) => timestamp,
            Some(Err(err)) => {
                warn!(
                    file = seed_name,
                    value = fields.timestamp_str().unwrap_or_default(),
                    "Can't parse timestamp: {}",
                    err
                );
                return Err(Error::InvalidTimestamp {
                    name: seed_name.to_string(),
                    value: fields.timestamp_str().unwrap_or_default().to_string(),
                });
            }
            None => {
                warn!(
                    file = seed_name,
                    template = self.pattern.template(),
                    "File format has no timestamp"
                );
                return Err(Error::InvalidTimestamp {
                    name: seed_name.to_string(),
                    value: String::new(),
                });
            }
        };

        // A failure to read the directory only costs us the later files.
        let entries = match self.source.read_entries(scan_path(directory)) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(directory = %directory.display(), "Can't open directory: {}", err);
                Vec::new()
            }
        };

        let mut accepted = vec![Accepted {
            path: seed.clone(),
            timestamp: Some(seed_timestamp),
        }];

        for name in entries {
            if name == seed_name {
                continue;
            }

            let candidate = self.pattern.classify(&name);
            let (thread, timestamp) = match &candidate {
                Candidate::Unmatched => {
                    debug!(file = %name, "Skipping file not matching file format");
                    continue;
                }
                Candidate::Invalid { field, value } => {
                    warn!(file = %name, %field, %value, "Can't parse integer");
                    continue;
                }
                Candidate::Valid { thread, timestamp } => (*thread, *timestamp),
            };

            // An unknown seed thread cannot match any candidate.
            if self.pattern.has_thread() && (seed_thread.is_none() || thread != seed_thread) {
                debug!(file = %name, "Skipping file from another thread");
                continue;
            }

            let Some(timestamp) = timestamp else {
                continue;
            };

            if timestamp > seed_timestamp {
                info!(file = %name, captured_at = ?candidate.captured_at(), "Adding file");
                accepted.push(Accepted {
                    path: directory.join(&name),
                    timestamp: Some(timestamp),
                });
            } else {
                debug!(file = %name, "Skipping file");
            }
        }

        if self.order == FileOrder::Timestamp {
            // The seed stays in front.
            sort_by_timestamp(&mut accepted[1..]);
        }

        Ok(PcapFileList {
            files: accepted.into_iter().map(|file| file.path).collect(),
            cursor: 0,
            directory: directory.to_path_buf(),
            capture_file: Some(seed_name.to_string()),
            pattern: self.pattern,
        })
    }

    /// Full scan: every conforming file of the directory
    pub fn scan_directory(self) -> Result<PcapFileList> {
        debug!(directory = %self.directory.display(), "Scanning directory");

        let entries = self
            .source
            .read_entries(scan_path(&self.directory))
            .map_err(|source| {
                error!(
                    directory = %self.directory.display(),
                    "Can't open directory: {}", source
                );
                Error::DirectoryUnreadable {
                    path: self.directory.clone(),
                    source,
                }
            })?;

        let mut accepted = Vec::new();

        for name in entries {
            let candidate = self.pattern.classify(&name);
            let timestamp = match &candidate {
                Candidate::Unmatched => continue,
                Candidate::Invalid { .. } => None,
                Candidate::Valid { timestamp, .. } => *timestamp,
            };

            info!(file = %name, captured_at = ?candidate.captured_at(), "Adding file");
            accepted.push(Accepted {
                path: self.directory.join(&name),
                timestamp,
            });
        }

        if self.order == FileOrder::Timestamp {
            sort_by_timestamp(&mut accepted);
        }

        Ok(PcapFileList {
            files: accepted.into_iter().map(|file| file.path).collect(),
            cursor: 0,
            directory: self.directory,
            capture_file: None,
            pattern: self.pattern,
        })
    }
}

fn scan_path(directory: &Path) -> &Path {
    if directory.as_os_str().is_empty() {
        Path::new(".")
    } else {
        directory
    }
}

fn sort_by_timestamp(files: &mut [Accepted]) {
    files.sort_by_key(|file| (file.timestamp.is_none(), file.timestamp));
}

/// An ordered list of capture files, consumed front to back
#[derive(Debug, Clone)]
pub struct PcapFileList {
    // Invariant: entries are unique and kept in acceptance order.
    files: Vec<PathBuf>,
    cursor: usize,
    directory: PathBuf,
    capture_file: Option<String>,
    pattern: FileNamePattern,
}

impl PcapFileList {
    /// Build the list of files relevant to `event` in `directory`.
    ///
    /// Uses seed mode when the event names a capture file and a full scan of
    /// the directory otherwise.
    pub fn new(directory: impl Into<PathBuf>, event: &Event, template: &str) -> Result<Self> {
        FileListBuilder::new(directory, template)?.build(event)
    }

    /// Return the next file, or [`Error::OutOfFiles`] once the list is drained.
    ///
    /// Exhaustion is terminal: further calls keep returning `OutOfFiles`.
    pub fn next_file(&mut self) -> Result<PathBuf> {
        let file = self.files.get(self.cursor).ok_or(Error::OutOfFiles)?;
        self.cursor += 1;
        Ok(file.clone())
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of files not handed out yet
    pub fn remaining(&self) -> usize {
        self.files.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.files.len()
    }

    /// The directory the files were discovered in
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The seed file name, for lists built in seed mode
    pub fn capture_file(&self) -> Option<&str> {
        self.capture_file.as_deref()
    }

    pub fn pattern(&self) -> &FileNamePattern {
        &self.pattern
    }

    /// Hand the files that were not consumed yet to a thread-safe accessor
    pub fn into_shared(self) -> SharedFileList {
        SharedFileList::new(self.files.into_iter().skip(self.cursor).collect())
    }
}

impl Iterator for PcapFileList {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        self.next_file().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}
