use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or draining a capture file list
#[derive(Debug, Error)]
pub enum Error {
    /// Seed mode was entered without a usable capture file name
    #[error("No file available")]
    NoFileAvailable,

    /// The event's capture file does not conform to the naming template
    #[error("Invalid file name in event: {name}")]
    InvalidFileName { name: String },

    /// The timestamp field of the event's capture file is not an integer
    #[error("Invalid timestamp {value:?} in file name {name}")]
    InvalidTimestamp { name: String, value: String },

    /// The directory could not be enumerated
    #[error("Can't open directory {}: {source}", .path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Every file of the list has been handed out
    #[error("No more files")]
    OutOfFiles,

    /// The naming template produced an invalid regular expression
    #[error("Invalid file name pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The event could not be decoded
    #[error("Invalid event: {0}")]
    Event(#[from] serde_json::Error),
}

impl Error {
    /// Whether this is the normal end-of-list signal rather than a failure
    pub fn is_out_of_files(&self) -> bool {
        matches!(self, Error::OutOfFiles)
    }
}

/// A specialized Result type for capture file list operations
pub type Result<T> = std::result::Result<T, Error>;
