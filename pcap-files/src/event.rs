//! Events that reference a capture file

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The part of a Suricata EVE record that locates its packets.
///
/// Only `capture_file` matters for building a file list, every other field of
/// the record is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Base name of the capture file holding the event's packets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_file: Option<String>,
}

impl Event {
    /// An event anchored on a known capture file
    pub fn with_capture_file(name: impl Into<String>) -> Self {
        Self {
            capture_file: Some(name.into()),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader(reader: impl std::io::Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// The capture file name, if the event carries a non-empty one
    pub fn capture_file(&self) -> Option<&str> {
        self.capture_file.as_deref().filter(|name| !name.is_empty())
    }
}
