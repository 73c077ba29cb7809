//! Capture file discovery for packet extraction
//!
//! This crate works out which rotated packet capture files belong to an event,
//! given the naming template the capture tool uses for its output files.
//!
//! ## Key Components
//!
//! - **Pattern**: compiles a naming template (`%n`, `%i`, `%t` tokens) into a
//!   [`FileNamePattern`] that tests file names and extracts their fields
//! - **File list**: builds a [`PcapFileList`] either anchored on a known capture
//!   file (seed mode) or from every conforming file in a directory (full scan)
//! - **Directory**: the [`DirectorySource`] used to enumerate a directory once
//!
//! ## Usage
//!
//! ```no_run
//! use pcap_files::{Event, PcapFileList};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let event = Event::from_json(r#"{"capture_file": "log.pcap.1.1700000000"}"#)?;
//! let mut files = PcapFileList::new("/var/log/suricata", &event, "log.pcap.%n.%t")?;
//!
//! while let Ok(path) = files.next_file() {
//!     println!("{}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod directory;
pub mod error;
pub mod event;
pub mod file_list;
pub mod pattern;
pub mod shared;

pub use directory::{DirectorySource, FsDirectory};
pub use error::{Error, Result};
pub use event::Event;
pub use file_list::{FileListBuilder, FileOrder, PcapFileList};
pub use pattern::{
    Candidate, Field, FileNamePattern, NameFields, THREAD_ID_TOKEN, THREAD_NUMBER_TOKEN,
    TIMESTAMP_TOKEN, ThreadToken,
};
pub use shared::SharedFileList;
