//! Directory enumeration used by the file list builder

use std::io;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

/// Lists the entries of a single directory.
///
/// Implementations return entry base names in whatever order they choose; the
/// file list builder keeps that order. An `Err` means the directory itself
/// could not be read.
pub trait DirectorySource {
    fn read_entries(&self, path: &Path) -> io::Result<Vec<String>>;
}

/// Non-recursive file system listing, sorted by file name
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDirectory;

impl DirectorySource for FsDirectory {
    fn read_entries(&self, path: &Path) -> io::Result<Vec<String>> {
        if !std::fs::metadata(path)?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{} is not a directory", path.display()),
            ));
        }

        let mut names = Vec::new();

        let walker = WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => return Err(err.into()),
                Err(err) => {
                    warn!(directory = %path.display(), "Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                debug!(entry = %entry.path().display(), "Skipping sub-directory");
                continue;
            }

            match entry.file_name().to_str() {
                Some(name) => names.push(name.to_string()),
                None => debug!(entry = %entry.path().display(), "Skipping non UTF-8 file name"),
            }
        }

        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_lists_files_sorted_by_name() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b.pcap", "c.pcap", "a.pcap"] {
            fs::write(temp_dir.path().join(name), b"").unwrap();
        }

        let names = FsDirectory.read_entries(temp_dir.path()).unwrap();
        assert_eq!(names, vec!["a.pcap", "b.pcap", "c.pcap"]);
    }

    #[test]
    fn test_skips_sub_directories() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.pcap"), b"").unwrap();
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        fs::write(temp_dir.path().join("nested").join("b.pcap"), b"").unwrap();

        let names = FsDirectory.read_entries(temp_dir.path()).unwrap();
        assert_eq!(names, vec!["a.pcap"]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        let err = FsDirectory.read_entries(&missing).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_regular_file_is_not_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.pcap");
        fs::write(&file, b"").unwrap();

        let err = FsDirectory.read_entries(&file).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotADirectory);
    }
}
