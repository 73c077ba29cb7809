//! Integration tests building capture file lists from real directories.

use pcap_files::{Error, Event, FileListBuilder, FileOrder, PcapFileList};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Create a directory holding empty files with the given names
fn capture_dir(names: &[&str]) -> TempDir {
    let temp_dir = TempDir::new().expect("create temp dir");
    for name in names {
        fs::write(temp_dir.path().join(name), b"").expect("create capture file");
    }
    temp_dir
}

fn drain(list: &mut PcapFileList) -> Vec<PathBuf> {
    let mut files = Vec::new();
    loop {
        match list.next_file() {
            Ok(file) => files.push(file),
            Err(Error::OutOfFiles) => break,
            Err(err) => panic!("unexpected error: {err}"),
        }
    }
    files
}

#[test]
fn test_seed_mode_selects_later_files_of_same_thread() {
    init_tracing();
    let temp_dir = capture_dir(&[
        "cap.1.100.pcap",
        "cap.1.150.pcap",
        "cap.1.50.pcap",
        "cap.2.200.pcap",
    ]);

    let event = Event::with_capture_file("cap.1.100.pcap");
    let mut list = PcapFileList::new(temp_dir.path(), &event, "cap.%n.%t.pcap").unwrap();

    let files = drain(&mut list);
    assert_eq!(
        files,
        vec![
            temp_dir.path().join("cap.1.100.pcap"),
            temp_dir.path().join("cap.1.150.pcap"),
        ]
    );
    assert!(list.next_file().unwrap_err().is_out_of_files());
}

#[test]
fn test_seed_mode_with_suricata_naming() {
    init_tracing();
    let temp_dir = capture_dir(&[
        "log.pcap.1.1700000000",
        "log.pcap.1.1700000600",
        "log.pcap.1.1700001200",
        "log.pcap.2.1700000300",
        "log.pcap.2.1700000900",
        "eve.json",
        "stats.log",
    ]);

    let event = Event::from_json(
        r#"{"event_type": "alert", "capture_file": "log.pcap.2.1700000300"}"#,
    )
    .unwrap();
    let list = PcapFileList::new(temp_dir.path(), &event, "log.pcap.%n.%t").unwrap();

    assert_eq!(list.capture_file(), Some("log.pcap.2.1700000300"));
    assert_eq!(
        list.files(),
        &[
            temp_dir.path().join("log.pcap.2.1700000300"),
            temp_dir.path().join("log.pcap.2.1700000900"),
        ]
    );
}

#[test]
fn test_seed_mode_missing_directory_keeps_seed() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing");

    let event = Event::with_capture_file("cap.1.100.pcap");
    let list = PcapFileList::new(&missing, &event, "cap.%n.%t.pcap").unwrap();

    assert_eq!(list.files(), &[missing.join("cap.1.100.pcap")]);
}

#[test]
fn test_seed_mode_rejects_non_conforming_seed() {
    init_tracing();
    let temp_dir = capture_dir(&["cap.1.100.pcap"]);

    let event = Event::with_capture_file("cap.one.100.pcap");
    let err = PcapFileList::new(temp_dir.path(), &event, "cap.%n.%t.pcap").unwrap_err();

    assert!(matches!(err, Error::InvalidFileName { .. }));
}

#[test]
fn test_full_scan_includes_only_conforming_files() {
    init_tracing();
    let temp_dir = capture_dir(&[
        "cap.1.100.pcap",
        "cap.2.200.pcap",
        "cap.1.50.pcap",
        "cap.x.300.pcap",
        "cap.1.abc.pcap",
        "cap.1.100.pcap.gz",
        "readme.txt",
    ]);
    fs::create_dir(temp_dir.path().join("cap.3.400.pcap")).unwrap();

    let list = PcapFileList::new(temp_dir.path(), &Event::default(), "cap.%n.%t.pcap").unwrap();

    assert_eq!(list.capture_file(), None);
    assert_eq!(
        list.files(),
        &[
            temp_dir.path().join("cap.1.100.pcap"),
            temp_dir.path().join("cap.1.50.pcap"),
            temp_dir.path().join("cap.2.200.pcap"),
        ]
    );
}

#[test]
fn test_full_scan_timestamp_order() {
    init_tracing();
    let temp_dir = capture_dir(&["cap.1.100.pcap", "cap.2.200.pcap", "cap.1.50.pcap"]);

    let list = FileListBuilder::new(temp_dir.path(), "cap.%n.%t.pcap")
        .unwrap()
        .order(FileOrder::Timestamp)
        .scan_directory()
        .unwrap();

    let names: Vec<_> = list
        .files()
        .iter()
        .map(|path| path.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["cap.1.50.pcap", "cap.1.100.pcap", "cap.2.200.pcap"]);
}

#[test]
fn test_full_scan_missing_directory_fails() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing");

    let err = PcapFileList::new(&missing, &Event::default(), "cap.%n.%t.pcap").unwrap_err();

    match err {
        Error::DirectoryUnreadable { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_shared_list_continues_after_cursor() {
    init_tracing();
    let temp_dir = capture_dir(&["cap.1.100.pcap", "cap.1.200.pcap", "cap.1.300.pcap"]);

    let event = Event::with_capture_file("cap.1.100.pcap");
    let mut list = PcapFileList::new(temp_dir.path(), &event, "cap.%n.%t.pcap").unwrap();
    assert_eq!(list.next_file().unwrap(), temp_dir.path().join("cap.1.100.pcap"));

    let shared = list.into_shared();
    assert_eq!(shared.len(), 2);
    assert_eq!(
        shared.next_file().unwrap(),
        Path::new(temp_dir.path()).join("cap.1.200.pcap")
    );
    assert_eq!(
        shared.next_file().unwrap(),
        temp_dir.path().join("cap.1.300.pcap")
    );
    assert!(shared.next_file().unwrap_err().is_out_of_files());
}

#[test]
fn test_seed_mode_stays_inside_capture_directory() {
    init_tracing();
    let captures = capture_dir(&["cap.1.100.pcap"]);
    let elsewhere = capture_dir(&["cap.1.100.pcap", "cap.1.200.pcap"]);

    let seed = elsewhere.path().join("cap.1.100.pcap");
    let event = Event::with_capture_file(seed.to_str().unwrap());
    let err = PcapFileList::new(captures.path(), &event, "cap.%n.%t.pcap").unwrap_err();

    assert!(matches!(err, Error::InvalidFileName { .. }));
}

#[test]
fn test_full_scan_with_template_without_tokens_lists_nothing() {
    init_tracing();
    let temp_dir = capture_dir(&["capture.pcap", "capture.1.pcap"]);

    let mut list = PcapFileList::new(temp_dir.path(), &Event::default(), "capture.pcap").unwrap();

    assert!(list.is_empty());
    assert!(list.next_file().unwrap_err().is_out_of_files());
}
