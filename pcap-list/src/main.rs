//! pcap-list - print the capture files holding the packets of an event
//!
//! With an event (or a capture file name) the list starts at the event's
//! capture file and follows the later files of the same capture thread.
//! Without one, every file of the capture directory that matches the naming
//! template is listed.

mod config;
mod tracing_config;

use anyhow::{Context, Result};
use config::{ListConfig, OutputFormat};
use pcap_files::{FileListBuilder, PcapFileList};
use std::path::PathBuf;
use tracing_config::{TracingConfig, initialize_tracing};

fn main() -> Result<()> {
    let settings = ListConfig::new()?;

    initialize_tracing(
        &TracingConfig::default()
            .with_log_level(settings.config.logging.level.as_str())
            .with_force_stderr(settings.log_stderr),
    );

    let capture = &settings.config.capture;
    tracing::info!(
        directory = %capture.directory.display(),
        file_format = %capture.file_format,
        order = ?capture.order,
        capture_file = settings.event.capture_file(),
        "Building capture file list"
    );

    let mut list = FileListBuilder::new(&capture.directory, &capture.file_format)
        .with_context(|| format!("Compiling file format {}", capture.file_format))?
        .order(capture.order)
        .build(&settings.event)
        .with_context(|| {
            format!(
                "Building capture file list for {}",
                capture.directory.display()
            )
        })?;

    let files = drain(&mut list)?;
    tracing::info!(count = files.len(), "Capture files listed");

    match settings.output {
        OutputFormat::Line => {
            for file in &files {
                println!("{}", file.display());
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&files)
                .with_context(|| "Failed to serialize to JSON")?;
            println!("{}", json);
        }
    }

    Ok(())
}

/// Pull every file until the list reports it is out of files
fn drain(list: &mut PcapFileList) -> Result<Vec<PathBuf>> {
    let mut files = Vec::with_capacity(list.remaining());

    loop {
        match list.next_file() {
            Ok(file) => files.push(file),
            Err(err) if err.is_out_of_files() => break,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(files)
}
