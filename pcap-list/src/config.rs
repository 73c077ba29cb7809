use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pcap_files::{Event, FileOrder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CaptureConfig {
    /// Directory the capture tool writes its rotated files to
    pub directory: PathBuf,

    /// Naming template of the capture files (`%n`, `%i`, `%t` tokens)
    pub file_format: String,

    /// Order of the files following the event's capture file
    pub order: FileOrder,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("/var/log/suricata"),
            file_format: String::from("log.pcap.%n.%t"),
            order: FileOrder::Discovery,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// Default log level filter, overridden by `RUST_LOG`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("warn"),
        }
    }
}

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Reading config file {}", path.display()))?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents).context("Parsing YAML configuration")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    Discovery,
    Timestamp,
}

impl From<OrderArg> for FileOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Discovery => FileOrder::Discovery,
            OrderArg::Timestamp => FileOrder::Timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One path per line
    Line,
    /// A JSON array of paths
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "pcap-list")]
#[command(about = "List the capture files holding the packets of an event")]
#[command(version)]
pub struct CliArgs {
    /// Path to a YAML configuration file
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Capture directory (overrides capture.directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Capture file naming template (overrides capture.file_format)
    #[arg(short = 'f', long)]
    pub file_format: Option<String>,

    /// Order of the files following the event's capture file
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// EVE JSON event to anchor on, `-` for stdin
    #[arg(long, conflicts_with = "capture_file")]
    pub event: Option<PathBuf>,

    /// Capture file name to anchor on
    #[arg(long)]
    pub capture_file: Option<String>,

    /// Output format for the file list
    #[arg(long, value_enum, default_value_t = OutputFormat::Line)]
    pub output: OutputFormat,

    /// Log level filter (overrides logging.level)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log to stderr even when running under systemd
    #[arg(long)]
    pub log_stderr: bool,
}

/// Everything a run of pcap-list needs, after merging file and flags
#[derive(Debug)]
pub struct ListConfig {
    pub config: Config,
    pub event: Event,
    pub output: OutputFormat,
    pub log_stderr: bool,
}

impl ListConfig {
    /// Load configuration from the command line and the optional config file
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    pub fn from_args(args: CliArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Config::from_yaml_file(path)
                .with_context(|| format!("Loading config from {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(directory) = args.directory {
            config.capture.directory = directory;
        }
        if let Some(file_format) = args.file_format {
            config.capture.file_format = file_format;
        }
        if let Some(order) = args.order {
            config.capture.order = order.into();
        }
        if let Some(level) = args.log_level {
            config.logging.level = level;
        }

        let event = match (args.event, args.capture_file) {
            (Some(path), _) => read_event(&path)?,
            (None, Some(capture_file)) => Event::with_capture_file(capture_file),
            (None, None) => Event::default(),
        };

        Ok(Self {
            config,
            event,
            output: args.output,
            log_stderr: args.log_stderr,
        })
    }
}

fn read_event(path: &Path) -> Result<Event> {
    if path == Path::new("-") {
        return Event::from_reader(std::io::stdin().lock()).context("Reading event from stdin");
    }

    let json = fs::read_to_string(path)
        .with_context(|| format!("Reading event file {}", path.display()))?;
    Event::from_json(&json).with_context(|| format!("Parsing event file {}", path.display()))
}
