//! Naming template compiler
//!
//! Capture tools name their rotated output files from a template in which a few
//! tokens are expanded when a file is opened:
//!
//! - `%n` -- thread number
//! - `%i` -- thread id
//! - `%t` -- timestamp (Unix epoch seconds)
//!
//! A [`FileNamePattern`] is the compiled form of such a template. It checks
//! whether a file name was produced by the template and extracts the thread
//! identity and timestamp fields from it.

use std::fmt;
use std::num::ParseIntError;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{debug, warn};

use crate::error::Result;

pub const THREAD_NUMBER_TOKEN: &str = "%n";
pub const THREAD_ID_TOKEN: &str = "%i";
pub const TIMESTAMP_TOKEN: &str = "%t";

// All tokens share the same width.
const TOKEN_LEN: usize = 2;

const DIGITS: &str = "[0-9]+";
const CAPTURED_DIGITS: &str = "([0-9]+)";

/// The token that carries the thread identity of a capture file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadToken {
    /// `%n`
    Number,
    /// `%i`
    Id,
}

impl ThreadToken {
    pub fn token(self) -> &'static str {
        match self {
            ThreadToken::Number => THREAD_NUMBER_TOKEN,
            ThreadToken::Id => THREAD_ID_TOKEN,
        }
    }
}

/// A field extracted from a capture file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Thread,
    Timestamp,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Thread => f.write_str("thread"),
            Field::Timestamp => f.write_str("timestamp"),
        }
    }
}

/// Raw digit strings captured from a conforming file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameFields<'a> {
    thread: Option<&'a str>,
    timestamp: Option<&'a str>,
}

impl<'a> NameFields<'a> {
    pub fn thread_str(&self) -> Option<&'a str> {
        self.thread
    }

    pub fn timestamp_str(&self) -> Option<&'a str> {
        self.timestamp
    }

    /// Parse the thread identity. `None` when the template has no thread token.
    pub fn thread(&self) -> Option<std::result::Result<u64, ParseIntError>> {
        self.thread.map(str::parse)
    }

    /// Parse the timestamp. `None` when the template has no timestamp token.
    pub fn timestamp(&self) -> Option<std::result::Result<i64, ParseIntError>> {
        self.timestamp.map(str::parse)
    }
}

/// Outcome of testing a single directory entry against a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// The name was not produced by the template
    Unmatched,
    /// The name conforms but one of its fields does not fit in an integer
    Invalid { field: Field, value: String },
    /// The name conforms and every field present was parsed
    Valid {
        thread: Option<u64>,
        timestamp: Option<i64>,
    },
}

impl Candidate {
    pub fn is_match(&self) -> bool {
        !matches!(self, Candidate::Unmatched)
    }

    /// Capture start time of a valid candidate
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Candidate::Valid {
                timestamp: Some(timestamp),
                ..
            } => DateTime::from_timestamp(*timestamp, 0),
            _ => None,
        }
    }
}

/// Compiled naming template
#[derive(Debug, Clone)]
pub struct FileNamePattern {
    template: String,
    regex: Regex,
    thread_token: Option<ThreadToken>,
    // Ordinals of the capture groups; `None` when the token is absent.
    thread_group: Option<usize>,
    timestamp_group: Option<usize>,
    // Set when the template has no tokens at all; such a rule rejects every name.
    matches_nothing: bool,
}

impl FileNamePattern {
    /// Compile a naming template.
    ///
    /// `%n` takes priority over `%i` as the thread identity. Capture groups are
    /// numbered in the order their tokens first appear in the template, and
    /// everything that is not an active token is matched literally.
    pub fn compile(template: &str) -> Result<Self> {
        let (thread_token, thread_pos) = match template.find(THREAD_NUMBER_TOKEN) {
            Some(pos) => (Some(ThreadToken::Number), Some(pos)),
            None => match template.find(THREAD_ID_TOKEN) {
                Some(pos) => (Some(ThreadToken::Id), Some(pos)),
                None => (None, None),
            },
        };
        let timestamp_pos = template.find(TIMESTAMP_TOKEN);

        let (thread_group, timestamp_group) = match (thread_pos, timestamp_pos) {
            (Some(thread), Some(timestamp)) if thread < timestamp => (Some(1), Some(2)),
            (Some(_), Some(_)) => (Some(2), Some(1)),
            (Some(_), None) => (Some(1), None),
            (None, Some(_)) => (None, Some(1)),
            (None, None) => (None, None),
        };

        // (position, captured) for every token that gets expanded
        let mut tokens = Vec::with_capacity(3);
        tokens.extend(thread_pos.map(|pos| (pos, true)));
        tokens.extend(timestamp_pos.map(|pos| (pos, true)));
        if thread_token == Some(ThreadToken::Number) {
            // An unused thread id still expands to digits in the file name.
            tokens.extend(template.find(THREAD_ID_TOKEN).map(|pos| (pos, false)));
        }
        tokens.sort_unstable();

        let mut expr = String::with_capacity(template.len() + 32);
        expr.push('^');
        let mut literal_start = 0;
        for (pos, captured) in tokens {
            expr.push_str(&regex::escape(&template[literal_start..pos]));
            expr.push_str(if captured { CAPTURED_DIGITS } else { DIGITS });
            literal_start = pos + TOKEN_LEN;
        }
        expr.push_str(&regex::escape(&template[literal_start..]));
        expr.push('$');

        let matches_nothing = thread_pos.is_none() && timestamp_pos.is_none();
        if matches_nothing {
            warn!(template, "File format has no tokens, no file will match");
        }

        debug!(
            template,
            regexp = %expr,
            thread_token = thread_token.map(ThreadToken::token),
            "Using regexp"
        );

        Ok(Self {
            template: template.to_string(),
            regex: Regex::new(&expr)?,
            thread_token,
            thread_group,
            timestamp_group,
            matches_nothing,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// The compiled regular expression
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn thread_token(&self) -> Option<ThreadToken> {
        self.thread_token
    }

    pub fn thread_group(&self) -> Option<usize> {
        self.thread_group
    }

    pub fn timestamp_group(&self) -> Option<usize> {
        self.timestamp_group
    }

    pub fn has_thread(&self) -> bool {
        self.thread_group.is_some()
    }

    pub fn is_match(&self, name: &str) -> bool {
        !self.matches_nothing && self.regex.is_match(name)
    }

    /// Extract the raw fields of a conforming file name
    pub fn fields<'a>(&self, name: &'a str) -> Option<NameFields<'a>> {
        if self.matches_nothing {
            return None;
        }

        let captures = self.regex.captures(name)?;
        let group = |ordinal: Option<usize>| {
            ordinal
                .and_then(|ordinal| captures.get(ordinal))
                .map(|m| m.as_str())
        };

        Some(NameFields {
            thread: group(self.thread_group),
            timestamp: group(self.timestamp_group),
        })
    }

    /// Test a file name and parse its fields
    pub fn classify(&self, name: &str) -> Candidate {
        let Some(fields) = self.fields(name) else {
            return Candidate::Unmatched;
        };

        let thread = match fields.thread() {
            None => None,
            Some(Ok(thread)) => Some(thread),
            Some(Err(_)) => {
                return Candidate::Invalid {
                    field: Field::Thread,
                    value: fields.thread.unwrap_or_default().to_string(),
                };
            }
        };

        let timestamp = match fields.timestamp() {
            None => None,
            Some(Ok(timestamp)) => Some(timestamp),
            Some(Err(_)) => {
                return Candidate::Invalid {
                    field: Field::Timestamp,
                    value: fields.timestamp.unwrap_or_default().to_string(),
                };
            }
        };

        Candidate::Valid { thread, timestamp }
    }
}

impl fmt::Display for FileNamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}
