use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SCHEMA_VERSION: u32 = 1;

/// Resolved attribution for a touch, by provenance: platform login,
/// fallback commit-author name, or the unknown sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum AuthorIdentity {
    Login(String),
    Name(String),
    Unknown,
}

impl AuthorIdentity {
    pub fn as_str(&self) -> &str {
        match self {
            AuthorIdentity::Login(login) => login,
            AuthorIdentity::Name(name) => name,
            AuthorIdentity::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for AuthorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchRecord {
    pub file: String,
    pub author: AuthorIdentity,
    pub timestamp: DateTime<Utc>,
}

/// One row of the persisted dataset CSV. Author provenance is not stored;
/// the plot half of the pipeline works on raw strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TouchRow {
    pub file: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// Keep the full commit instant
    Instant,
    /// Truncate timestamps to the calendar day (UTC)
    Day,
}

impl Precision {
    /// Name of the timestamp column in the dataset CSV
    pub fn column(&self) -> &'static str {
        match self {
            Precision::Instant => "timestamp",
            Precision::Day => "date",
        }
    }

    pub fn apply(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Precision::Instant => timestamp,
            Precision::Day => {
                Utc.from_utc_datetime(&timestamp.date_naive().and_time(NaiveTime::MIN))
            }
        }
    }
}

/// Deduplicated touch records in file-processing order, then emission order
/// within a file.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<TouchRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn extend(&mut self, records: Vec<TouchRecord>) {
        self.records.extend(records);
    }

    pub fn earliest(&self) -> Option<DateTime<Utc>> {
        self.records.iter().map(|r| r.timestamp).min()
    }

    pub fn latest(&self) -> Option<DateTime<Utc>> {
        self.records.iter().map(|r| r.timestamp).max()
    }
}

/// Per-file mining counters; `pages` includes the final empty page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub file: String,
    pub touches: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub pages: u32,
    pub error: Option<String>,
}

impl FileReport {
    pub fn new(file: String) -> Self {
        Self {
            file,
            touches: 0,
            duplicates: 0,
            skipped: 0,
            pages: 0,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MineOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository: String,
    pub precision: Precision,
    pub files_processed: usize,
    pub files_failed: usize,
    pub touches: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub reports: Vec<FileReport>,
    pub records: Vec<TouchRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub week_index: i64,
    pub file_index: usize,
    pub author_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorCount {
    pub author: String,
    pub touches: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub start: DateTime<Utc>,
    pub weeks: i64,
    pub files: Vec<String>,
    pub authors: Vec<String>,
    pub top_authors: Vec<AuthorCount>,
    pub points: Vec<PlotPoint>,
}
