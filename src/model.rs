use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One wake-turbulence class as printed in DOC 8643.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WakeClass {
    Light,
    Medium,
    Super,
    Heavy,
}

impl WakeClass {
    pub fn code(self) -> char {
        match self {
            Self::Light => 'L',
            Self::Medium => 'M',
            Self::Super => 'J',
            Self::Heavy => 'H',
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "L" => Some(Self::Light),
            "M" => Some(Self::Medium),
            "J" => Some(Self::Super),
            "H" => Some(Self::Heavy),
            _ => None,
        }
    }
}

/// Wake-turbulence category: a single class or a slash-joined compound such as
/// `L/M`. Each class appears at most once, in `L`, `M`, `J`, `H` order, which
/// is also the declaration order of [`WakeClass`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WakeCategory {
    classes: Vec<WakeClass>,
}

impl WakeCategory {
    /// True when `token` is one of the fifteen category tokens.
    pub fn is_category_token(token: &str) -> bool {
        token.parse::<WakeCategory>().is_ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown wake turbulence category: {0}")]
pub struct UnknownWakeCategory(pub String);

impl FromStr for WakeCategory {
    type Err = UnknownWakeCategory;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let mut classes = Vec::with_capacity(4);
        for code in token.split('/') {
            let class =
                WakeClass::from_code(code).ok_or_else(|| UnknownWakeCategory(token.to_string()))?;
            if classes.last().is_some_and(|previous| *previous >= class) {
                return Err(UnknownWakeCategory(token.to_string()));
            }
            classes.push(class);
        }

        Ok(Self { classes })
    }
}

impl fmt::Display for WakeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, class) in self.classes.iter().enumerate() {
            if index > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", class.code())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AircraftRecord {
    pub model: String,
    pub manufacturer: String,
    pub designator: String,
    pub category: WakeCategory,
}

impl AircraftRecord {
    /// Manufacturer is the only field the aircraft_types sink requires.
    pub fn is_persistable(&self) -> bool {
        !self.manufacturer.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedLine {
    pub page: usize,
    pub line: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AircraftRunCounts {
    pub page_count: usize,
    pub entry_line_count: usize,
    pub records_extracted: usize,
    pub lines_rejected: usize,
    pub records_skipped_at_sink: usize,
    pub records_written: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AircraftRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub pdftotext_version: String,
    pub source_path: String,
    pub source_sha256: String,
    pub output: String,
    pub output_path: Option<String>,
    pub counts: AircraftRunCounts,
    pub rejected_lines: Vec<RejectedLine>,
}
