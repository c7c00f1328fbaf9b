use anyhow::{Context, Result};
use regex::Regex;
use tracing::{info, warn};

use super::columns::{COLUMN_GAP_PATTERN, split_columns};
use super::entry_line::{DESIGNATOR_PATTERN, parse_entry_line};
use crate::model::{AircraftRecord, RejectedLine};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct Extraction {
    pub page_count: usize,
    pub entry_line_count: usize,
    /// Scan order, duplicates kept.
    pub records: Vec<AircraftRecord>,
    pub rejected_lines: Vec<RejectedLine>,
}

/// Turns registry page text into aircraft records. Holds only compiled
/// patterns, so the same extractor gives the same output for the same pages.
pub(super) struct AircraftRecordExtractor {
    column_gap: Regex,
    designator: Regex,
}

impl AircraftRecordExtractor {
    pub(super) fn new() -> Result<Self> {
        Ok(Self {
            column_gap: Regex::new(COLUMN_GAP_PATTERN)
                .context("failed to compile column gap regex")?,
            designator: Regex::new(DESIGNATOR_PATTERN)
                .context("failed to compile designator regex")?,
        })
    }

    pub(super) fn extract<S: AsRef<str>>(&self, pages: &[S]) -> Extraction {
        let mut extraction = Extraction {
            page_count: pages.len(),
            ..Extraction::default()
        };

        for (index, page) in pages.iter().enumerate() {
            let page_number = index + 1;
            let entry_lines = split_columns(page.as_ref(), &self.column_gap);
            info!(
                page = page_number,
                entry_lines = entry_lines.len(),
                "processing page"
            );

            extraction.entry_line_count += entry_lines.len();
            for line in entry_lines {
                match parse_entry_line(&line, &self.designator) {
                    Ok(entry) => extraction.records.extend(entry.into_records()),
                    Err(rejection) => {
                        warn!(
                            page = page_number,
                            line = %line,
                            reason = %rejection,
                            "skipped entry line"
                        );
                        extraction.rejected_lines.push(RejectedLine {
                            page: page_number,
                            line,
                            reason: rejection.to_string(),
                        });
                    }
                }
            }
        }

        extraction
    }
}
