//! Aircraft type import from the ICAO DOC 8643 registry PDF.
//!
//! Page text from `pdftotext` is cut into column segments, each
//! segment is parsed into one or two records, and the records replace the
//! aircraft_types relation (or are written out as a SQL script).

mod columns;
mod entry_line;
mod extract;
mod page_text;
mod run;
mod sink;
mod sink_db;
mod sink_sql;
#[cfg(test)]
mod tests;

pub use run::run;

pub const RUN_MANIFEST_PREFIX: &str = "aircraft_run_";
