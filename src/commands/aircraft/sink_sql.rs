use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::sink::{SinkReport, non_empty, persistable_records};
use crate::model::AircraftRecord;
use crate::util::ensure_parent_directory;

const BYTE_ORDER_MARK: &str = "\u{FEFF}";

pub(super) fn write_sql_file(path: &Path, records: &[AircraftRecord]) -> Result<SinkReport> {
    ensure_parent_directory(path)?;

    let file = File::create(path)
        .with_context(|| format!("failed to create sql file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let report = render_aircraft_sql(&mut writer, records)
        .with_context(|| format!("failed to write sql file: {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("failed to flush sql file: {}", path.display()))?;

    Ok(report)
}

/// Emits a BOM-prefixed script that empties aircraft_types and reloads it.
pub(super) fn render_aircraft_sql<W: Write>(
    out: &mut W,
    records: &[AircraftRecord],
) -> Result<SinkReport> {
    let (accepted, skipped) = persistable_records(records);

    write!(out, "{BYTE_ORDER_MARK}")?;
    writeln!(out, "-- Aircraft types from ICAO DOC8643")?;
    writeln!(out)?;
    writeln!(out, "DELETE FROM aircraft_types;")?;
    writeln!(out)?;

    for record in &accepted {
        writeln!(
            out,
            "INSERT INTO aircraft_types (designator, model, manufacturer, wtc) VALUES ({}, {}, {}, {});",
            sql_literal(&record.designator),
            sql_literal(&record.model),
            sql_literal(&record.manufacturer),
            sql_literal(&record.category.to_string()),
        )?;
    }

    Ok(SinkReport {
        written: accepted.len(),
        skipped,
    })
}

fn sql_literal(value: &str) -> String {
    match non_empty(value) {
        Some(text) => format!("'{}'", text.replace('\'', "''")),
        None => "NULL".to_string(),
    }
}
