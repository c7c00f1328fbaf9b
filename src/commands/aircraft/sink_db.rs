use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use tracing::info;

use super::sink::{SinkReport, non_empty, persistable_records};
use crate::model::AircraftRecord;

/// Replaces the whole aircraft_types relation with `records` in a single
/// transaction; a failure leaves the previous contents untouched.
pub(super) fn replace_aircraft_types(
    connection: &mut Connection,
    records: &[AircraftRecord],
) -> Result<SinkReport> {
    let (accepted, skipped) = persistable_records(records);

    let tx = connection
        .transaction()
        .context("failed to begin aircraft_types transaction")?;

    let cleared = tx
        .execute("DELETE FROM aircraft_types", [])
        .context("failed to clear aircraft_types")?;
    info!(rows = cleared, "cleared aircraft_types");

    {
        let mut statement = tx.prepare(
            "
            INSERT INTO aircraft_types (designator, model, manufacturer, wtc)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )?;

        for record in &accepted {
            statement
                .execute(params![
                    non_empty(&record.designator),
                    non_empty(&record.model),
                    &record.manufacturer,
                    record.category.to_string(),
                ])
                .with_context(|| {
                    format!("failed to insert aircraft type {}", record.designator)
                })?;
        }
    }

    tx.commit().context("failed to commit aircraft_types")?;

    Ok(SinkReport {
        written: accepted.len(),
        skipped,
    })
}
