use std::io;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use rusqlite::{Connection, params};
use serde::Deserialize;
use tracing::{info, warn};

use crate::cli::AirportsArgs;
use crate::db::{count_rows, open_database};

/// One row of the airport directory (`iata, icao, airport_name, country_code,
/// region_name, latitude, longitude`). Empty optional fields read as `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
struct AirportRow {
    iata: Option<String>,
    icao: Option<String>,
    airport_name: String,
    country_code: String,
    region_name: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct AirportImportStats {
    rows_read: usize,
    upserted: usize,
    skipped_without_codes: usize,
    malformed: usize,
}

pub fn run(args: AirportsArgs) -> Result<()> {
    info!(
        csv = %args.csv_path.display(),
        db = %args.db_path.display(),
        truncate = args.truncate,
        "starting airport import"
    );

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(&args.csv_path)
        .with_context(|| format!("failed to open {}", args.csv_path.display()))?;

    let mut connection = open_database(&args.db_path)?;
    let stats = import_airports(&mut connection, &mut reader, args.truncate)?;
    let total = count_rows(&connection, "airports")?;

    info!(
        rows = stats.rows_read,
        upserted = stats.upserted,
        skipped_without_codes = stats.skipped_without_codes,
        malformed = stats.malformed,
        airports_total = total,
        "airport import completed"
    );

    Ok(())
}

/// Upserts every airport keyed by `icao`. A conflicting row only takes the new
/// values while its own `icao` is set; rows without an `icao` never conflict.
fn import_airports<R: io::Read>(
    connection: &mut Connection,
    reader: &mut csv::Reader<R>,
    truncate: bool,
) -> Result<AirportImportStats> {
    let mut stats = AirportImportStats::default();
    let tx = connection
        .transaction()
        .context("failed to begin airports transaction")?;

    if truncate {
        let cleared = tx
            .execute("DELETE FROM airports", [])
            .context("failed to clear airports")?;
        info!(rows = cleared, "cleared airports");
    }

    {
        let mut statement = tx.prepare(
            "
            INSERT INTO airports
              (iata, icao, airport_name, country_code, region_name, latitude, longitude)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(icao) DO UPDATE SET
              iata=excluded.iata,
              airport_name=excluded.airport_name,
              country_code=excluded.country_code,
              region_name=excluded.region_name,
              latitude=excluded.latitude,
              longitude=excluded.longitude
            WHERE airports.icao IS NOT NULL
            ",
        )?;

        for result in reader.deserialize::<AirportRow>() {
            stats.rows_read += 1;
            let row = match result {
                Ok(row) => row,
                Err(error) => {
                    warn!(
                        line = error.position().map(|position| position.line()),
                        error = %error,
                        "skipped malformed airport row"
                    );
                    stats.malformed += 1;
                    continue;
                }
            };

            if row.iata.is_none() && row.icao.is_none() {
                stats.skipped_without_codes += 1;
                continue;
            }

            statement
                .execute(params![
                    row.iata,
                    row.icao,
                    row.airport_name,
                    row.country_code,
                    row.region_name,
                    row.latitude,
                    row.longitude,
                ])
                .with_context(|| {
                    format!(
                        "failed to upsert airport {}",
                        row.icao.as_deref().or(row.iata.as_deref()).unwrap_or("?")
                    )
                })?;
            stats.upserted += 1;
        }
    }

    tx.commit().context("failed to commit airports")?;
    Ok(stats)
}
