use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::debug;

use crate::util::{ensure_parent_directory, now_utc_string};

pub const DB_SCHEMA_VERSION: &str = "0.1.0";

/// Opens (creating if needed) the logbook database and makes sure every table
/// the importers write to exists.
pub fn open_database(db_path: &Path) -> Result<Connection> {
    ensure_parent_directory(db_path)?;

    let connection = Connection::open(db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    configure_connection(&connection)?;
    ensure_schema(&connection)?;

    debug!(path = %db_path.display(), "database ready");
    Ok(connection)
}

fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    connection
        .pragma_update(None, "foreign_keys", "ON")
        .context("failed to enable foreign_keys")?;
    Ok(())
}

pub fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS metadata (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS aircraft_types (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              designator TEXT,
              model TEXT,
              manufacturer TEXT NOT NULL,
              wtc TEXT
            );

            CREATE TABLE IF NOT EXISTS airports (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              iata TEXT,
              icao TEXT UNIQUE,
              airport_name TEXT,
              country_code TEXT,
              region_name TEXT,
              latitude REAL,
              longitude REAL
            );

            CREATE TABLE IF NOT EXISTS users (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              username TEXT NOT NULL UNIQUE,
              password TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS user_aircraft (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              user_id INTEGER NOT NULL,
              aircraft_reg TEXT NOT NULL,
              aircraft_designator TEXT,
              aircraft_manufacturer TEXT,
              aircraft_model TEXT,
              aircraft_wtc TEXT,
              aircraft_category TEXT,
              aircraft_class TEXT,
              FOREIGN KEY(user_id) REFERENCES users(id)
            );

            CREATE TABLE IF NOT EXISTS logbook_entries (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              user_id INTEGER NOT NULL,
              flight_date TEXT NOT NULL,
              aircraft_reg TEXT,
              pilot_in_command TEXT,
              other_crew TEXT,
              route_data TEXT,
              details TEXT,
              engine_type TEXT,
              icus_day REAL DEFAULT 0,
              icus_night REAL DEFAULT 0,
              dual_day REAL DEFAULT 0,
              dual_night REAL DEFAULT 0,
              command_day REAL DEFAULT 0,
              command_night REAL DEFAULT 0,
              co_pilot_day REAL DEFAULT 0,
              co_pilot_night REAL DEFAULT 0,
              instrument_flight REAL DEFAULT 0,
              instrument_sim REAL DEFAULT 0,
              FOREIGN KEY(user_id) REFERENCES users(id)
            );

            CREATE INDEX IF NOT EXISTS idx_aircraft_types_designator ON aircraft_types(designator);
            CREATE INDEX IF NOT EXISTS idx_user_aircraft_user ON user_aircraft(user_id);
            CREATE INDEX IF NOT EXISTS idx_logbook_entries_user_date ON logbook_entries(user_id, flight_date);
            ",
        )
        .context("failed to initialize logbook schema")?;

    let now = now_utc_string();
    connection.execute(
        "INSERT INTO metadata(key, value) VALUES('db_schema_version', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        [DB_SCHEMA_VERSION],
    )?;
    connection.execute(
        "INSERT INTO metadata(key, value) VALUES('db_updated_at', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        [now],
    )?;

    Ok(())
}

pub fn count_rows(connection: &Connection, table: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    let count = connection
        .query_row(&sql, [], |row| row.get(0))
        .with_context(|| format!("failed to count rows in {table}"))?;
    Ok(count)
}
