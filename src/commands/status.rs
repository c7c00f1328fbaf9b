use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::commands::aircraft::RUN_MANIFEST_PREFIX;
use crate::db::count_rows;
use crate::model::AircraftRunManifest;
use crate::util::{latest_json_with_prefix, read_json};

#[derive(Debug, Default, PartialEq, Eq)]
struct TableCounts {
    aircraft_types: i64,
    airports: i64,
    users: i64,
    logbook_entries: i64,
}

pub fn run(args: StatusArgs) -> Result<()> {
    info!(
        db = %args.db_path.display(),
        manifest_dir = %args.manifest_dir.display(),
        "status requested"
    );

    if args.db_path.exists() {
        let connection = Connection::open(&args.db_path)
            .with_context(|| format!("failed to open {}", args.db_path.display()))?;
        let counts = table_counts(&connection);

        info!(
            path = %args.db_path.display(),
            aircraft_types = counts.aircraft_types,
            airports = counts.airports,
            users = counts.users,
            logbook_entries = counts.logbook_entries,
            "database status"
        );
    } else {
        warn!(path = %args.db_path.display(), "database file missing");
    }

    match latest_json_with_prefix(&args.manifest_dir, RUN_MANIFEST_PREFIX)? {
        Some(path) => {
            let manifest: AircraftRunManifest = read_json(&path)?;
            info!(
                path = %path.display(),
                run_id = %manifest.run_id,
                status = %manifest.status,
                updated_at = %manifest.updated_at,
                output = %manifest.output,
                source_sha256 = %manifest.source_sha256,
                records_extracted = manifest.counts.records_extracted,
                lines_rejected = manifest.counts.lines_rejected,
                records_written = manifest.counts.records_written,
                "last aircraft run"
            );
        }
        None => warn!(dir = %args.manifest_dir.display(), "no aircraft run manifest found"),
    }

    Ok(())
}

/// Tables that do not exist yet count as empty.
fn table_counts(connection: &Connection) -> TableCounts {
    TableCounts {
        aircraft_types: count_rows(connection, "aircraft_types").unwrap_or(0),
        airports: count_rows(connection, "airports").unwrap_or(0),
        users: count_rows(connection, "users").unwrap_or(0),
        logbook_entries: count_rows(connection, "logbook_entries").unwrap_or(0),
    }
}
