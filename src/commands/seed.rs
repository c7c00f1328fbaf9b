use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use tracing::info;

use crate::cli::SeedArgs;
use crate::db::open_database;

const TEST_USERNAME: &str = "pilot";
const TEST_PASSWORD: &str = "hashedpassword";
const ENGINE_TYPE: &str = "Single-Engine";

struct FixtureAircraft {
    registration: &'static str,
    designator: &'static str,
    manufacturer: &'static str,
    model: &'static str,
    wtc: &'static str,
    category: &'static str,
    class: &'static str,
}

const TEST_AIRCRAFT: FixtureAircraft = FixtureAircraft {
    registration: "VH-TAE",
    designator: "P28A",
    manufacturer: "PIPER",
    model: "PA-28-161 Warrior 3",
    wtc: "L",
    category: "A",
    class: "S",
};

struct FixtureFlight {
    flight_date: &'static str,
    pilot_in_command: &'static str,
    details: &'static str,
    airport_id: i64,
    dual_day: f64,
}

/// Dual training sorties out of and back to the same field.
const TEST_FLIGHTS: [FixtureFlight; 3] = [
    FixtureFlight {
        flight_date: "2021-03-03",
        pilot_in_command: "E.TSIATSIKAS",
        details: "EOC",
        airport_id: 675,
        dual_day: 5.9,
    },
    FixtureFlight {
        flight_date: "2021-03-07",
        pilot_in_command: "E.LINCOLN-PRICE",
        details: "S+L",
        airport_id: 675,
        dual_day: 1.0,
    },
    FixtureFlight {
        flight_date: "2021-03-14",
        pilot_in_command: "E.LINCOLN-PRICE",
        details: "C+D",
        airport_id: 675,
        dual_day: 1.0,
    },
];

#[derive(Debug, Serialize)]
struct RouteLeg {
    #[serde(rename = "type")]
    leg_type: &'static str,
    airport_id: i64,
    is_custom: bool,
    custom_name: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct SeedStats {
    user_id: i64,
    aircraft_inserted: usize,
    entries_inserted: usize,
}

pub fn run(args: SeedArgs) -> Result<()> {
    info!(db = %args.db_path.display(), username = TEST_USERNAME, "seeding test data");

    let mut connection = open_database(&args.db_path)?;
    let stats = seed_test_pilot(&mut connection)?;

    info!(
        user_id = stats.user_id,
        aircraft = stats.aircraft_inserted,
        logbook_entries = stats.entries_inserted,
        "test data seeded"
    );

    Ok(())
}

fn round_trip_route(airport_id: i64) -> [RouteLeg; 2] {
    ["departure", "arrival"].map(|leg_type| RouteLeg {
        leg_type,
        airport_id,
        is_custom: false,
        custom_name: None,
    })
}

/// Drops whatever the test pilot owned and inserts the fixtures again.
fn seed_test_pilot(connection: &mut Connection) -> Result<SeedStats> {
    let tx = connection
        .transaction()
        .context("failed to begin seed transaction")?;

    let existing: Option<i64> = tx
        .query_row(
            "SELECT id FROM users WHERE username = ?1",
            [TEST_USERNAME],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(user_id) = existing {
        tx.execute("DELETE FROM logbook_entries WHERE user_id = ?1", [user_id])?;
        tx.execute("DELETE FROM user_aircraft WHERE user_id = ?1", [user_id])?;
        tx.execute("DELETE FROM users WHERE id = ?1", [user_id])?;
        info!(user_id, "removed previous test pilot");
    }

    tx.execute(
        "INSERT INTO users (username, password) VALUES (?1, ?2)",
        [TEST_USERNAME, TEST_PASSWORD],
    )
    .context("failed to insert test user")?;
    let user_id = tx.last_insert_rowid();

    let aircraft = &TEST_AIRCRAFT;
    tx.execute(
        "
        INSERT INTO user_aircraft (
          user_id, aircraft_reg, aircraft_designator, aircraft_manufacturer, aircraft_model,
          aircraft_wtc, aircraft_category, aircraft_class
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ",
        params![
            user_id,
            aircraft.registration,
            aircraft.designator,
            aircraft.manufacturer,
            aircraft.model,
            aircraft.wtc,
            aircraft.category,
            aircraft.class,
        ],
    )
    .context("failed to insert test aircraft")?;

    {
        let mut statement = tx.prepare(
            "
            INSERT INTO logbook_entries (
              user_id, flight_date, aircraft_reg, pilot_in_command, other_crew,
              route_data, details, engine_type, dual_day
            ) VALUES (?1, ?2, ?3, ?4, 'SELF', ?5, ?6, ?7, ?8)
            ",
        )?;

        for flight in &TEST_FLIGHTS {
            let route_data = serde_json::to_string(&round_trip_route(flight.airport_id))
                .context("failed to serialize route data")?;
            statement
                .execute(params![
                    user_id,
                    flight.flight_date,
                    aircraft.registration,
                    flight.pilot_in_command,
                    route_data,
                    flight.details,
                    ENGINE_TYPE,
                    flight.dual_day,
                ])
                .with_context(|| format!("failed to insert flight on {}", flight.flight_date))?;
        }
    }

    tx.commit().context("failed to commit seed data")?;

    Ok(SeedStats {
        user_id,
        aircraft_inserted: 1,
        entries_inserted: TEST_FLIGHTS.len(),
    })
}
