use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub const DEFAULT_DB_PATH: &str = ".cache/logbook/logbook.sqlite";
pub const DEFAULT_MANIFEST_DIR: &str = ".cache/logbook/manifests";

#[derive(Parser, Debug)]
#[command(
    name = "logbook-import",
    version,
    about = "Reference data import tooling for the flight logbook"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import aircraft types from the ICAO DOC 8643 registry PDF.
    Aircraft(AircraftArgs),
    /// Import the airport directory CSV.
    Airports(AirportsArgs),
    /// Insert a test pilot with an aircraft and a few logbook entries.
    Seed(SeedArgs),
    /// Show table counts and the last aircraft run.
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AircraftArgs {
    #[arg(long)]
    pub pdf_path: PathBuf,

    #[arg(long, env = "LOGBOOK_DB_PATH", default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    #[arg(long, value_enum, default_value_t = AircraftOutput::Db)]
    pub output: AircraftOutput,

    #[arg(long, default_value = "insert_aircraft_types.sql")]
    pub sql_path: PathBuf,

    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Keep pdftotext's physical layout instead of reading order.
    #[arg(long, default_value_t = false)]
    pub layout: bool,

    #[arg(long, default_value = DEFAULT_MANIFEST_DIR)]
    pub manifest_dir: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum AircraftOutput {
    Db,
    Sql,
}

impl AircraftOutput {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Db => "db",
            Self::Sql => "sql",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct AirportsArgs {
    #[arg(long, default_value = "iata-icao.csv")]
    pub csv_path: PathBuf,

    #[arg(long, env = "LOGBOOK_DB_PATH", default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    #[arg(long, default_value_t = false)]
    pub truncate: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SeedArgs {
    #[arg(long, env = "LOGBOOK_DB_PATH", default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, env = "LOGBOOK_DB_PATH", default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    #[arg(long, default_value = DEFAULT_MANIFEST_DIR)]
    pub manifest_dir: PathBuf,
}
