use anyhow::{Result, bail};
use chrono::Utc;
use tracing::info;

use super::RUN_MANIFEST_PREFIX;
use super::extract::AircraftRecordExtractor;
use super::page_text::{extract_page_texts, pdftotext_version};
use super::sink::{SinkReport, persistable_records};
use super::sink_db::replace_aircraft_types;
use super::sink_sql::write_sql_file;
use crate::cli::{AircraftArgs, AircraftOutput};
use crate::db::{count_rows, open_database};
use crate::model::{AircraftRunCounts, AircraftRunManifest};
use crate::util::{now_utc_string, sha256_file, utc_compact_string, write_json_pretty};

pub fn run(args: AircraftArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("aircraft-{}", utc_compact_string(started_ts));
    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        args.manifest_dir.join(format!(
            "{RUN_MANIFEST_PREFIX}{}.json",
            utc_compact_string(started_ts)
        ))
    });

    if !args.pdf_path.is_file() {
        bail!("registry PDF not found: {}", args.pdf_path.display());
    }

    info!(
        pdf = %args.pdf_path.display(),
        output = args.output.as_str(),
        run_id = %run_id,
        "starting aircraft import"
    );

    let pdftotext_version = pdftotext_version()?;
    let source_sha256 = sha256_file(&args.pdf_path)?;
    let pages = extract_page_texts(&args.pdf_path, args.max_pages, args.layout)?;

    let extractor = AircraftRecordExtractor::new()?;
    let extraction = extractor.extract(&pages);
    info!(
        pages = extraction.page_count,
        entry_lines = extraction.entry_line_count,
        records = extraction.records.len(),
        rejected_lines = extraction.rejected_lines.len(),
        "extraction finished"
    );

    let (report, output_path) = if args.dry_run {
        let (_, skipped) = persistable_records(&extraction.records);
        (
            SinkReport {
                written: 0,
                skipped,
            },
            None,
        )
    } else {
        match args.output {
            AircraftOutput::Db => {
                let mut connection = open_database(&args.db_path)?;
                let report = replace_aircraft_types(&mut connection, &extraction.records)?;
                let total = count_rows(&connection, "aircraft_types")?;
                info!(path = %args.db_path.display(), rows = total, "aircraft_types reloaded");
                (report, Some(args.db_path.display().to_string()))
            }
            AircraftOutput::Sql => {
                let report = write_sql_file(&args.sql_path, &extraction.records)?;
                info!(path = %args.sql_path.display(), "wrote aircraft sql file");
                (report, Some(args.sql_path.display().to_string()))
            }
        }
    };

    let manifest = AircraftRunManifest {
        manifest_version: 1,
        run_id,
        status: if args.dry_run { "dry_run" } else { "completed" }.to_string(),
        started_at,
        updated_at: now_utc_string(),
        command: render_aircraft_command(&args),
        pdftotext_version,
        source_path: args.pdf_path.display().to_string(),
        source_sha256,
        output: args.output.as_str().to_string(),
        output_path,
        counts: AircraftRunCounts {
            page_count: extraction.page_count,
            entry_line_count: extraction.entry_line_count,
            records_extracted: extraction.records.len(),
            lines_rejected: extraction.rejected_lines.len(),
            records_skipped_at_sink: report.skipped,
            records_written: report.written,
        },
        rejected_lines: extraction.rejected_lines,
    };
    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote aircraft run manifest");

    info!(
        imported = report.written,
        skipped = report.skipped,
        dry_run = args.dry_run,
        "aircraft import completed"
    );

    Ok(())
}

pub(super) fn render_aircraft_command(args: &AircraftArgs) -> String {
    let mut command = vec![
        "logbook-import".to_string(),
        "aircraft".to_string(),
        "--pdf-path".to_string(),
        args.pdf_path.display().to_string(),
        "--output".to_string(),
        args.output.as_str().to_string(),
    ];

    match args.output {
        AircraftOutput::Db => {
            command.push("--db-path".to_string());
            command.push(args.db_path.display().to_string());
        }
        AircraftOutput::Sql => {
            command.push("--sql-path".to_string());
            command.push(args.sql_path.display().to_string());
        }
    }
    if let Some(max_pages) = args.max_pages {
        command.push("--max-pages".to_string());
        command.push(max_pages.to_string());
    }
    if args.layout {
        command.push("--layout".to_string());
    }
    if let Some(path) = &args.manifest_path {
        command.push("--manifest-path".to_string());
        command.push(path.display().to_string());
    }
    if args.dry_run {
        command.push("--dry-run".to_string());
    }

    command.join(" ")
}
