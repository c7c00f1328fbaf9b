use std::path::PathBuf;

use regex::Regex;
use rusqlite::Connection;

use super::columns::{COLUMN_GAP_PATTERN, is_header_line, split_columns};
use super::entry_line::{DESIGNATOR_PATTERN, EntryLine, LineRejection, parse_entry_line};
use super::extract::AircraftRecordExtractor;
use super::page_text::split_pages;
use super::run::render_aircraft_command;
use super::sink_db::replace_aircraft_types;
use super::sink_sql::{render_aircraft_sql, write_sql_file};
use crate::cli::{AircraftArgs, AircraftOutput};
use crate::db::{count_rows, ensure_schema};
use crate::model::AircraftRecord;

fn designator_regex() -> Regex {
    Regex::new(DESIGNATOR_PATTERN).expect("designator regex compiles")
}

fn record(model: &str, manufacturer: &str, designator: &str, category: &str) -> AircraftRecord {
    AircraftRecord {
        model: model.to_string(),
        manufacturer: manufacturer.to_string(),
        designator: designator.to_string(),
        category: category.parse().expect("category parses"),
    }
}

fn parse(line: &str) -> Result<EntryLine, LineRejection> {
    parse_entry_line(line, &designator_regex())
}

#[test]
fn single_entry_recovers_model_manufacturer_designator_and_category() {
    let entry = parse("269B, SCHWEIZER H269 L").expect("single entry parses");

    assert_eq!(
        entry,
        EntryLine::Single(record("269B", "SCHWEIZER", "H269", "L"))
    );
}

#[test]
fn single_entry_keeps_spaces_and_hyphens_in_names() {
    let entry = parse("A-24 Viking, AEROPRAKT AP24 L").expect("entry parses");
    assert_eq!(
        entry.into_records(),
        vec![record("A-24 Viking", "AEROPRAKT", "AP24", "L")]
    );

    let entry = parse("Citation Longitude, CESSNA AIRCRAFT C700 M").expect("entry parses");
    assert_eq!(
        entry.into_records(),
        vec![record("Citation Longitude", "CESSNA AIRCRAFT", "C700", "M")]
    );
}

#[test]
fn single_entry_accepts_compound_categories() {
    let entry = parse("C-130 Hercules, LOCKHEED C130 L/M").expect("entry parses");

    assert_eq!(entry.into_records()[0].category.to_string(), "L/M");
}

#[test]
fn joint_line_yields_two_records_with_their_own_designators() {
    let entry = parse("610 Evolution, BRUMBY BR61 L 728JET, FAIRCHILD DORNIER J728 M")
        .expect("joint line parses");

    assert_eq!(
        entry,
        EntryLine::Joint(
            record("610 Evolution", "BRUMBY", "BR61", "L"),
            record("728JET", "FAIRCHILD DORNIER", "J728", "M"),
        )
    );
}

#[test]
fn joint_line_splits_on_compound_category() {
    let records = parse("An-12, ANTONOV AN12 M/H A-1 Skyraider, DOUGLAS A1 L")
        .expect("joint line parses")
        .into_records();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0], record("An-12", "ANTONOV", "AN12", "M/H"));
    assert_eq!(records[1], record("A-1 Skyraider", "DOUGLAS", "A1", "L"));
}

#[test]
fn joint_line_with_name_equal_to_category_is_mis_split() {
    // The standalone "M" in the first model becomes the split point, leaving
    // a two-token first entry.
    let rejection =
        parse("Mark M Special, ACME AC01 L Other, BETA BT02 M").expect_err("mis-split");

    assert_eq!(rejection, LineRejection::TooFewTokens(2));
}

#[test]
fn last_token_outside_category_set_is_rejected() {
    assert_eq!(
        parse("269B, SCHWEIZER H269 X"),
        Err(LineRejection::InvalidCategory("X".to_string()))
    );
    assert_eq!(
        parse("269B, SCHWEIZER H269 M/L"),
        Err(LineRejection::InvalidCategory("M/L".to_string()))
    );
}

#[test]
fn malformed_designator_is_rejected() {
    assert_eq!(
        parse("269B, SCHWEIZER h269 L"),
        Err(LineRejection::InvalidDesignator("h269".to_string()))
    );
    assert_eq!(
        parse("269B, SCHWEIZER H2690 L"),
        Err(LineRejection::InvalidDesignator("H2690".to_string()))
    );
}

#[test]
fn entry_without_comma_is_rejected() {
    assert_eq!(parse("269B SCHWEIZER H269 L"), Err(LineRejection::MissingComma));
}

#[test]
fn short_entries_are_rejected() {
    assert_eq!(parse("H269 L"), Err(LineRejection::TooFewTokens(2)));
    assert_eq!(parse("L"), Err(LineRejection::TooFewTokens(1)));
    assert_eq!(
        LineRejection::TooFewTokens(2).to_string(),
        "expected at least 3 tokens in entry, found 2"
    );
}

#[test]
fn joint_line_without_category_token_is_rejected() {
    assert_eq!(
        parse("One, ACME AC01 X Two, BETA BT02 Y"),
        Err(LineRejection::NoCategoryToken)
    );
}

#[test]
fn joint_line_fails_as_a_whole_when_second_entry_is_bad() {
    assert_eq!(
        parse("610 Evolution, BRUMBY BR61 L 728JET, FAIRCHILD DORNIER j728 M"),
        Err(LineRejection::InvalidDesignator("j728".to_string()))
    );
}

#[test]
fn split_columns_interleaves_left_and_right_segments() {
    let gap = Regex::new(COLUMN_GAP_PATTERN).expect("gap regex compiles");
    let page = "\
MODEL, MANUFACTURER                TYPE DESIGNATOR    WTC
   269B, SCHWEIZER H269 L              A-24 Viking, AEROPRAKT AP24 L

   A-1 Skyraider, DOUGLAS A1 L
";

    assert_eq!(
        split_columns(page, &gap),
        vec![
            "269B, SCHWEIZER H269 L",
            "A-24 Viking, AEROPRAKT AP24 L",
            "A-1 Skyraider, DOUGLAS A1 L",
        ]
    );
}

#[test]
fn split_columns_needs_three_spaces_to_cut_a_segment() {
    let gap = Regex::new(COLUMN_GAP_PATTERN).expect("gap regex compiles");

    assert_eq!(
        split_columns("269B,  SCHWEIZER H269 L", &gap),
        vec!["269B,  SCHWEIZER H269 L"]
    );
    assert_eq!(
        split_columns("269B, SCHWEIZER H269 L   A1, DOUGLAS A1 L", &gap),
        vec!["269B, SCHWEIZER H269 L", "A1, DOUGLAS A1 L"]
    );
}

#[test]
fn two_space_run_inside_an_entry_still_parses() {
    let extractor = AircraftRecordExtractor::new().expect("extractor builds");

    let extraction = extractor.extract(&["269B,  SCHWEIZER  H269 L"]);

    assert_eq!(extraction.records, vec![record("269B", "SCHWEIZER", "H269", "L")]);
    assert!(extraction.rejected_lines.is_empty());
}

#[test]
fn extractor_reads_reading_order_pages_as_joint_lines() {
    let extractor = AircraftRecordExtractor::new().expect("extractor builds");
    // Default pdftotext output: both print columns of a row on one line,
    // words separated by single spaces.
    let pages = ["\
MODEL, MANUFACTURER TYPE DESIGNATOR WTC MODEL, MANUFACTURER TYPE DESIGNATOR WTC
269B, SCHWEIZER H269 L A-24 Viking, AEROPRAKT AP24 L
An-12, ANTONOV AN12 M/H A-1 Skyraider, DOUGLAS A1 L
728JET, FAIRCHILD DORNIER J728 M
"];

    let extraction = extractor.extract(&pages);

    assert_eq!(extraction.entry_line_count, 3);
    assert!(extraction.rejected_lines.is_empty());
    assert_eq!(
        extraction.records,
        vec![
            record("269B", "SCHWEIZER", "H269", "L"),
            record("A-24 Viking", "AEROPRAKT", "AP24", "L"),
            record("An-12", "ANTONOV", "AN12", "M/H"),
            record("A-1 Skyraider", "DOUGLAS", "A1", "L"),
            record("728JET", "FAIRCHILD DORNIER", "J728", "M"),
        ]
    );
}

#[test]
fn header_lines_are_recognized() {
    assert!(is_header_line("MODEL, MANUFACTURER    TYPE DESIGNATOR"));
    assert!(is_header_line("MODÈLE, CONSTRUCTEUR"));
    assert!(is_header_line("PART 3 — AIRCRAFT TYPES BY MODEL"));
    assert!(!is_header_line("269B, SCHWEIZER H269 L"));
}

#[test]
fn extractor_skips_headers_and_blank_lines_and_reports_rejections() {
    let extractor = AircraftRecordExtractor::new().expect("extractor builds");
    let pages = vec![
        "PART 3 — AIRCRAFT TYPES BY MODEL\n\n   \n".to_string(),
        "269B, SCHWEIZER H269 L     Bad Entry, NOBODY ZZ99 Q\n\
         610 Evolution, BRUMBY BR61 L 728JET, FAIRCHILD DORNIER J728 M\n"
            .to_string(),
    ];

    let extraction = extractor.extract(&pages);

    assert_eq!(extraction.page_count, 2);
    assert_eq!(extraction.entry_line_count, 3);
    assert_eq!(
        extraction.records,
        vec![
            record("269B", "SCHWEIZER", "H269", "L"),
            record("610 Evolution", "BRUMBY", "BR61", "L"),
            record("728JET", "FAIRCHILD DORNIER", "J728", "M"),
        ]
    );
    assert_eq!(extraction.rejected_lines.len(), 1);
    assert_eq!(extraction.rejected_lines[0].page, 2);
    assert_eq!(extraction.rejected_lines[0].line, "Bad Entry, NOBODY ZZ99 Q");
}

#[test]
fn extractor_keeps_duplicates_and_is_repeatable() {
    let extractor = AircraftRecordExtractor::new().expect("extractor builds");
    let pages = ["269B, SCHWEIZER H269 L     269B, SCHWEIZER H269 L"];

    let first = extractor.extract(&pages);
    let second = extractor.extract(&pages);

    assert_eq!(first.records.len(), 2);
    assert_eq!(first, second);
}

#[test]
fn split_pages_drops_trailing_empty_pages_and_nul_bytes() {
    let pages = split_pages("page one\u{0000}\n\u{000C}page two\n\u{000C}\n\u{000C}");

    assert_eq!(pages, vec!["page one\n".to_string(), "page two\n".to_string()]);
}

#[test]
fn sql_output_starts_with_bom_and_delete_and_escapes_quotes() {
    let records = vec![
        record("O'Neill Special", "O'NEILL", "ONSP", "L"),
        record("269B", "", "H269", "L"),
        record("", "ACME", "AC01", "M"),
    ];

    let mut out = Vec::new();
    let report = render_aircraft_sql(&mut out, &records).expect("render succeeds");
    let sql = String::from_utf8(out).expect("utf-8 output");

    assert_eq!(report.written, 2);
    assert_eq!(report.skipped, 1);
    assert!(sql.starts_with(
        "\u{FEFF}-- Aircraft types from ICAO DOC8643\n\nDELETE FROM aircraft_types;\n\n"
    ));
    assert!(sql.contains("VALUES ('ONSP', 'O''Neill Special', 'O''NEILL', 'L');"));
    assert!(sql.contains("VALUES ('AC01', NULL, 'ACME', 'M');"));
    assert!(!sql.contains("H269"));
    assert_eq!(sql.matches("INSERT INTO").count(), 2);
}

#[test]
fn write_sql_file_creates_parent_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out").join("insert_aircraft_types.sql");

    let report = write_sql_file(&path, &[record("269B", "SCHWEIZER", "H269", "L")])
        .expect("sql file written");

    assert_eq!(report.written, 1);
    let bytes = std::fs::read(&path).expect("sql file readable");
    assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
}

#[test]
fn database_sink_replaces_all_rows_and_skips_missing_manufacturer() {
    let mut connection = Connection::open_in_memory().expect("in-memory db");
    ensure_schema(&connection).expect("schema");

    replace_aircraft_types(
        &mut connection,
        &[
            record("Old", "STALE", "OLD1", "H"),
            record("Older", "STALE", "OLD2", "H"),
        ],
    )
    .expect("first load");

    let report = replace_aircraft_types(
        &mut connection,
        &[
            record("269B", "SCHWEIZER", "H269", "L"),
            record("269B", "SCHWEIZER", "H269", "L"),
            record("Nameless", "", "NM01", "M"),
        ],
    )
    .expect("second load");

    assert_eq!(report.written, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(count_rows(&connection, "aircraft_types").expect("count"), 2);

    let stale: i64 = connection
        .query_row(
            "SELECT COUNT(*) FROM aircraft_types WHERE manufacturer = 'STALE'",
            [],
            |row| row.get(0),
        )
        .expect("stale count");
    assert_eq!(stale, 0);

    let wtc: String = connection
        .query_row(
            "SELECT wtc FROM aircraft_types WHERE designator = 'H269' LIMIT 1",
            [],
            |row| row.get(0),
        )
        .expect("wtc stored");
    assert_eq!(wtc, "L");
}

#[test]
fn render_aircraft_command_includes_sql_path_for_sql_output() {
    let args = AircraftArgs {
        pdf_path: PathBuf::from("DOC8643.pdf"),
        db_path: PathBuf::from("logbook.sqlite"),
        output: AircraftOutput::Sql,
        sql_path: PathBuf::from("insert_aircraft_types.sql"),
        max_pages: Some(4),
        layout: true,
        manifest_dir: PathBuf::from("manifests"),
        manifest_path: None,
        dry_run: true,
    };

    let command = render_aircraft_command(&args);
    assert!(command.contains("--output sql"));
    assert!(command.contains("--sql-path insert_aircraft_types.sql"));
    assert!(command.contains("--max-pages 4 --layout"));
    assert!(command.ends_with("--dry-run"));
    assert!(!command.contains("--db-path"));
}
