use regex::Regex;

/// Column gap in the page text. Ordinary word spacing in the registry never
/// reaches three spaces, the gutter between print columns always does.
pub(super) const COLUMN_GAP_PATTERN: &str = r"\s{3,}";

/// Running headers printed on every page of DOC 8643 part 3.
const HEADER_MARKERS: [&str; 3] = [
    "MODEL, MANUFACTURER",
    "MODÈLE, CONSTRUCTEUR",
    "PART 3 — AIRCRAFT TYPES BY",
];

pub(super) fn is_header_line(line: &str) -> bool {
    HEADER_MARKERS.iter().any(|marker| line.contains(marker))
}

/// Splits one page into entry lines, left column segment before right column
/// segment for each printed line.
pub(super) fn split_columns(page_text: &str, column_gap: &Regex) -> Vec<String> {
    page_text
        .lines()
        .filter(|line| !line.trim().is_empty() && !is_header_line(line))
        .flat_map(|line| column_gap.split(line.trim()))
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
