use regex::Regex;
use thiserror::Error;

use crate::model::{AircraftRecord, WakeCategory};

pub(super) const DESIGNATOR_PATTERN: &str = r"^[A-Z0-9]{2,4}$";

/// Smallest entry: `<model>, <designator> <category>`.
const MIN_ENTRY_TOKENS: usize = 3;

/// Why an entry line produced no records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum LineRejection {
    #[error("expected at least {min} tokens in entry, found {0}", min = MIN_ENTRY_TOKENS)]
    TooFewTokens(usize),
    #[error("{0:?} is not a wake turbulence category")]
    InvalidCategory(String),
    #[error("{0:?} is not a 2-4 character type designator")]
    InvalidDesignator(String),
    #[error("no comma between model and manufacturer")]
    MissingComma,
    #[error("joint line has no wake turbulence category to split on")]
    NoCategoryToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum EntryLine {
    Single(AircraftRecord),
    /// Two entries printed back to back, in left-to-right order.
    Joint(AircraftRecord, AircraftRecord),
}

impl EntryLine {
    pub(super) fn into_records(self) -> Vec<AircraftRecord> {
        match self {
            Self::Single(record) => vec![record],
            Self::Joint(first, second) => vec![first, second],
        }
    }
}

/// Classifies an entry line by its comma count and parses it.
///
/// A joint line is split right after its first category token. A model or
/// manufacturer name that is itself a category token (`M`, `L/M`, ...) moves
/// that split point; the registry offers no other delimiter, so such lines
/// are mis-attributed rather than detected.
pub(super) fn parse_entry_line(
    line: &str,
    designator_pattern: &Regex,
) -> Result<EntryLine, LineRejection> {
    let tokens = line.split_whitespace().collect::<Vec<&str>>();

    if line.matches(',').count() <= 1 {
        return parse_entry_tokens(&tokens, designator_pattern).map(EntryLine::Single);
    }

    let boundary = tokens
        .iter()
        .position(|token| WakeCategory::is_category_token(token))
        .ok_or(LineRejection::NoCategoryToken)?;
    let (first, second) = tokens.split_at(boundary + 1);

    Ok(EntryLine::Joint(
        parse_entry_tokens(first, designator_pattern)?,
        parse_entry_tokens(second, designator_pattern)?,
    ))
}

fn parse_entry_tokens(
    tokens: &[&str],
    designator_pattern: &Regex,
) -> Result<AircraftRecord, LineRejection> {
    if tokens.len() < MIN_ENTRY_TOKENS {
        return Err(LineRejection::TooFewTokens(tokens.len()));
    }
    let (name_tokens, tail) = tokens.split_at(tokens.len() - 2);
    let (designator, category) = (tail[0], tail[1]);

    let category = category
        .parse::<WakeCategory>()
        .map_err(|_| LineRejection::InvalidCategory(category.to_string()))?;

    if !designator_pattern.is_match(designator) {
        return Err(LineRejection::InvalidDesignator(designator.to_string()));
    }

    let comma_index = name_tokens
        .iter()
        .position(|token| token.contains(','))
        .ok_or(LineRejection::MissingComma)?;

    let model = name_tokens[..=comma_index]
        .join(" ")
        .trim_end_matches(',')
        .to_string();
    let manufacturer = name_tokens[comma_index + 1..].join(" ");

    Ok(AircraftRecord {
        model,
        manufacturer,
        designator: designator.to_string(),
        category,
    })
}
