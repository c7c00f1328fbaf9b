use tracing::warn;

use crate::model::AircraftRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct SinkReport {
    pub written: usize,
    /// Records dropped at the sink boundary for an empty manufacturer.
    pub skipped: usize,
}

/// Records the aircraft_types relation will accept, plus how many were held back.
pub(super) fn persistable_records(records: &[AircraftRecord]) -> (Vec<&AircraftRecord>, usize) {
    let (accepted, rejected): (Vec<&AircraftRecord>, Vec<&AircraftRecord>) =
        records.iter().partition(|record| record.is_persistable());

    for record in &rejected {
        warn!(
            designator = %record.designator,
            model = %record.model,
            "skipped aircraft record without manufacturer"
        );
    }

    (accepted, rejected.len())
}

pub(super) fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
