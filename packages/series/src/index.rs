//! Date-keyed indexing of raw records per hierarchy level.

use std::collections::BTreeMap;

use covid_dash_series_models::{
    CaseCounts, DATE_COLUMN, DateIndex, Level, LevelSeries, REGION_COLUMN, RawRecord,
    RegionCounts,
};

use crate::LoadError;

/// Indexes `records` by date for `level`.
///
/// At [`Level::Country`] a later record for the same date overwrites the
/// earlier one. At [`Level::State`] every date seen gets a region map
/// before any insertion, and a later record for the same `(date, region)`
/// overwrites the earlier one. Records without a date, or state records
/// without a region, are skipped.
#[must_use]
pub fn build(records: &[RawRecord], level: Level) -> LevelSeries {
    match level {
        Level::Country => LevelSeries::Country(build_country(records)),
        Level::State => LevelSeries::State(build_state(records)),
    }
}

fn build_country(records: &[RawRecord]) -> BTreeMap<String, CaseCounts> {
    let mut by_date = BTreeMap::new();

    for record in records {
        let Some(date) = record.get(DATE_COLUMN) else {
            log::debug!("Skipping national record without a date: {record:?}");
            continue;
        };
        by_date.insert(date.clone(), CaseCounts::from_record(record));
    }

    by_date
}

fn build_state(records: &[RawRecord]) -> BTreeMap<String, RegionCounts> {
    let mut by_date: BTreeMap<String, RegionCounts> = records
        .iter()
        .filter_map(|record| record.get(DATE_COLUMN))
        .map(|date| (date.clone(), RegionCounts::new()))
        .collect();

    for record in records {
        let Some(date) = record.get(DATE_COLUMN) else {
            log::debug!("Skipping state record without a date: {record:?}");
            continue;
        };
        let Some(region) = record.get(REGION_COLUMN) else {
            log::warn!("Skipping state record for {date} without a region");
            continue;
        };
        if let Some(regions) = by_date.get_mut(date) {
            regions.insert(region.clone(), CaseCounts::from_record(record));
        }
    }

    by_date
}

/// Makes a state series cover exactly the national timeline.
///
/// Timeline dates the state file lacks get an empty region map.
///
/// # Errors
///
/// Returns [`LoadError::DateMismatch`] for the first state date that is not
/// part of `timeline`.
pub fn align_to_timeline(
    series: LevelSeries,
    timeline: &DateIndex,
) -> Result<LevelSeries, LoadError> {
    let mut by_date = match series {
        LevelSeries::State(by_date) => by_date,
        LevelSeries::Country(_) => return Ok(series),
    };

    if let Some(stray) = by_date.keys().find(|date| !timeline.contains(date)) {
        return Err(LoadError::DateMismatch {
            date: stray.clone(),
        });
    }

    for date in timeline.dates() {
        if !by_date.contains_key(date) {
            log::debug!("No state rows for {date}, using an empty region map");
            by_date.insert(date.clone(), RegionCounts::new());
        }
    }

    Ok(LevelSeries::State(by_date))
}
