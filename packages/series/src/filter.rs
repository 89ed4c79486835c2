//! Inclusive date-range clipping of raw records.
//!
//! Dates are `YYYY-MM-DD` strings, so lexicographic order is chronological
//! order and no parsing is needed.

use covid_dash_series_models::{DATE_COLUMN, RawRecord};

/// Errors reported by [`filter_checked`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// Records are not in ascending date order.
    #[error("Records are not sorted by date: row {position} goes backwards")]
    Unsorted {
        /// Zero-based position of the first out-of-order record.
        position: usize,
    },
}

/// Returns the records whose date lies in `[start, end]`, in input order.
///
/// Input must be sorted ascending by date: the scan stops at the first
/// record past `end`, so unsorted input is silently truncated. Use
/// [`filter_checked`] when the ordering is not guaranteed. Records without a
/// date column are skipped.
pub fn filter(
    records: impl IntoIterator<Item = RawRecord>,
    start: &str,
    end: &str,
) -> Vec<RawRecord> {
    let mut kept = Vec::new();

    for record in records {
        let Some(date) = record.get(DATE_COLUMN) else {
            continue;
        };
        if date.as_str() > end {
            break;
        }
        if date.as_str() >= start {
            kept.push(record);
        }
    }

    kept
}

/// Like [`filter`], but verifies the sort precondition first.
///
/// # Errors
///
/// Returns [`FilterError::Unsorted`] if any dated record precedes the
/// previous dated record.
pub fn filter_checked(
    records: Vec<RawRecord>,
    start: &str,
    end: &str,
) -> Result<Vec<RawRecord>, FilterError> {
    let mut previous: Option<&str> = None;
    for (position, record) in records.iter().enumerate() {
        let Some(date) = record.get(DATE_COLUMN) else {
            continue;
        };
        if previous.is_some_and(|prev| date.as_str() < prev) {
            return Err(FilterError::Unsorted { position });
        }
        previous = Some(date);
    }

    Ok(filter(records, start, end))
}
