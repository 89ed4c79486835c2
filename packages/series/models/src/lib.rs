#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Case/death series types shared across the dashboard toolchain.
//!
//! Raw CSV rows arrive as [`RawRecord`] maps. They are indexed per
//! hierarchy [`Level`] into a [`LevelSeries`], and both levels together
//! with the canonical timeline form a [`Dataset`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Column holding the `YYYY-MM-DD` calendar day.
pub const DATE_COLUMN: &str = "date";
/// Column holding the region name in state-level files.
pub const REGION_COLUMN: &str = "state";
/// Column holding the cumulative case count.
pub const CASES_COLUMN: &str = "cases";
/// Column holding the cumulative death count.
pub const DEATHS_COLUMN: &str = "deaths";

/// One raw CSV row, keyed by column header.
pub type RawRecord = BTreeMap<String, String>;

/// Per-region counts for a single date.
pub type RegionCounts = BTreeMap<String, CaseCounts>;

/// Granularity of aggregation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Level {
    /// Single national series.
    Country,
    /// Per-region series keyed by state name.
    State,
}

impl Level {
    /// Returns all supported levels, coarsest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Country, Self::State]
    }
}

/// Parses a count the way the upstream files are read: leading whitespace,
/// an optional sign, then decimal digits. Anything after the digits is
/// ignored. Input with no leading digits yields `NaN`.
#[must_use]
pub fn parse_count(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return f64::NAN;
    }

    let magnitude = unsigned[..digits].parse::<f64>().unwrap_or(f64::NAN);
    if negative { -magnitude } else { magnitude }
}

/// Case and death counts for one date (and region, at state level).
///
/// Counts are integer-valued but stored as `f64` so that unparseable input
/// surfaces as `NaN` instead of a silent zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaseCounts {
    /// Cumulative cases.
    pub cases: f64,
    /// Cumulative deaths.
    pub deaths: f64,
}

impl CaseCounts {
    /// Creates counts from already-parsed values.
    #[must_use]
    pub const fn new(cases: f64, deaths: f64) -> Self {
        Self { cases, deaths }
    }

    /// Reads `cases` and `deaths` from a raw record. A missing column
    /// parses as `NaN`.
    #[must_use]
    pub fn from_record(record: &RawRecord) -> Self {
        let field = |name: &str| record.get(name).map_or(f64::NAN, |v| parse_count(v));
        Self {
            cases: field(CASES_COLUMN),
            deaths: field(DEATHS_COLUMN),
        }
    }

    /// Whether either count failed to parse.
    #[must_use]
    pub const fn has_anomaly(&self) -> bool {
        self.cases.is_nan() || self.deaths.is_nan()
    }
}

/// Returns `(min, max)` over the non-`NaN` values, or `None` when there are
/// none.
#[must_use]
pub fn count_extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Date-keyed series for one hierarchy level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "level", content = "series_by_date", rename_all = "snake_case")]
pub enum LevelSeries {
    /// One record per date.
    Country(BTreeMap<String, CaseCounts>),
    /// A region map per date. Dates without rows map to an empty region map.
    State(BTreeMap<String, RegionCounts>),
}

impl LevelSeries {
    /// An empty series for `level`.
    #[must_use]
    pub const fn empty(level: Level) -> Self {
        match level {
            Level::Country => Self::Country(BTreeMap::new()),
            Level::State => Self::State(BTreeMap::new()),
        }
    }

    /// The level this series was built for.
    #[must_use]
    pub const fn level(&self) -> Level {
        match self {
            Self::Country(_) => Level::Country,
            Self::State(_) => Level::State,
        }
    }

    /// Dates present in this series, ascending.
    #[must_use]
    pub fn dates(&self) -> Vec<String> {
        match self {
            Self::Country(map) => map.keys().cloned().collect(),
            Self::State(map) => map.keys().cloned().collect(),
        }
    }

    /// Whether `date` has an entry (possibly an empty region map).
    #[must_use]
    pub fn contains_date(&self, date: &str) -> bool {
        match self {
            Self::Country(map) => map.contains_key(date),
            Self::State(map) => map.contains_key(date),
        }
    }

    /// Number of dates in this series.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Country(map) => map.len(),
            Self::State(map) => map.len(),
        }
    }

    /// Whether the series holds no dates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// National counts for `date`. Always `None` for state series.
    #[must_use]
    pub fn country_counts(&self, date: &str) -> Option<&CaseCounts> {
        match self {
            Self::Country(map) => map.get(date),
            Self::State(_) => None,
        }
    }

    /// Region map for `date`. Always `None` for country series.
    #[must_use]
    pub fn regions(&self, date: &str) -> Option<&RegionCounts> {
        match self {
            Self::Country(_) => None,
            Self::State(map) => map.get(date),
        }
    }

    /// Every record in the series, regardless of date or region.
    #[must_use]
    pub fn flat_series(&self) -> Vec<CaseCounts> {
        match self {
            Self::Country(map) => map.values().copied().collect(),
            Self::State(map) => map
                .values()
                .flat_map(|regions| regions.values().copied())
                .collect(),
        }
    }
}

/// The canonical timeline together with its inverse lookup.
///
/// The two are built together so the lookup can never drift from the
/// sequence it indexes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateIndex {
    dates: Vec<String>,
    positions: BTreeMap<String, usize>,
}

impl DateIndex {
    /// Builds the index in one pass over `dates`. Later duplicates are
    /// dropped so the sequence stays unique.
    #[must_use]
    pub fn from_dates(dates: impl IntoIterator<Item = String>) -> Self {
        let mut index = Self::default();
        for date in dates {
            if index.positions.contains_key(&date) {
                continue;
            }
            index.positions.insert(date.clone(), index.dates.len());
            index.dates.push(date);
        }
        index
    }

    /// Ordinal position of `date` in the timeline.
    #[must_use]
    pub fn lookup(&self, date: &str) -> Option<usize> {
        self.positions.get(date).copied()
    }

    /// Date at `ordinal`.
    #[must_use]
    pub fn date_at(&self, ordinal: usize) -> Option<&str> {
        self.dates.get(ordinal).map(String::as_str)
    }

    /// Whether `date` is part of the timeline.
    #[must_use]
    pub fn contains(&self, date: &str) -> bool {
        self.positions.contains_key(date)
    }

    /// The ordered timeline.
    #[must_use]
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    /// First date, if any.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.date_at(0)
    }

    /// Number of dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the timeline is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Indexed result of a load: both hierarchy levels over one timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    scene: String,
    index: DateIndex,
    country: LevelSeries,
    state: LevelSeries,
}

impl Dataset {
    /// Assembles a dataset. The timeline is taken from the country series.
    ///
    /// Callers are responsible for the series matching their level and for
    /// the state series covering every country date.
    #[must_use]
    pub fn new(scene: impl Into<String>, country: LevelSeries, state: LevelSeries) -> Self {
        let index = DateIndex::from_dates(country.dates());
        Self {
            scene: scene.into(),
            index,
            country,
            state,
        }
    }

    /// Scene name the dataset was loaded for.
    #[must_use]
    pub fn scene(&self) -> &str {
        &self.scene
    }

    /// The canonical ordered timeline.
    #[must_use]
    pub fn dates(&self) -> &[String] {
        self.index.dates()
    }

    /// Inverse date lookup.
    #[must_use]
    pub const fn date_index(&self) -> &DateIndex {
        &self.index
    }

    /// Series for `level`.
    #[must_use]
    pub const fn by_level(&self, level: Level) -> &LevelSeries {
        match level {
            Level::Country => &self.country,
            Level::State => &self.state,
        }
    }

    /// National counts for `date`.
    #[must_use]
    pub fn country_counts(&self, date: &str) -> Option<&CaseCounts> {
        self.country.country_counts(date)
    }

    /// Region map for `date`.
    #[must_use]
    pub fn regions(&self, date: &str) -> Option<&RegionCounts> {
        self.state.regions(date)
    }

    /// Whether the timeline is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
