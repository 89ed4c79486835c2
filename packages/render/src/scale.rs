//! Domain-to-pixel mappings handed to the renderer.

use chrono::NaiveDate;

/// Format of every date in the timeline.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a timeline date.
#[must_use]
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

/// Continuous linear mapping from `domain` to `range`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    /// Input interval.
    pub domain: (f64, f64),
    /// Output interval (pixels).
    pub range: (f64, f64),
}

impl LinearScale {
    /// Creates a scale.
    #[must_use]
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a domain value to the range. A zero-width domain maps every
    /// value to the middle of the range; `NaN` maps to `NaN`.
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        if value.is_nan() {
            return f64::NAN;
        }
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span.abs() < f64::EPSILON {
            0.5
        } else {
            (value - d0) / span
        };
        (r1 - r0).mul_add(t, r0)
    }

    /// Maps a range value back to the domain.
    #[must_use]
    pub fn invert(&self, pixel: f64) -> f64 {
        Self::new(self.range, self.domain).apply(pixel)
    }
}

/// Linear mapping from calendar days to the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    /// First and last day.
    pub domain: (NaiveDate, NaiveDate),
    /// Output interval (pixels).
    pub range: (f64, f64),
}

impl TimeScale {
    /// Creates a scale.
    #[must_use]
    pub const fn new(domain: (NaiveDate, NaiveDate), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Builds a scale over the extent of `dates`. Unparseable dates are
    /// ignored; returns `None` if none parse.
    #[must_use]
    pub fn over_dates(dates: &[String], range: (f64, f64)) -> Option<Self> {
        let mut parsed = dates.iter().filter_map(|d| parse_date(d));
        let first = parsed.next()?;
        let (lo, hi) = parsed.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(Self::new((lo, hi), range))
    }

    fn days(&self) -> LinearScale {
        #[allow(clippy::cast_precision_loss)]
        let span = (self.domain.1 - self.domain.0).num_days() as f64;
        LinearScale::new((0.0, span), self.range)
    }

    /// Maps a day to the range.
    #[must_use]
    pub fn apply(&self, date: NaiveDate) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let offset = (date - self.domain.0).num_days() as f64;
        self.days().apply(offset)
    }

    /// Maps a timeline date string to the range.
    #[must_use]
    pub fn apply_str(&self, date: &str) -> Option<f64> {
        parse_date(date).map(|d| self.apply(d))
    }
}

/// The horizontal and vertical scale of one view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalePair<X> {
    /// Horizontal scale.
    pub x: X,
    /// Vertical scale.
    pub y: LinearScale,
}

/// Scales of the trend view: days across, national cases up.
pub type TrendScales = ScalePair<TimeScale>;

/// Scales of the cross-section view: cases across, deaths up.
pub type CrossSectionScales = ScalePair<LinearScale>;
