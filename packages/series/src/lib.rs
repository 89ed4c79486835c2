#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loading pipeline for national and state-level case series.
//!
//! Raw rows come from a [`source::RecordSource`], are clipped to a date
//! range by [`filter`], indexed per hierarchy level by [`index`], and
//! assembled into a [`covid_dash_series_models::Dataset`] by
//! [`loader::DatasetLoader`].

pub mod filter;
pub mod index;
pub mod loader;
pub mod source;

pub use loader::DatasetLoader;
pub use source::{CsvRecordSource, InMemorySource, RecordSource, SourceError};

/// Errors that can occur while loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// One of the input files could not be fetched or parsed.
    #[error("Failed to fetch {location}: {source}")]
    Fetch {
        /// URL or path that failed.
        location: String,
        /// Underlying transport or parse failure.
        source: SourceError,
    },

    /// The state-level file contains a date the national file does not.
    #[error("State-level date {date} is not part of the national timeline")]
    DateMismatch {
        /// The offending date.
        date: String,
    },
}
