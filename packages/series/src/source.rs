//! Raw record sources.
//!
//! [`RecordSource`] is the seam between the loader and whatever turns a
//! location into rows. [`CsvRecordSource`] downloads or reads a CSV and
//! returns every row keyed by the trimmed header names.
//! [`InMemorySource`] serves fixed rows, for tests and embedding.

use std::collections::BTreeMap;

use async_trait::async_trait;
use covid_dash_series_models::RawRecord;

/// Errors that can occur while fetching raw records.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error (local file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The location is unknown to the source.
    #[error("No records available at {location}")]
    NotFound {
        /// Location that was requested.
        location: String,
    },
}

/// Turns a location (URL or path) into an ordered sequence of raw records.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetches and parses every record at `location`, preserving file order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the location cannot be read or parsed.
    async fn fetch(&self, location: &str) -> Result<Vec<RawRecord>, SourceError>;
}

/// Reads CSV files over HTTP(S) or from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct CsvRecordSource {
    client: reqwest::Client,
}

impl CsvRecordSource {
    /// Creates a source with a default HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn read_bytes(&self, location: &str) -> Result<Vec<u8>, SourceError> {
        if is_remote(location) {
            let response = self
                .client
                .get(location)
                .send()
                .await?
                .error_for_status()?;
            let bytes = response.bytes().await?;
            log::debug!("Downloaded {} bytes from {location}", bytes.len());
            Ok(bytes.to_vec())
        } else {
            let bytes = tokio::fs::read(location).await?;
            log::debug!("Read {} bytes from {location}", bytes.len());
            Ok(bytes)
        }
    }
}

#[async_trait]
impl RecordSource for CsvRecordSource {
    async fn fetch(&self, location: &str) -> Result<Vec<RawRecord>, SourceError> {
        let bytes = self.read_bytes(location).await?;
        let records = parse_csv(&bytes)?;
        log::info!("Parsed {} records from {location}", records.len());
        Ok(records)
    }
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Parses CSV bytes into records keyed by the header row.
///
/// Headers and values are trimmed. Short rows yield empty strings for the
/// missing columns.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if the input is not valid CSV.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<RawRecord>, SourceError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let record = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = row.get(i).unwrap_or("").trim().to_owned();
                (header.clone(), value)
            })
            .collect();
        records.push(record);
    }

    Ok(records)
}

/// Serves fixed records per location.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    files: BTreeMap<String, Vec<RawRecord>>,
}

impl InMemorySource {
    /// Creates an empty source. Every fetch fails until files are added.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `records` at `location`.
    #[must_use]
    pub fn with_file(mut self, location: impl Into<String>, records: Vec<RawRecord>) -> Self {
        self.files.insert(location.into(), records);
        self
    }

    /// Registers CSV text at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Csv`] if `csv` does not parse.
    pub fn with_csv(self, location: impl Into<String>, csv: &str) -> Result<Self, SourceError> {
        let records = parse_csv(csv.as_bytes())?;
        Ok(self.with_file(location, records))
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    async fn fetch(&self, location: &str) -> Result<Vec<RawRecord>, SourceError> {
        self.files
            .get(location)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                location: location.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_keyed_by_header() {
        let csv = "date, state ,cases,deaths\n2020-03-01,Ohio, 2,0\n2020-03-01,Utah,5,1\n";
        let records = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["state"], "Ohio");
        assert_eq!(records[0]["cases"], "2");
        assert_eq!(records[1]["deaths"], "1");
    }

    #[test]
    fn short_rows_get_empty_values() {
        let records = parse_csv(b"date,cases,deaths\n2020-01-22,1\n").unwrap();
        assert_eq!(records[0]["deaths"], "");
    }

    #[test]
    fn remote_locations_are_detected() {
        assert!(is_remote("https://example.org/us.csv"));
        assert!(!is_remote("data/us.csv"));
    }

    #[tokio::test]
    async fn reads_local_files() {
        let path = std::env::temp_dir().join(format!("covid_dash_source_{}.csv", std::process::id()));
        tokio::fs::write(&path, "date,cases,deaths\n2020-01-22,1,0\n")
            .await
            .unwrap();

        let records = CsvRecordSource::new()
            .fetch(path.to_str().unwrap())
            .await
            .unwrap();
        tokio::fs::remove_file(&path).await.ok();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["date"], "2020-01-22");
    }

    #[tokio::test]
    async fn missing_local_file_is_io_error() {
        let err = CsvRecordSource::new()
            .fetch("/nonexistent/covid_dash/us.csv")
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }

    #[tokio::test]
    async fn in_memory_source_reports_unknown_locations() {
        let source = InMemorySource::new()
            .with_csv("us.csv", "date,cases,deaths\n2020-01-22,1,0\n")
            .unwrap();

        assert_eq!(source.fetch("us.csv").await.unwrap().len(), 1);
        assert!(matches!(
            source.fetch("other.csv").await,
            Err(SourceError::NotFound { .. })
        ));
    }
}
