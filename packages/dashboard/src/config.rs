//! Dashboard configuration.
//!
//! A default configuration is embedded at compile time from
//! `config/default.toml`; a file passed on the command line replaces it
//! entirely, and individual CLI flags override single fields.

use std::path::Path;

use covid_dash_render::scale::parse_date;
use covid_dash_render::{AnnotationSpec, Layout, annotation::DEFAULT_RADIUS};
use serde::Deserialize;

const DEFAULT_TOML: &str = include_str!("../config/default.toml");

/// Sample data shipped with this package, independent of the working
/// directory.
pub const DEFAULT_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data");

/// Errors that can occur while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`DashboardConfig`].
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A date field is not a `YYYY-MM-DD` calendar day.
    #[error("Invalid {field} date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// Which field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Everything needed to load and draw one dashboard session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardConfig {
    /// Scene name, substituted into the data file names.
    pub scene: String,
    /// Directory or URL prefix holding the scene files.
    #[serde(default = "default_data")]
    pub data: String,
    /// First date to load (inclusive).
    pub start: String,
    /// Last date to load (inclusive).
    pub end: String,
    /// Target of the trend view.
    #[serde(default = "default_trend_view")]
    pub trend_view: String,
    /// Target of the cross-section view.
    #[serde(default = "default_cross_section_view")]
    pub cross_section_view: String,
    /// Callout circle radius.
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Plot dimensions.
    #[serde(default)]
    pub layout: Layout,
    /// Fixed callouts on the trend view.
    #[serde(default)]
    pub annotations: Vec<AnnotationSpec>,
}

fn default_data() -> String {
    DEFAULT_DATA_DIR.to_string()
}

fn default_trend_view() -> String {
    "#line-chart".to_string()
}

fn default_cross_section_view() -> String {
    "#scatter-plot".to_string()
}

const fn default_radius() -> f64 {
    DEFAULT_RADIUS
}

impl DashboardConfig {
    /// The embedded default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the embedded file is invalid.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml(DEFAULT_TOML)
    }

    /// Parses and validates a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] for malformed input and
    /// [`ConfigError::InvalidDate`] for bad `start`/`end` values.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or is invalid.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("Reading dashboard config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Checks that `start` and `end` are calendar days.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDate`] for the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("start", &self.start), ("end", &self.end)] {
            if parse_date(value).is_none() {
                return Err(ConfigError::InvalidDate {
                    field,
                    value: value.clone(),
                });
            }
        }
        if self.start > self.end {
            log::warn!(
                "start {} is after end {}, the dashboard will be empty",
                self.start,
                self.end
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_parses() {
        let config = DashboardConfig::embedded().unwrap();
        assert_eq!(config.scene, "full");
        assert_eq!(config.layout, Layout::default());
        assert_eq!(config.annotations.len(), 2);
        assert_eq!(config.annotations[0].date, "2020-03-11");
    }

    #[test]
    fn embedded_data_dir_does_not_depend_on_working_directory() {
        let config = DashboardConfig::embedded().unwrap();
        assert_eq!(config.data, DEFAULT_DATA_DIR);
        assert!(Path::new(&config.data).is_absolute());
        assert!(Path::new(&config.data).join("us-full.csv").is_file());
        assert!(Path::new(&config.data).join("us-states-full.csv").is_file());
    }

    #[test]
    fn reads_config_file_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "covid_dash_config_{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"
            scene = "march"
            data = "https://example.org/data"
            start = "2020-03-01"
            end = "2020-03-31"

            [[annotations]]
            date = "2020-03-11"
            label = "Pandemic declared"
            dy = -40.0
            "#,
        )
        .unwrap();

        let config = DashboardConfig::from_path(&path);
        std::fs::remove_file(&path).ok();
        let config = config.unwrap();

        assert_eq!(config.scene, "march");
        assert_eq!(config.data, "https://example.org/data");
        assert_eq!(config.annotations.len(), 1);
        assert!((config.annotations[0].dy + 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let err =
            DashboardConfig::from_path(Path::new("/nonexistent/covid_dash/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn optional_fields_have_defaults() {
        let config = DashboardConfig::from_toml(
            r#"
            scene = "march"
            data = "https://example.org/data"
            start = "2020-03-01"
            end = "2020-03-31"
            "#,
        )
        .unwrap();

        assert_eq!(config.trend_view, "#line-chart");
        assert_eq!(config.data, "https://example.org/data");
        assert!((config.radius - DEFAULT_RADIUS).abs() < f64::EPSILON);
        assert!(config.annotations.is_empty());
        assert!((config.layout.width - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_layout_keeps_other_defaults() {
        let config = DashboardConfig::from_toml(
            r#"
            scene = "march"
            data = "data"
            start = "2020-03-01"
            end = "2020-03-31"

            [layout]
            width = 800.0
            "#,
        )
        .unwrap();

        assert!((config.layout.width - 800.0).abs() < f64::EPSILON);
        assert!((config.layout.margin - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_malformed_dates() {
        let err = DashboardConfig::from_toml(
            r#"
            scene = "march"
            data = "data"
            start = "03/01/2020"
            end = "2020-03-31"
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidDate { field: "start", .. }));
    }

    #[test]
    fn rejects_missing_fields() {
        let err = DashboardConfig::from_toml("scene = \"march\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
