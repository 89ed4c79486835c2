#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinated national trend and state cross-section dashboard.
//!
//! Ties the series loader, the date selection, and the view coordinator
//! together into one session driven by a TOML configuration.

pub mod config;
pub mod dashboard;
pub mod text_renderer;

pub use config::{ConfigError, DashboardConfig};
pub use dashboard::{Dashboard, DashboardError, DashboardState, Interaction};
pub use text_renderer::TextRenderer;
