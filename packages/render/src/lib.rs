#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! View coordination for the case dashboard.
//!
//! This crate computes everything a drawing backend needs (scales,
//! resolved points, callout positions, tooltip text) and hands it to a
//! [`Renderer`]. It never draws anything itself.

pub mod annotation;
pub mod coordinator;
pub mod format;
pub mod recording;
pub mod renderer;
pub mod scale;
pub mod tooltip;

pub use annotation::{AnnotationSpec, PlacedAnnotation};
pub use coordinator::RenderCoordinator;
pub use renderer::{Layout, Renderer, ScatterPoint, TrendPoint, ViewHandle};
pub use scale::{CrossSectionScales, LinearScale, ScalePair, TimeScale, TrendScales};
pub use tooltip::{TooltipContent, TooltipController, TooltipSurface};
