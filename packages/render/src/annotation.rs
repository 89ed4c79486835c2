//! Fixed editorial callouts anchored to trend points.

use covid_dash_series_models::Dataset;
use serde::{Deserialize, Serialize};

use crate::renderer::Layout;
use crate::scale::TrendScales;

/// Default callout circle radius, in pixels.
pub const DEFAULT_RADIUS: f64 = 5.0;

/// A callout as authored: which date it points at and where its note sits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSpec {
    /// Timeline date the callout circles.
    pub date: String,
    /// Note text.
    pub label: String,
    /// Horizontal offset of the note from the circle.
    #[serde(default)]
    pub dx: f64,
    /// Vertical offset of the note from the circle.
    #[serde(default)]
    pub dy: f64,
}

/// A callout resolved to canvas coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedAnnotation {
    /// Note text.
    pub label: String,
    /// Circle center, canvas x (margin included).
    pub x: f64,
    /// Circle center, canvas y (margin included).
    pub y: f64,
    /// Horizontal note offset.
    pub dx: f64,
    /// Vertical note offset.
    pub dy: f64,
    /// Circle radius.
    pub radius: f64,
}

/// Resolves `spec` against the trend scales.
///
/// Returns `None` when the date is outside the loaded timeline or does not
/// parse.
#[must_use]
pub fn place(
    spec: &AnnotationSpec,
    scales: &TrendScales,
    dataset: &Dataset,
    layout: &Layout,
    radius: f64,
) -> Option<PlacedAnnotation> {
    let counts = dataset.country_counts(&spec.date)?;
    let x = scales.x.apply_str(&spec.date)?;
    let y = scales.y.apply(counts.cases);

    Some(PlacedAnnotation {
        label: spec.label.clone(),
        x: layout.margin + x,
        y: layout.margin + y,
        dx: spec.dx,
        dy: spec.dy,
        radius,
    })
}
