//! The seam between view coordination and actual drawing.
//!
//! A [`Renderer`] receives fully resolved points and scales; it never looks
//! anything up in the dataset itself.

use serde::{Deserialize, Serialize};

use crate::annotation::PlacedAnnotation;
use crate::scale::{CrossSectionScales, TrendScales};

/// Opaque identifier of a drawing target (a canvas selector, a window id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewHandle(String);

impl ViewHandle {
    /// Wraps a target identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The wrapped identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Drawing area dimensions shared by both views.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Padding around the plot area, in pixels.
    pub margin: f64,
    /// Plot area width, in pixels.
    pub width: f64,
    /// Plot area height, in pixels.
    pub height: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            margin: 50.0,
            width: 500.0,
            height: 300.0,
        }
    }
}

impl Layout {
    /// Horizontal pixel range of the plot area.
    #[must_use]
    pub const fn x_range(&self) -> (f64, f64) {
        (0.0, self.width)
    }

    /// Vertical pixel range of the plot area (origin at the bottom).
    #[must_use]
    pub const fn y_range(&self) -> (f64, f64) {
        (self.height, 0.0)
    }
}

/// One point of the national trend line.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    /// Timeline date.
    pub date: String,
    /// National cases on that date.
    pub cases: f64,
}

/// One region in the cross-section scatter.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    /// Region name.
    pub region: String,
    /// Cases in the region.
    pub cases: f64,
    /// Deaths in the region.
    pub deaths: f64,
}

/// Draws the two coordinated views.
pub trait Renderer {
    /// Draws the national trend line and its points.
    fn render_trend(&mut self, view: &ViewHandle, scales: &TrendScales, points: &[TrendPoint]);

    /// Moves the selected-date marker on the trend view.
    fn highlight_trend_point(&mut self, view: &ViewHandle, scales: &TrendScales, point: &TrendPoint);

    /// Removes everything drawn in the cross-section view.
    fn clear_cross_section(&mut self, view: &ViewHandle);

    /// Draws the per-region scatter for `date`.
    fn render_cross_section(
        &mut self,
        view: &ViewHandle,
        date: &str,
        scales: &CrossSectionScales,
        points: &[ScatterPoint],
    );

    /// Adds fixed callouts on top of the trend view.
    fn add_annotations(&mut self, view: &ViewHandle, annotations: &[PlacedAnnotation]);
}
