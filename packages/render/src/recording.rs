//! A [`Renderer`] that only remembers what it was asked to draw.
//!
//! Useful for tests and headless runs.

use crate::annotation::PlacedAnnotation;
use crate::renderer::{Renderer, ScatterPoint, TrendPoint, ViewHandle};
use crate::scale::{CrossSectionScales, TrendScales};

/// One call made on a [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    /// [`Renderer::render_trend`].
    Trend {
        /// Target view.
        view: String,
        /// Number of points drawn.
        points: usize,
    },
    /// [`Renderer::highlight_trend_point`].
    Highlight {
        /// Target view.
        view: String,
        /// Highlighted date.
        date: String,
    },
    /// [`Renderer::clear_cross_section`].
    ClearCrossSection {
        /// Target view.
        view: String,
    },
    /// [`Renderer::render_cross_section`].
    CrossSection {
        /// Target view.
        view: String,
        /// Rendered date.
        date: String,
        /// Scales used.
        scales: CrossSectionScales,
        /// Points drawn.
        points: Vec<ScatterPoint>,
    },
    /// [`Renderer::add_annotations`].
    Annotations {
        /// Target view.
        view: String,
        /// Callout labels, in order.
        labels: Vec<String>,
    },
}

/// Records every call it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    /// Calls received so far.
    pub calls: Vec<RenderCall>,
}

impl Renderer for RecordingRenderer {
    fn render_trend(&mut self, view: &ViewHandle, _scales: &TrendScales, points: &[TrendPoint]) {
        self.calls.push(RenderCall::Trend {
            view: view.as_str().to_owned(),
            points: points.len(),
        });
    }

    fn highlight_trend_point(&mut self, view: &ViewHandle, _scales: &TrendScales, point: &TrendPoint) {
        self.calls.push(RenderCall::Highlight {
            view: view.as_str().to_owned(),
            date: point.date.clone(),
        });
    }

    fn clear_cross_section(&mut self, view: &ViewHandle) {
        self.calls.push(RenderCall::ClearCrossSection {
            view: view.as_str().to_owned(),
        });
    }

    fn render_cross_section(
        &mut self,
        view: &ViewHandle,
        date: &str,
        scales: &CrossSectionScales,
        points: &[ScatterPoint],
    ) {
        self.calls.push(RenderCall::CrossSection {
            view: view.as_str().to_owned(),
            date: date.to_owned(),
            scales: *scales,
            points: points.to_vec(),
        });
    }

    fn add_annotations(&mut self, view: &ViewHandle, annotations: &[PlacedAnnotation]) {
        self.calls.push(RenderCall::Annotations {
            view: view.as_str().to_owned(),
            labels: annotations.iter().map(|a| a.label.clone()).collect(),
        });
    }
}
