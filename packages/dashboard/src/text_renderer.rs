//! A [`Renderer`] that writes both views as plain text tables.
//!
//! Each trend point gets a bar whose length follows the trend's vertical
//! scale, so the text output reflects the same domain a graphical backend
//! would use. Write failures are logged and otherwise ignored; a broken
//! pipe must not take the session down.

use std::io::Write;

use covid_dash_render::format::format_count;
use covid_dash_render::{
    CrossSectionScales, LinearScale, PlacedAnnotation, Renderer, ScatterPoint, TrendPoint,
    TrendScales, ViewHandle,
};

/// Longest bar drawn for a trend point, in characters.
pub const BAR_WIDTH: f64 = 40.0;

/// Draws views as text on any [`Write`] sink.
#[derive(Debug)]
pub struct TextRenderer<W> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    /// Creates a renderer writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// The underlying sink.
    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consumes the renderer, returning the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, view: &ViewHandle, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|()| self.out.flush()) {
            log::warn!("Failed to write view {}: {e}", view.as_str());
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar(scale: &LinearScale, value: f64) -> String {
    let length = scale.apply(value);
    if length.is_nan() {
        return String::new();
    }
    "#".repeat(length.round().clamp(0.0, BAR_WIDTH) as usize)
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render_trend(&mut self, view: &ViewHandle, scales: &TrendScales, points: &[TrendPoint]) {
        let bars = LinearScale::new(scales.y.domain, (0.0, BAR_WIDTH));
        let mut text = format!("== {} ==\n", view.as_str());
        for point in points {
            text.push_str(&format!(
                "{:<12}{:>12}  {}\n",
                point.date,
                format_count(point.cases),
                bar(&bars, point.cases)
            ));
        }
        self.emit(view, &text);
    }

    fn highlight_trend_point(
        &mut self,
        view: &ViewHandle,
        _scales: &TrendScales,
        point: &TrendPoint,
    ) {
        let text = format!(
            "{} > {} ({} cases)\n",
            view.as_str(),
            point.date,
            format_count(point.cases)
        );
        self.emit(view, &text);
    }

    fn clear_cross_section(&mut self, view: &ViewHandle) {
        log::trace!("Clearing {}", view.as_str());
    }

    fn render_cross_section(
        &mut self,
        view: &ViewHandle,
        date: &str,
        _scales: &CrossSectionScales,
        points: &[ScatterPoint],
    ) {
        let mut text = format!("== {} {date} ==\n", view.as_str());
        if points.is_empty() {
            text.push_str("(no regions)\n");
        }
        for point in points {
            text.push_str(&format!(
                "{:<24}{:>12}{:>10}\n",
                point.region,
                format_count(point.cases),
                format_count(point.deaths)
            ));
        }
        self.emit(view, &text);
    }

    fn add_annotations(&mut self, view: &ViewHandle, annotations: &[PlacedAnnotation]) {
        let mut text = String::new();
        for annotation in annotations {
            text.push_str(&format!(
                "{} * {} @ ({:.1}, {:.1})\n",
                view.as_str(),
                annotation.label,
                annotation.x,
                annotation.y
            ));
        }
        self.emit(view, &text);
    }
}
