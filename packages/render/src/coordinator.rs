//! Keeps the trend and cross-section views in step with the selection.
//!
//! The trend view is drawn once per dataset. A selection change only
//! clears and redraws the cross-section and moves the trend marker.

use std::rc::Rc;

use covid_dash_series_models::{Dataset, count_extent};

use crate::annotation::{self, AnnotationSpec, PlacedAnnotation};
use crate::renderer::{Layout, Renderer, ScatterPoint, TrendPoint, ViewHandle};
use crate::scale::{CrossSectionScales, LinearScale, ScalePair, TimeScale, TrendScales};
use crate::tooltip::TooltipContent;

/// Drives a [`Renderer`] for both views of one dataset.
pub struct RenderCoordinator<R> {
    dataset: Rc<Dataset>,
    renderer: R,
    layout: Layout,
    trend_view: ViewHandle,
    cross_section_view: ViewHandle,
    trend_scales: Option<TrendScales>,
}

impl<R: Renderer> RenderCoordinator<R> {
    /// Creates a coordinator. Nothing is drawn until [`Self::render_trend`]
    /// or [`Self::render_cross_section`] is called.
    pub const fn new(
        dataset: Rc<Dataset>,
        renderer: R,
        layout: Layout,
        trend_view: ViewHandle,
        cross_section_view: ViewHandle,
    ) -> Self {
        Self {
            dataset,
            renderer,
            layout,
            trend_view,
            cross_section_view,
            trend_scales: None,
        }
    }

    /// The renderer being driven.
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable access to the renderer being driven.
    pub const fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Scales of the last trend render, if any.
    pub const fn trend_scales(&self) -> Option<&TrendScales> {
        self.trend_scales.as_ref()
    }

    /// National cases for every timeline date, in timeline order.
    pub fn trend_points(&self) -> Vec<TrendPoint> {
        self.dataset
            .dates()
            .iter()
            .map(|date| self.trend_point(date))
            .collect()
    }

    fn trend_point(&self, date: &str) -> TrendPoint {
        TrendPoint {
            date: date.to_owned(),
            cases: self
                .dataset
                .country_counts(date)
                .map_or(f64::NAN, |c| c.cases),
        }
    }

    /// Per-region counts for `date`, in region order. Empty for dates
    /// outside the timeline.
    pub fn scatter_points(&self, date: &str) -> Vec<ScatterPoint> {
        self.dataset
            .regions(date)
            .map(|regions| {
                regions
                    .iter()
                    .map(|(region, counts)| ScatterPoint {
                        region: region.clone(),
                        cases: counts.cases,
                        deaths: counts.deaths,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Tooltip for the trend point at `date`, `None` outside the timeline.
    pub fn trend_tooltip(&self, date: &str) -> Option<TooltipContent> {
        self.dataset.country_counts(date)?;
        let point = self.trend_point(date);
        Some(TooltipContent::Trend {
            date: point.date,
            cases: point.cases,
        })
    }

    /// Tooltip for `region` in the cross-section of `date`.
    pub fn region_tooltip(&self, date: &str, region: &str) -> Option<TooltipContent> {
        let counts = self.dataset.regions(date)?.get(region)?;
        Some(TooltipContent::Region {
            region: region.to_owned(),
            cases: counts.cases,
            deaths: counts.deaths,
        })
    }

    /// Draws the trend view and returns its scales.
    ///
    /// The vertical domain is the national case range padded by one on
    /// each side, so a constant series still has a non-zero span. Returns
    /// `None`, drawing nothing, when the timeline has no parseable date.
    pub fn render_trend(&mut self) -> Option<TrendScales> {
        let points = self.trend_points();
        let Some(x) = TimeScale::over_dates(self.dataset.dates(), self.layout.x_range()) else {
            log::warn!(
                "Scene '{}' has no plottable dates, skipping trend view",
                self.dataset.scene()
            );
            return None;
        };
        let domain = count_extent(points.iter().map(|p| p.cases))
            .map_or((0.0, 1.0), |(lo, hi)| (lo - 1.0, hi + 1.0));
        let y = LinearScale::new(domain, self.layout.y_range());
        let scales = ScalePair { x, y };

        log::debug!(
            "Rendering trend view {} with {} points",
            self.trend_view.as_str(),
            points.len()
        );
        self.renderer.render_trend(&self.trend_view, &scales, &points);
        self.trend_scales = Some(scales);
        Some(scales)
    }

    /// Draws the cross-section for `date` and returns its scales.
    ///
    /// Both axes start at zero and end one past the largest value of that
    /// date, so the scales depend only on `date`.
    pub fn render_cross_section(&mut self, date: &str) -> CrossSectionScales {
        let points = self.scatter_points(date);
        let max_cases = count_extent(points.iter().map(|p| p.cases)).map_or(0.0, |(_, hi)| hi);
        let max_deaths = count_extent(points.iter().map(|p| p.deaths)).map_or(0.0, |(_, hi)| hi);

        let scales = ScalePair {
            x: LinearScale::new((0.0, max_cases + 1.0), self.layout.x_range()),
            y: LinearScale::new((0.0, max_deaths + 1.0), self.layout.y_range()),
        };

        log::debug!(
            "Rendering cross-section {} for {date} with {} regions",
            self.cross_section_view.as_str(),
            points.len()
        );
        self.renderer
            .render_cross_section(&self.cross_section_view, date, &scales, &points);
        scales
    }

    /// Reacts to a new selection: redraws the cross-section and moves the
    /// trend marker. The trend line itself is left alone.
    pub fn on_selection_changed(&mut self, date: &str) {
        self.renderer.clear_cross_section(&self.cross_section_view);
        self.render_cross_section(date);

        if let Some(scales) = self.trend_scales {
            let point = self.trend_point(date);
            self.renderer
                .highlight_trend_point(&self.trend_view, &scales, &point);
        }
    }

    /// Places `specs` on the trend view using the scales of the last trend
    /// render and hands them to the renderer.
    ///
    /// Callouts for dates outside the timeline are skipped.
    pub fn place_annotations(
        &mut self,
        specs: &[AnnotationSpec],
        radius: f64,
    ) -> Vec<PlacedAnnotation> {
        let Some(scales) = self.trend_scales else {
            log::warn!("Annotations requested before the trend view was drawn");
            return Vec::new();
        };

        let placed: Vec<PlacedAnnotation> = specs
            .iter()
            .filter_map(|spec| {
                let placed =
                    annotation::place(spec, &scales, &self.dataset, &self.layout, radius);
                if placed.is_none() {
                    log::warn!(
                        "Skipping annotation '{}': {} is not in the loaded timeline",
                        spec.label,
                        spec.date
                    );
                }
                placed
            })
            .collect();

        self.renderer.add_annotations(&self.trend_view, &placed);
        placed
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use covid_dash_series_models::{CaseCounts, LevelSeries, RegionCounts};

    use super::*;
    use crate::recording::{RecordingRenderer, RenderCall};

    fn dataset() -> Rc<Dataset> {
        let mut country = BTreeMap::new();
        let mut state = BTreeMap::new();
        for (i, date) in ["2020-03-01", "2020-03-02", "2020-03-03"].iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let n = (i + 1) as f64;
            country.insert((*date).to_string(), CaseCounts::new(n * 10.0, n));
            let mut regions = RegionCounts::new();
            regions.insert("Ohio".to_string(), CaseCounts::new(n * 4.0, n));
            regions.insert("Utah".to_string(), CaseCounts::new(n * 6.0, 0.0));
            state.insert((*date).to_string(), regions);
        }
        Rc::new(Dataset::new(
            "test",
            LevelSeries::Country(country),
            LevelSeries::State(state),
        ))
    }

    fn coordinator(dataset: Rc<Dataset>) -> RenderCoordinator<RecordingRenderer> {
        RenderCoordinator::new(
            dataset,
            RecordingRenderer::default(),
            Layout::default(),
            ViewHandle::new("#trend"),
            ViewHandle::new("#scatter"),
        )
    }

    #[test]
    fn trend_domain_is_padded_case_range() {
        let mut coordinator = coordinator(dataset());
        let scales = coordinator.render_trend().unwrap();

        assert_eq!(scales.y.domain, (9.0, 31.0));
        assert_eq!(scales.y.range, (300.0, 0.0));
        assert!((scales.x.apply_str("2020-03-03").unwrap() - 500.0).abs() < 1e-9);
        assert_eq!(
            coordinator.renderer().calls,
            [RenderCall::Trend {
                view: "#trend".to_string(),
                points: 3
            }]
        );
    }

    #[test]
    fn constant_series_has_non_zero_domain() {
        let mut country = BTreeMap::new();
        country.insert("2020-03-01".to_string(), CaseCounts::new(5.0, 0.0));
        country.insert("2020-03-02".to_string(), CaseCounts::new(5.0, 0.0));
        let dataset = Rc::new(Dataset::new(
            "flat",
            LevelSeries::Country(country),
            LevelSeries::State(BTreeMap::new()),
        ));

        let scales = coordinator(dataset).render_trend().unwrap();
        assert_eq!(scales.y.domain, (4.0, 6.0));
    }

    #[test]
    fn nan_cases_are_excluded_from_trend_range() {
        let mut country = BTreeMap::new();
        country.insert("2020-03-01".to_string(), CaseCounts::new(f64::NAN, 0.0));
        country.insert("2020-03-02".to_string(), CaseCounts::new(7.0, 0.0));
        let dataset = Rc::new(Dataset::new(
            "anomaly",
            LevelSeries::Country(country),
            LevelSeries::State(BTreeMap::new()),
        ));

        let mut coordinator = coordinator(dataset);
        let scales = coordinator.render_trend().unwrap();
        assert_eq!(scales.y.domain, (6.0, 8.0));
        assert!(coordinator.trend_points()[0].cases.is_nan());
    }

    #[test]
    fn empty_timeline_draws_nothing() {
        let dataset = Rc::new(Dataset::new(
            "empty",
            LevelSeries::Country(BTreeMap::new()),
            LevelSeries::State(BTreeMap::new()),
        ));
        let mut coordinator = coordinator(dataset);
        assert!(coordinator.render_trend().is_none());
        assert!(coordinator.renderer().calls.is_empty());
    }

    #[test]
    fn cross_section_domains_start_at_zero() {
        let mut coordinator = coordinator(dataset());
        let scales = coordinator.render_cross_section("2020-03-02");

        assert_eq!(scales.x.domain, (0.0, 13.0));
        assert_eq!(scales.y.domain, (0.0, 3.0));
        let RenderCall::CrossSection { date, points, .. } = &coordinator.renderer().calls[0] else {
            panic!("expected a cross-section render");
        };
        assert_eq!(date, "2020-03-02");
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].region, "Ohio");
    }

    #[test]
    fn cross_section_of_empty_region_map_uses_unit_domain() {
        let mut coordinator = coordinator(dataset());
        let scales = coordinator.render_cross_section("2099-01-01");
        assert_eq!(scales.x.domain, (0.0, 1.0));
        assert_eq!(scales.y.domain, (0.0, 1.0));
    }

    #[test]
    fn selection_change_redraws_only_cross_section() {
        let mut coordinator = coordinator(dataset());
        coordinator.render_trend().unwrap();
        coordinator.on_selection_changed("2020-03-03");
        coordinator.on_selection_changed("2020-03-01");

        let calls = &coordinator.renderer().calls;
        let trends = calls
            .iter()
            .filter(|c| matches!(c, RenderCall::Trend { .. }))
            .count();
        assert_eq!(trends, 1);
        assert!(matches!(
            &calls[1],
            RenderCall::ClearCrossSection { view } if view == "#scatter"
        ));
        assert!(matches!(
            &calls[3],
            RenderCall::Highlight { date, .. } if date == "2020-03-03"
        ));
        assert_eq!(calls.len(), 7);
    }

    #[test]
    fn reselecting_a_date_renders_identical_content() {
        let mut coordinator = coordinator(dataset());
        coordinator.on_selection_changed("2020-03-02");
        coordinator.on_selection_changed("2020-03-03");
        coordinator.on_selection_changed("2020-03-02");

        let renders: Vec<_> = coordinator
            .renderer()
            .calls
            .iter()
            .filter(|c| matches!(c, RenderCall::CrossSection { .. }))
            .collect();
        assert_eq!(renders.len(), 3);
        assert_eq!(renders[0], renders[2]);
    }

    #[test]
    fn annotations_are_offset_by_margin() {
        let mut coordinator = coordinator(dataset());
        let scales = coordinator.render_trend().unwrap();
        let specs = vec![
            AnnotationSpec {
                date: "2020-03-02".to_string(),
                label: "Midpoint".to_string(),
                dx: 10.0,
                dy: -20.0,
            },
            AnnotationSpec {
                date: "2021-01-01".to_string(),
                label: "Out of range".to_string(),
                dx: 0.0,
                dy: 0.0,
            },
        ];

        let placed = coordinator.place_annotations(&specs, 5.0);
        assert_eq!(placed.len(), 1);
        assert!((placed[0].x - (50.0 + 250.0)).abs() < 1e-9);
        assert!((placed[0].y - (50.0 + scales.y.apply(20.0))).abs() < 1e-9);
        assert!((placed[0].dy + 20.0).abs() < f64::EPSILON);
        assert!(matches!(
            coordinator.renderer().calls.last(),
            Some(RenderCall::Annotations { labels, .. }) if labels == &["Midpoint"]
        ));
    }

    #[test]
    fn tooltips_come_from_the_dataset() {
        let coordinator = coordinator(dataset());

        assert_eq!(
            coordinator.trend_tooltip("2020-03-02").unwrap().to_string(),
            "Cases: 20\nDate: 2020-03-02"
        );
        assert_eq!(
            coordinator.region_tooltip("2020-03-03", "Utah"),
            Some(TooltipContent::Region {
                region: "Utah".to_string(),
                cases: 18.0,
                deaths: 0.0,
            })
        );
        assert!(coordinator.trend_tooltip("2099-01-01").is_none());
        assert!(coordinator.region_tooltip("2020-03-03", "Texas").is_none());
    }

    #[test]
    fn annotations_need_a_trend_render() {
        let mut coordinator = coordinator(dataset());
        let spec = AnnotationSpec {
            date: "2020-03-02".to_string(),
            label: "Early".to_string(),
            dx: 0.0,
            dy: 0.0,
        };
        assert!(coordinator.place_annotations(&[spec], 5.0).is_empty());
        assert!(coordinator.renderer().calls.is_empty());
    }
}
