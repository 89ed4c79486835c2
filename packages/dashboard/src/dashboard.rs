//! The dashboard session: load once, then keep both views in step with the
//! selected date.
//!
//! A [`Dashboard`] starts [`DashboardState::Uninitialized`]. A successful
//! [`Dashboard::load`] moves it to [`DashboardState::Ready`] exactly once,
//! drawing the trend view, its callouts, and the cross-section for the first
//! date. Every later selection redraws the cross-section through the
//! listener registered on the [`SelectionState`].

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use covid_dash_render::{
    PlacedAnnotation, RenderCoordinator, Renderer, TooltipContent, TooltipController,
    TooltipSurface, ViewHandle,
};
use covid_dash_selection::{DateSelected, SelectionError, SelectionState, SubscriptionId};
use covid_dash_series::{DatasetLoader, LoadError, RecordSource};
use covid_dash_series_models::Dataset;

use crate::config::DashboardConfig;

/// Errors that can occur while driving a dashboard.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Loading the dataset failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A selection was rejected.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Interaction before the dataset finished loading.
    #[error("Dashboard is not ready: no dataset has been loaded")]
    NotReady,

    /// A second load on the same session.
    #[error("Dashboard is already loaded")]
    AlreadyLoaded,
}

/// Lifecycle of a dashboard session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardState {
    /// Waiting for the dataset.
    Uninitialized,
    /// Dataset loaded, views drawn.
    Ready,
}

struct Ready<R> {
    dataset: Rc<Dataset>,
    selection: SelectionState,
    coordinator: Rc<RefCell<RenderCoordinator<R>>>,
    annotations: Vec<PlacedAnnotation>,
}

/// A single user interaction, as replayed by a non-interactive frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// A click on the trend point for this date.
    TrendClick(String),
    /// The slider moved to this ordinal.
    Slider(usize),
}

/// One interactive dashboard session.
pub struct Dashboard<R> {
    config: DashboardConfig,
    renderer: Option<R>,
    ready: Option<Ready<R>>,
    tooltips: Option<TooltipController>,
}

impl<R: Renderer + 'static> Dashboard<R> {
    /// Creates an uninitialized session that will draw with `renderer`.
    pub const fn new(config: DashboardConfig, renderer: R) -> Self {
        Self {
            config,
            renderer: Some(renderer),
            ready: None,
            tooltips: None,
        }
    }

    /// Shows hover tooltips on `surface` with the default delays.
    #[must_use]
    pub fn with_tooltips(mut self, surface: Arc<dyn TooltipSurface>) -> Self {
        self.tooltips = Some(TooltipController::new(surface));
        self
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> DashboardState {
        if self.ready.is_some() {
            DashboardState::Ready
        } else {
            DashboardState::Uninitialized
        }
    }

    /// The session configuration.
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Loads the configured scene and performs the initial render.
    ///
    /// On failure the session stays uninitialized and may be loaded again.
    ///
    /// # Errors
    ///
    /// * [`DashboardError::AlreadyLoaded`] if the session is already ready.
    /// * [`DashboardError::Load`] if the dataset cannot be loaded.
    pub async fn load<S: RecordSource>(
        &mut self,
        loader: &DatasetLoader<S>,
    ) -> Result<DashboardState, DashboardError> {
        if self.ready.is_some() {
            return Err(DashboardError::AlreadyLoaded);
        }

        let dataset = loader
            .load(&self.config.scene, &self.config.start, &self.config.end)
            .await?;
        let renderer = self.renderer.take().ok_or(DashboardError::AlreadyLoaded)?;
        self.ready = Some(self.initialize(Rc::new(dataset), renderer));

        log::info!("Dashboard for scene '{}' is ready", self.config.scene);
        Ok(self.state())
    }

    fn initialize(&self, dataset: Rc<Dataset>, renderer: R) -> Ready<R> {
        let coordinator = Rc::new(RefCell::new(RenderCoordinator::new(
            Rc::clone(&dataset),
            renderer,
            self.config.layout,
            ViewHandle::new(self.config.trend_view.clone()),
            ViewHandle::new(self.config.cross_section_view.clone()),
        )));

        let mut selection = SelectionState::new(dataset.date_index().clone());
        let listener = Rc::clone(&coordinator);
        selection.subscribe(move |event: &DateSelected| {
            listener.borrow_mut().on_selection_changed(&event.date);
        });

        let annotations = {
            let mut coordinator = coordinator.borrow_mut();
            if coordinator.render_trend().is_some() {
                coordinator.place_annotations(&self.config.annotations, self.config.radius)
            } else {
                Vec::new()
            }
        };

        if let Some(first) = selection.current_date() {
            coordinator.borrow_mut().on_selection_changed(first);
        } else {
            log::warn!(
                "Scene '{}' loaded with an empty timeline, nothing to select",
                self.config.scene
            );
        }

        Ready {
            dataset,
            selection,
            coordinator,
            annotations,
        }
    }

    fn ready(&self) -> Result<&Ready<R>, DashboardError> {
        self.ready.as_ref().ok_or(DashboardError::NotReady)
    }

    fn ready_mut(&mut self) -> Result<&mut Ready<R>, DashboardError> {
        self.ready.as_mut().ok_or(DashboardError::NotReady)
    }

    /// The loaded dataset.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotReady`] before a successful load.
    pub fn dataset(&self) -> Result<&Dataset, DashboardError> {
        Ok(&self.ready()?.dataset)
    }

    /// The selected date, `None` before loading or for an empty timeline.
    pub fn current_date(&self) -> Option<&str> {
        self.ready
            .as_ref()
            .and_then(|ready| ready.selection.current_date())
    }

    /// Callouts placed during the initial render.
    pub fn annotations(&self) -> &[PlacedAnnotation] {
        self.ready
            .as_ref()
            .map_or(&[], |ready| ready.annotations.as_slice())
    }

    /// Borrows the renderer once it has been handed to the coordinator.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotReady`] before a successful load.
    pub fn renderer(&self) -> Result<Ref<'_, R>, DashboardError> {
        let ready = self.ready()?;
        Ok(Ref::map(
            ready.coordinator.borrow(),
            RenderCoordinator::renderer,
        ))
    }

    /// Selects `date` and redraws the cross-section.
    ///
    /// # Errors
    ///
    /// * [`DashboardError::NotReady`] before a successful load.
    /// * [`DashboardError::Selection`] if `date` is not in the timeline.
    pub fn set_date(&mut self, date: &str) -> Result<usize, DashboardError> {
        let ready = self.ready_mut()?;
        Ok(ready
            .selection
            .set_date(date)
            .map_err(SelectionError::from)?)
    }

    /// A slider moved to `ordinal`. Returns the date it maps to.
    ///
    /// # Errors
    ///
    /// * [`DashboardError::NotReady`] before a successful load.
    /// * [`DashboardError::Selection`] if `ordinal` is out of range.
    pub fn on_slider(&mut self, ordinal: usize) -> Result<String, DashboardError> {
        let ready = self.ready_mut()?;
        Ok(ready.selection.select_index(ordinal)?)
    }

    /// A point on the trend view was clicked. Selects its date and returns
    /// the ordinal an external slider should move to.
    ///
    /// # Errors
    ///
    /// Same as [`Self::set_date`].
    pub fn on_trend_click(&mut self, date: &str) -> Result<usize, DashboardError> {
        self.set_date(date)
    }

    /// Tooltip for a hovered trend point.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotReady`] before a successful load.
    pub fn trend_tooltip(&self, date: &str) -> Result<Option<TooltipContent>, DashboardError> {
        Ok(self.ready()?.coordinator.borrow().trend_tooltip(date))
    }

    /// Tooltip for a hovered region of the currently selected date.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotReady`] before a successful load.
    pub fn region_tooltip(&self, region: &str) -> Result<Option<TooltipContent>, DashboardError> {
        let ready = self.ready()?;
        Ok(ready
            .selection
            .current_date()
            .and_then(|date| ready.coordinator.borrow().region_tooltip(date, region)))
    }

    /// Pointer entered the trend point for `date`. Schedules its tooltip at
    /// `anchor` and returns whether one was scheduled.
    ///
    /// Must be called from within a tokio runtime when tooltips are enabled.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotReady`] before a successful load.
    pub fn on_trend_hover(
        &mut self,
        date: &str,
        anchor: (f64, f64),
    ) -> Result<bool, DashboardError> {
        let content = self.trend_tooltip(date)?;
        Ok(self.show_tooltip(content, anchor))
    }

    /// Pointer entered `region` in the cross-section of the selected date.
    /// Schedules its tooltip at `anchor` and returns whether one was
    /// scheduled.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotReady`] before a successful load.
    pub fn on_region_hover(
        &mut self,
        region: &str,
        anchor: (f64, f64),
    ) -> Result<bool, DashboardError> {
        let content = self.region_tooltip(region)?;
        Ok(self.show_tooltip(content, anchor))
    }

    /// Pointer left a point. Schedules the tooltip to hide.
    pub fn on_hover_end(&mut self) {
        if let Some(tooltips) = &mut self.tooltips {
            tooltips.hide();
        }
    }

    fn show_tooltip(&mut self, content: Option<TooltipContent>, anchor: (f64, f64)) -> bool {
        let Some(tooltips) = &mut self.tooltips else {
            return false;
        };
        let Some(content) = content else {
            log::debug!("Nothing to show for hover at {anchor:?}");
            return false;
        };
        tooltips.show(content, anchor);
        true
    }

    /// Applies `interactions` in order, stopping at the first rejected one.
    ///
    /// A rejected interaction means the caller's view of the timeline has
    /// diverged from the selection, so nothing after it is applied.
    ///
    /// # Errors
    ///
    /// * [`DashboardError::NotReady`] before a successful load.
    /// * [`DashboardError::Selection`] for the first rejected interaction.
    pub fn replay(&mut self, interactions: &[Interaction]) -> Result<(), DashboardError> {
        for interaction in interactions {
            match interaction {
                Interaction::TrendClick(date) => {
                    self.on_trend_click(date)?;
                }
                Interaction::Slider(ordinal) => {
                    self.on_slider(*ordinal)?;
                }
            }
        }
        Ok(())
    }

    /// Registers an extra listener for selection changes, such as a slider
    /// that needs to follow clicks on the trend view.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotReady`] before a successful load.
    pub fn on_date_selected(
        &mut self,
        callback: impl FnMut(&DateSelected) + 'static,
    ) -> Result<SubscriptionId, DashboardError> {
        let ready = self.ready_mut()?;
        Ok(ready.selection.subscribe(callback))
    }
}
