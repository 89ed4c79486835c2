//! Delayed tooltip show/hide with a single cancellable timer.
//!
//! Each [`TooltipController`] owns at most one pending timer. Any new
//! request aborts it first, so a stale hide can never close a tooltip that
//! was shown after it was scheduled.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::format::format_count;

/// Delay before a hovered point's tooltip appears.
pub const SHOW_DELAY: Duration = Duration::from_millis(100);

/// Delay before a tooltip disappears once the pointer leaves.
pub const HIDE_DELAY: Duration = Duration::from_millis(5000);

/// What a tooltip says.
#[derive(Debug, Clone, PartialEq)]
pub enum TooltipContent {
    /// A point on the national trend.
    Trend {
        /// Timeline date.
        date: String,
        /// National cases.
        cases: f64,
    },
    /// A region in the cross-section.
    Region {
        /// Region name.
        region: String,
        /// Cases in the region.
        cases: f64,
        /// Deaths in the region.
        deaths: f64,
    },
}

impl fmt::Display for TooltipContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trend { date, cases } => {
                write!(f, "Cases: {}\nDate: {date}", format_count(*cases))
            }
            Self::Region {
                region,
                cases,
                deaths,
            } => write!(
                f,
                "{region}\nCases: {}\nDeaths: {}",
                format_count(*cases),
                format_count(*deaths)
            ),
        }
    }
}

/// Where tooltips are actually displayed.
pub trait TooltipSurface: Send + Sync {
    /// Shows `content` at page coordinates `anchor`.
    fn show(&self, content: &TooltipContent, anchor: (f64, f64));

    /// Hides the tooltip.
    fn hide(&self);
}

/// Schedules show/hide on a [`TooltipSurface`].
///
/// Must be used from within a tokio runtime.
pub struct TooltipController {
    surface: Arc<dyn TooltipSurface>,
    show_delay: Duration,
    hide_delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl TooltipController {
    /// Creates a controller with the default delays.
    #[must_use]
    pub fn new(surface: Arc<dyn TooltipSurface>) -> Self {
        Self::with_delays(surface, SHOW_DELAY, HIDE_DELAY)
    }

    /// Creates a controller with custom delays.
    #[must_use]
    pub fn with_delays(
        surface: Arc<dyn TooltipSurface>,
        show_delay: Duration,
        hide_delay: Duration,
    ) -> Self {
        Self {
            surface,
            show_delay,
            hide_delay,
            pending: None,
        }
    }

    /// Pointer entered a point: cancel any pending timer, then show
    /// `content` after the show delay.
    pub fn show(&mut self, content: TooltipContent, anchor: (f64, f64)) {
        let surface = Arc::clone(&self.surface);
        let delay = self.show_delay;
        self.schedule(async move {
            tokio::time::sleep(delay).await;
            surface.show(&content, anchor);
        });
    }

    /// Pointer left a point: cancel any pending timer, then hide after the
    /// hide delay.
    pub fn hide(&mut self) {
        let surface = Arc::clone(&self.surface);
        let delay = self.hide_delay;
        self.schedule(async move {
            tokio::time::sleep(delay).await;
            surface.hide();
        });
    }

    /// Aborts the pending timer, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a timer is scheduled and has not fired yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn schedule(&mut self, task: impl Future<Output = ()> + Send + 'static) {
        self.cancel();
        self.pending = Some(tokio::spawn(task));
    }
}

impl Drop for TooltipController {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Shown {
        Show(String),
        Hide,
    }

    #[derive(Default)]
    struct Surface {
        events: Mutex<Vec<Shown>>,
    }

    impl TooltipSurface for Surface {
        fn show(&self, content: &TooltipContent, _anchor: (f64, f64)) {
            self.events
                .lock()
                .unwrap()
                .push(Shown::Show(content.to_string()));
        }

        fn hide(&self) {
            self.events.lock().unwrap().push(Shown::Hide);
        }
    }

    fn trend(date: &str) -> TooltipContent {
        TooltipContent::Trend {
            date: date.to_string(),
            cases: 1234.0,
        }
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        tokio::task::yield_now().await;
    }

    #[test]
    fn formats_trend_and_region_content() {
        assert_eq!(trend("2020-03-11").to_string(), "Cases: 1,234\nDate: 2020-03-11");
        let region = TooltipContent::Region {
            region: "New York".to_string(),
            cases: 52_318.0,
            deaths: f64::NAN,
        };
        assert_eq!(region.to_string(), "New York\nCases: 52,318\nDeaths: NaN");
    }

    #[tokio::test(start_paused = true)]
    async fn shows_after_delay() {
        let surface = Arc::new(Surface::default());
        let mut controller = TooltipController::new(surface.clone());

        controller.show(trend("2020-03-11"), (10.0, 20.0));
        advance(50).await;
        assert!(surface.events.lock().unwrap().is_empty());
        assert!(controller.is_pending());

        advance(100).await;
        assert_eq!(surface.events.lock().unwrap().len(), 1);
        assert!(!controller.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn new_show_cancels_pending_hide() {
        let surface = Arc::new(Surface::default());
        let mut controller = TooltipController::new(surface.clone());

        controller.show(trend("2020-03-11"), (0.0, 0.0));
        advance(150).await;
        controller.hide();
        advance(1000).await;
        controller.show(trend("2020-03-12"), (0.0, 0.0));
        advance(6000).await;

        let events = surface.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| matches!(e, Shown::Show(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn hide_fires_when_not_interrupted() {
        let surface = Arc::new(Surface::default());
        let mut controller = TooltipController::new(surface.clone());

        controller.show(trend("2020-03-11"), (0.0, 0.0));
        advance(150).await;
        controller.hide();
        advance(5100).await;

        assert_eq!(surface.events.lock().unwrap().last(), Some(&Shown::Hide));
    }

    #[tokio::test(start_paused = true)]
    async fn leaving_before_show_delay_never_shows() {
        let surface = Arc::new(Surface::default());
        let mut controller = TooltipController::new(surface.clone());

        controller.show(trend("2020-03-11"), (0.0, 0.0));
        advance(20).await;
        controller.hide();
        advance(6000).await;

        assert_eq!(*surface.events.lock().unwrap(), [Shown::Hide]);
    }
}
