//! Fetch + filter + index orchestration for both hierarchy levels.

use covid_dash_series_models::{Dataset, DateIndex, Level, LevelSeries};

use crate::source::RecordSource;
use crate::{LoadError, filter, index};

/// Locations of the two input files for one scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLocations {
    /// National file (`date,cases,deaths`).
    pub country: String,
    /// State file (`date,state,cases,deaths`).
    pub state: String,
}

impl DataLocations {
    /// Resolves `{base}/us-{scene}.csv` and `{base}/us-states-{scene}.csv`.
    #[must_use]
    pub fn for_scene(base: &str, scene: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            country: format!("{base}/us-{scene}.csv"),
            state: format!("{base}/us-states-{scene}.csv"),
        }
    }
}

/// Loads a [`Dataset`] from a [`RecordSource`].
pub struct DatasetLoader<S> {
    source: S,
    base: String,
}

impl<S: RecordSource> DatasetLoader<S> {
    /// Creates a loader reading scene files under `base` (URL prefix or
    /// directory).
    pub fn new(source: S, base: impl Into<String>) -> Self {
        Self {
            source,
            base: base.into(),
        }
    }

    /// Where the files for `scene` are read from.
    #[must_use]
    pub fn locations(&self, scene: &str) -> DataLocations {
        DataLocations::for_scene(&self.base, scene)
    }

    /// Loads both levels for `scene`, clipped to `[start, end]`.
    ///
    /// The timeline comes from the national file. An empty range is not an
    /// error: the dataset simply has no dates.
    ///
    /// # Errors
    ///
    /// * [`LoadError::Fetch`] if either file cannot be fetched. No retry is
    ///   attempted.
    /// * [`LoadError::DateMismatch`] if the state file has a date the
    ///   national file lacks.
    pub async fn load(&self, scene: &str, start: &str, end: &str) -> Result<Dataset, LoadError> {
        let locations = self.locations(scene);
        log::info!(
            "Loading scene '{scene}' for {start}..={end} from {} and {}",
            locations.country,
            locations.state
        );

        let (country, state) = tokio::try_join!(
            self.load_level(&locations.country, Level::Country, start, end),
            self.load_level(&locations.state, Level::State, start, end),
        )?;

        let timeline = DateIndex::from_dates(country.dates());
        let state = index::align_to_timeline(state, &timeline).inspect_err(|e| {
            log::warn!("Scene '{scene}' failed integrity check: {e}");
        })?;
        let dataset = Dataset::new(scene, country, state);

        if dataset.is_empty() {
            log::warn!("Scene '{scene}' has no dates in {start}..={end}");
        } else {
            log::info!(
                "Loaded scene '{scene}': {} dates, {} state records",
                dataset.dates().len(),
                dataset.by_level(Level::State).flat_series().len()
            );
        }

        Ok(dataset)
    }

    async fn load_level(
        &self,
        location: &str,
        level: Level,
        start: &str,
        end: &str,
    ) -> Result<LevelSeries, LoadError> {
        let raw = self
            .source
            .fetch(location)
            .await
            .map_err(|source| LoadError::Fetch {
                location: location.to_owned(),
                source,
            })?;
        let total = raw.len();

        let records = filter::filter(raw, start, end);
        log::debug!(
            "[{level}] {} of {total} records within {start}..={end}",
            records.len()
        );

        Ok(index::build(&records, level))
    }
}
