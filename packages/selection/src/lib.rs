#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The single currently-selected date shared by the trend and
//! cross-section views.
//!
//! [`SelectionState`] is the only writer of the selected date. Views
//! register listeners with [`SelectionState::subscribe`] and are told about
//! every successful [`SelectionState::set_date`] call, synchronously and in
//! registration order.

use covid_dash_series_models::DateIndex;

/// Returned when a date outside the loaded timeline is selected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Date {date} is not part of the loaded timeline")]
pub struct InvalidDateError {
    /// The rejected date.
    pub date: String,
}

/// Errors that can occur while changing the selection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// The date is not in the timeline.
    #[error(transparent)]
    InvalidDate(#[from] InvalidDateError),

    /// A slider ordinal past the end of the timeline.
    #[error("Ordinal {ordinal} is out of range for a timeline of {len} dates")]
    OrdinalOutOfRange {
        /// The rejected ordinal.
        ordinal: usize,
        /// Number of dates in the timeline.
        len: usize,
    },
}

/// Payload delivered to listeners after each selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateSelected {
    /// The newly selected date.
    pub date: String,
    /// Its position in the timeline.
    pub ordinal: usize,
}

/// Handle returned by [`SelectionState::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

struct Subscription {
    id: SubscriptionId,
    callback: Box<dyn FnMut(&DateSelected)>,
}

/// Owns the selected date and its listeners.
pub struct SelectionState {
    index: DateIndex,
    current: Option<String>,
    next_subscription_id: u32,
    subscribers: Vec<Subscription>,
}

impl std::fmt::Debug for SelectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionState")
            .field("current", &self.current)
            .field("dates", &self.index.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl SelectionState {
    /// Creates a selection over `index`, starting at its first date. An
    /// empty timeline has no selection.
    #[must_use]
    pub fn new(index: DateIndex) -> Self {
        let current = index.first().map(ToOwned::to_owned);
        Self {
            index,
            current,
            next_subscription_id: 0,
            subscribers: Vec::new(),
        }
    }

    /// The selected date, `None` only for an empty timeline.
    #[must_use]
    pub fn current_date(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Ordinal of the selected date.
    #[must_use]
    pub fn current_ordinal(&self) -> Option<usize> {
        self.current.as_deref().and_then(|d| self.index.lookup(d))
    }

    /// Ordinal of `date`, for resynchronizing ordinal-indexed controls.
    #[must_use]
    pub fn lookup(&self, date: &str) -> Option<usize> {
        self.index.lookup(date)
    }

    /// The timeline the selection ranges over.
    #[must_use]
    pub const fn index(&self) -> &DateIndex {
        &self.index
    }

    /// Selects `date` and notifies every listener once.
    ///
    /// Selecting the already-selected date still notifies.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDateError`] if `date` is not in the timeline. The
    /// selection is left unchanged and no listener runs.
    pub fn set_date(&mut self, date: &str) -> Result<usize, InvalidDateError> {
        let Some(ordinal) = self.index.lookup(date) else {
            log::warn!("Rejected selection of {date}: not in the loaded timeline");
            return Err(InvalidDateError {
                date: date.to_owned(),
            });
        };

        log::debug!("Selected {date} (#{ordinal})");
        self.current = Some(date.to_owned());

        let event = DateSelected {
            date: date.to_owned(),
            ordinal,
        };
        for subscription in &mut self.subscribers {
            (subscription.callback)(&event);
        }

        Ok(ordinal)
    }

    /// Selects the date at `ordinal`, as reported by a slider.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::OrdinalOutOfRange`] if `ordinal` is past
    /// the end of the timeline.
    pub fn select_index(&mut self, ordinal: usize) -> Result<String, SelectionError> {
        let date = self
            .index
            .date_at(ordinal)
            .map(ToOwned::to_owned)
            .ok_or(SelectionError::OrdinalOutOfRange {
                ordinal,
                len: self.index.len(),
            })?;
        self.set_date(&date)?;
        Ok(date)
    }

    /// Registers `callback` to run after every selection.
    ///
    /// Callbacks receive the event by argument and must not reach back into
    /// this selection.
    pub fn subscribe(&mut self, callback: impl FnMut(&DateSelected) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription_id);
        self.next_subscription_id = self.next_subscription_id.wrapping_add(1);
        self.subscribers.push(Subscription {
            id,
            callback: Box::new(callback),
        });
        id
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        if let Some(idx) = self.subscribers.iter().position(|s| s.id == id) {
            self.subscribers.remove(idx);
            true
        } else {
            false
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
