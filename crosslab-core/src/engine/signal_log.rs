//! SignalLog — append-only, chronological record of emitted signals.

use serde::{Deserialize, Serialize};

use crate::domain::{SignalAction, SignalEvent};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalLog {
    events: Vec<SignalEvent>,
}

impl SignalLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bars are replayed in date order, so appending keeps the log sorted.
    pub(crate) fn append(&mut self, event: SignalEvent) {
        debug_assert!(
            self.events.last().map_or(true, |last| last.date <= event.date),
            "signal appended out of chronological order"
        );
        self.events.push(event);
    }

    pub fn events(&self) -> &[SignalEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SignalEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&SignalEvent> {
        self.events.last()
    }

    pub fn count(&self, action: SignalAction) -> usize {
        self.events.iter().filter(|e| e.action == action).count()
    }
}

impl<'a> IntoIterator for &'a SignalLog {
    type Item = &'a SignalEvent;
    type IntoIter = std::slice::Iter<'a, SignalEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
