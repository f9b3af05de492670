//! Instrument-event designations grouped by event

use crate::adapters::redcap::FormEventMapping;
use crate::domain::{EventName, InstrumentName, RedcapError, Result};
use std::collections::{BTreeMap, BTreeSet};

/// Event name to the instruments designated for it, ordered by event name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormEventMap {
    events: BTreeMap<EventName, BTreeSet<InstrumentName>>,
}

impl FormEventMap {
    /// Group mapping rows by event
    ///
    /// # Errors
    ///
    /// Returns an invalid-response error for a row with a blank event or form.
    pub fn from_mappings(rows: &[FormEventMapping]) -> Result<Self> {
        let mut events: BTreeMap<EventName, BTreeSet<InstrumentName>> = BTreeMap::new();
        for row in rows {
            let event = EventName::new(row.unique_event_name.as_str())
                .map_err(RedcapError::InvalidResponse)?;
            let form =
                InstrumentName::new(row.form.as_str()).map_err(RedcapError::InvalidResponse)?;
            events.entry(event).or_default().insert(form);
        }
        Ok(Self { events })
    }

    /// Events in name order
    pub fn events(&self) -> impl Iterator<Item = &EventName> {
        self.events.keys()
    }

    /// Instruments designated for `event`
    pub fn forms_for(&self, event: &EventName) -> Option<&BTreeSet<InstrumentName>> {
        self.events.get(event)
    }

    /// Instruments to request for `event`: the selected ones the event actually has
    pub fn instruments_to_download(
        &self,
        event: &EventName,
        selected: &BTreeSet<InstrumentName>,
    ) -> BTreeSet<InstrumentName> {
        match self.events.get(event) {
            Some(available) => available.intersection(selected).cloned().collect(),
            None => BTreeSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
