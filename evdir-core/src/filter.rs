//! Filter engine: a conjunction of optional predicates over events.

use crate::date_range::DateRange;
use crate::event::Event;

/// Filter criteria. Every `None` field means "no constraint"; all supplied
/// predicates must hold for an event to match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    /// Lowercased needle matched against title, description and place
    pub text: Option<String>,
    /// Lowercased accepted `type` values
    pub types: Option<Vec<String>>,
    /// Lowercased accepted `place` values
    pub places: Option<Vec<String>>,
    pub dates: DateRange,
    /// Minutes since midnight
    pub time_from: Option<u32>,
    pub time_to: Option<u32>,
    pub popularity_min: Option<f64>,
    pub popularity_max: Option<f64>,
}

impl EventFilter {
    pub fn is_empty(&self) -> bool {
        *self == EventFilter::default()
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.matches_text(event)
            && matches_set(self.types.as_deref(), &event.kind)
            && matches_set(self.places.as_deref(), &event.place)
            && self.dates.contains(event.date)
            && self.matches_time(event)
            && self.matches_popularity(event)
    }

    /// Keep the matching events, in their original order.
    pub fn apply(&self, events: &[Event]) -> Vec<Event> {
        events.iter().filter(|e| self.matches(e)).cloned().collect()
    }

    fn matches_text(&self, event: &Event) -> bool {
        let Some(needle) = self.text.as_deref() else {
            return true;
        };
        normalize(&event.title).contains(needle)
            || event
                .description
                .as_deref()
                .is_some_and(|d| normalize(d).contains(needle))
            || normalize(&event.place).contains(needle)
    }

    // Events without a usable time pass every time bound.
    fn matches_time(&self, event: &Event) -> bool {
        let Some(minutes) = event.minutes() else {
            return true;
        };
        self.time_from.is_none_or(|from| minutes >= from)
            && self.time_to.is_none_or(|to| minutes <= to)
    }

    fn matches_popularity(&self, event: &Event) -> bool {
        self.popularity_min.is_none_or(|min| event.popularity >= min)
            && self.popularity_max.is_none_or(|max| event.popularity <= max)
    }
}

fn matches_set(accepted: Option<&[String]>, value: &str) -> bool {
    match accepted {
        Some(values) => {
            let value = normalize(value);
            values.iter().any(|v| *v == value)
        }
        None => true,
    }
}

/// Trimmed, lowercased form used for every case-insensitive comparison.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
