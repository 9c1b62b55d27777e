//! Sort engine: stable ordering of events by a selectable key.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::event::Event;
use crate::filter::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Combined date and time (the default)
    #[default]
    Date,
    /// Time of day only; events without a time sort lowest
    Time,
    Type,
    Place,
    Title,
    Popularity,
}

impl SortKey {
    /// Parse a key name case-insensitively. `name` is an alias for `title`;
    /// anything unrecognized falls back to `date`.
    pub fn parse(s: &str) -> Self {
        match normalize(s).as_str() {
            "time" => SortKey::Time,
            "type" => SortKey::Type,
            "place" => SortKey::Place,
            "title" | "name" => SortKey::Title,
            "popularity" => SortKey::Popularity,
            _ => SortKey::Date,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Time => "time",
            SortKey::Type => "type",
            SortKey::Place => "place",
            SortKey::Title => "title",
            SortKey::Popularity => "popularity",
        }
    }

    /// Ascending comparison of two events under this key. Always total.
    pub fn compare(&self, a: &Event, b: &Event) -> Ordering {
        match self {
            SortKey::Date => a.starts_at().cmp(&b.starts_at()),
            SortKey::Time => a.minutes().cmp(&b.minutes()),
            SortKey::Type => compare_text(&a.kind, &b.kind),
            SortKey::Place => compare_text(&a.place, &b.place),
            SortKey::Title => compare_text(&a.title, &b.title),
            SortKey::Popularity => a.popularity.total_cmp(&b.popularity),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Only `asc` (any case) sorts ascending; everything else is `desc`.
    pub fn parse(s: &str) -> Self {
        if normalize(s) == "asc" {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Return a sorted copy of `events`. Events with equal keys keep their input
/// order in both directions.
pub fn sort_events(events: &[Event], key: SortKey, order: SortOrder) -> Vec<Event> {
    let mut sorted = events.to_vec();
    sort_in_place(&mut sorted, key, order);
    sorted
}

pub(crate) fn sort_in_place(events: &mut [Event], key: SortKey, order: SortOrder) {
    // slice::sort_by is stable; reversing the comparator (not the output)
    // keeps ties in input order for desc as well.
    match order {
        SortOrder::Asc => events.sort_by(|a, b| key.compare(a, b)),
        SortOrder::Desc => events.sort_by(|a, b| key.compare(b, a)),
    }
}

// Compares lowercased text, so "apple" < "Banana" < "cherry". This is code
// point order after lowercasing, not locale collation: accented letters sort
// after "z".
fn compare_text(a: &str, b: &str) -> Ordering {
    normalize(a).cmp(&normalize(b))
}
