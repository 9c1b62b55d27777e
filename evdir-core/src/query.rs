//! Query contract: wire parameters in, listing envelope out.
//!
//! This is the only place raw request values are interpreted. Malformed values
//! are dropped (the filter is treated as not supplied) so that the pipeline
//! behind it never sees bad input and never fails.
//!
//! Range parameters (`dateFrom`/`dateTo`, `timeFrom`/`timeTo`,
//! `popularityMin`/`popularityMax`) are canonical. The exact-match parameters
//! `date`, `time` and `popularity` collapse a range onto a single value, and
//! `order` is accepted for `sortOrder`.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LIMIT;
use crate::date_range::{DateRange, parse_date};
use crate::event::{Event, clock_minutes};
use crate::filter::{EventFilter, normalize};
use crate::page::{PageRequest, paginate};
use crate::sort::{SortKey, SortOrder, sort_in_place};

/// Raw query-string parameters, all optional and all strings on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQueryParams {
    pub q: Option<String>,
    pub kind: Option<String>,
    pub place: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub time_from: Option<String>,
    pub time_to: Option<String>,
    pub popularity_min: Option<String>,
    pub popularity_max: Option<String>,

    // Exact-match variant
    pub date: Option<String>,
    pub time: Option<String>,
    pub popularity: Option<String>,

    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    /// Older clients send `order` instead of `sortOrder`
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl EventQueryParams {
    /// Collect parameters from decoded query-string pairs. Unknown keys are
    /// ignored. Repeated `type`/`place` values accumulate into one set; for
    /// every other key the last value wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = EventQueryParams::default();
        for (key, value) in pairs {
            let value = value.into();
            let slot = match key.as_ref() {
                "q" => &mut params.q,
                "type" => {
                    append_value(&mut params.kind, value);
                    continue;
                }
                "place" => {
                    append_value(&mut params.place, value);
                    continue;
                }
                "dateFrom" => &mut params.date_from,
                "dateTo" => &mut params.date_to,
                "timeFrom" => &mut params.time_from,
                "timeTo" => &mut params.time_to,
                "popularityMin" => &mut params.popularity_min,
                "popularityMax" => &mut params.popularity_max,
                "date" => &mut params.date,
                "time" => &mut params.time,
                "popularity" => &mut params.popularity,
                "sortBy" => &mut params.sort_by,
                "sortOrder" => &mut params.sort_order,
                "order" => &mut params.order,
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                _ => continue,
            };
            *slot = Some(value);
        }
        params
    }

    /// Wire-name pairs for every parameter that is set.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("q", &self.q),
            ("type", &self.kind),
            ("place", &self.place),
            ("dateFrom", &self.date_from),
            ("dateTo", &self.date_to),
            ("timeFrom", &self.time_from),
            ("timeTo", &self.time_to),
            ("popularityMin", &self.popularity_min),
            ("popularityMax", &self.popularity_max),
            ("date", &self.date),
            ("time", &self.time),
            ("popularity", &self.popularity),
            ("sortBy", &self.sort_by),
            ("sortOrder", &self.sort_order),
            ("order", &self.order),
            ("page", &self.page),
            ("limit", &self.limit),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|v| (key, v)))
        .collect()
    }
}

fn append_value(slot: &mut Option<String>, value: String) {
    match slot {
        Some(existing) => {
            existing.push(',');
            existing.push_str(&value);
        }
        None => *slot = Some(value),
    }
}

/// Deployment-level defaults applied while parsing.
#[derive(Debug, Clone, Copy)]
pub struct QueryDefaults {
    pub limit: usize,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        QueryDefaults {
            limit: DEFAULT_LIMIT,
        }
    }
}

/// The filters that were recognized and applied, echoed back to the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiltersUsed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    #[serde(rename = "place", skip_serializing_if = "Option::is_none")]
    pub places: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity_max: Option<f64>,
}

impl FiltersUsed {
    pub fn is_empty(&self) -> bool {
        *self == FiltersUsed::default()
    }

    /// Encode the echoed filters back into request parameters. Parsing the
    /// result yields the same filter criteria.
    pub fn to_params(&self) -> EventQueryParams {
        EventQueryParams {
            q: self.q.clone(),
            kind: self.types.as_ref().map(|t| t.join(",")),
            place: self.places.as_ref().map(|p| p.join(",")),
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
            time_from: self.time_from.clone(),
            time_to: self.time_to.clone(),
            popularity_min: self.popularity_min.map(|n| n.to_string()),
            popularity_max: self.popularity_max.map(|n| n.to_string()),
            date: self.date.clone(),
            time: self.time.clone(),
            popularity: self.popularity.map(|n| n.to_string()),
            ..Default::default()
        }
    }
}

/// Response envelope for `GET /api/events`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListing {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    pub filters_used: FiltersUsed,
    pub data: Vec<Event>,
}

/// A fully validated listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    pub filter: EventFilter,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
    pub page: PageRequest,
    pub filters_used: FiltersUsed,
}

impl EventQuery {
    pub fn from_params(params: &EventQueryParams, defaults: &QueryDefaults) -> Self {
        let mut filter = EventFilter::default();
        let mut used = FiltersUsed::default();

        if let Some(q) = present(&params.q) {
            filter.text = Some(normalize(q));
            used.q = Some(q.to_string());
        }

        if let Some(types) = present(&params.kind).and_then(split_values) {
            filter.types = Some(types.clone());
            used.types = Some(types);
        }

        if let Some(places) = present(&params.place).and_then(split_values) {
            filter.places = Some(places.clone());
            used.places = Some(places);
        }

        // Dates
        let date_from = present(&params.date_from).and_then(parse_date);
        let date_to = present(&params.date_to).and_then(parse_date);
        let date = present(&params.date).and_then(parse_date);
        used.date_from = date_from.map(|d| d.to_string());
        used.date_to = date_to.map(|d| d.to_string());
        used.date = date.map(|d| d.to_string());
        filter.dates = DateRange::new(
            tighter(date_from, date, Bound::Lower),
            tighter(date_to, date, Bound::Upper),
        );

        // Times of day
        let time_from = present(&params.time_from).and_then(clock_minutes);
        let time_to = present(&params.time_to).and_then(clock_minutes);
        let time = present(&params.time).and_then(clock_minutes);
        used.time_from = time_from.map(format_minutes);
        used.time_to = time_to.map(format_minutes);
        used.time = time.map(format_minutes);
        filter.time_from = tighter(time_from, time, Bound::Lower);
        filter.time_to = tighter(time_to, time, Bound::Upper);

        // Popularity
        let popularity_min = present(&params.popularity_min).and_then(parse_number);
        let popularity_max = present(&params.popularity_max).and_then(parse_number);
        let popularity = present(&params.popularity).and_then(parse_number);
        used.popularity_min = popularity_min;
        used.popularity_max = popularity_max;
        used.popularity = popularity;
        filter.popularity_min = tighter(popularity_min, popularity, Bound::Lower);
        filter.popularity_max = tighter(popularity_max, popularity, Bound::Upper);

        let sort_key = params
            .sort_by
            .as_deref()
            .map(SortKey::parse)
            .unwrap_or_default();
        let sort_order = present(&params.sort_order)
            .or(present(&params.order))
            .map(SortOrder::parse)
            .unwrap_or_default();

        let page = PageRequest::parse(
            params.page.as_deref(),
            params.limit.as_deref(),
            defaults.limit,
        );

        EventQuery {
            filter,
            sort_key,
            sort_order,
            page,
            filters_used: used,
        }
    }

    /// Filter, sort and paginate `events` into the response envelope.
    pub fn run(&self, events: Vec<Event>) -> EventListing {
        let loaded = events.len();
        let mut matched: Vec<Event> = events
            .into_iter()
            .filter(|e| self.filter.matches(e))
            .collect();
        sort_in_place(&mut matched, self.sort_key, self.sort_order);
        let page = paginate(matched, self.page);

        tracing::debug!(
            loaded,
            matched = page.total,
            page = page.page,
            limit = page.limit,
            sort_by = %self.sort_key,
            sort_order = %self.sort_order,
            "ran event query"
        );

        EventListing {
            page: page.page,
            limit: page.limit,
            total: page.total,
            total_pages: page.total_pages,
            sort_by: self.sort_key,
            sort_order: self.sort_order,
            filters_used: self.filters_used.clone(),
            data: page.items,
        }
    }
}

#[derive(Clone, Copy)]
enum Bound {
    Lower,
    Upper,
}

/// Combine a range bound with an exact-match value. Both must hold, so the
/// tighter of the two wins.
fn tighter<T: PartialOrd>(range: Option<T>, exact: Option<T>, bound: Bound) -> Option<T> {
    match (range, exact) {
        (Some(a), Some(b)) => {
            let keep_range = match bound {
                Bound::Lower => a >= b,
                Bound::Upper => a <= b,
            };
            Some(if keep_range { a } else { b })
        }
        (a, b) => a.or(b),
    }
}

/// Non-blank, trimmed parameter value.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Comma-separated set of normalized values; `None` if nothing remains.
fn split_values(raw: &str) -> Option<Vec<String>> {
    let values: Vec<String> = raw
        .split(',')
        .map(normalize)
        .filter(|v| !v.is_empty())
        .collect();
    (!values.is_empty()).then_some(values)
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
