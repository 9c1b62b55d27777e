//! Core types for evdir, a small event directory service.
//!
//! This crate holds everything below the HTTP layer:
//! - `Event` records and the `EventStore` that loads them from a JSON file
//! - the query pipeline: `EventFilter`, `sort_events`, `paginate`
//! - `EventQuery`, which turns raw query parameters into that pipeline and
//!   assembles the `EventListing` response
//! - configuration and error types

pub mod config;
pub mod constants;
pub mod date_range;
pub mod error;
pub mod event;
pub mod filter;
pub mod page;
pub mod query;
pub mod sort;
pub mod store;

pub use config::EvdirConfig;
pub use error::{EvdirError, EvdirResult};
pub use event::Event;
pub use filter::EventFilter;
pub use page::{Page, PageRequest, paginate};
pub use query::{EventListing, EventQuery, EventQueryParams, FiltersUsed, QueryDefaults};
pub use sort::{SortKey, SortOrder, sort_events};
pub use store::EventStore;
