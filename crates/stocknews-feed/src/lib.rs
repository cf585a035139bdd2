//! Incremental news feed: search, paginate, enrich, save.
//!
//! [`FeedState`] is the pure state machine; [`FeedController`] runs it
//! against a [`stocknews_source::PageSource`] and a
//! [`stocknews_enrich::Enricher`]. At most one page fetch is in flight per
//! search, and an empty or failed page ends the feed until the next search.

pub mod controller;
pub mod error;
pub mod state;
pub mod workflows;

pub use controller::{FeedController, PageFetcher};
pub use error::{ErrorKind, FeedError};
pub use state::{FeedEvent, FeedPhase, FeedState, Notice, PageRequest, PageTicket, Transition};
pub use workflows::{delete_all_saved, delete_saved, list_saved, refresh_company, save_feed};
