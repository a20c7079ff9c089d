//! Service layer for the snapshot application.
//!
//! - Resource metadata fetching (`ResourceFetcher`)

mod fetcher;

pub use fetcher::ResourceFetcher;
