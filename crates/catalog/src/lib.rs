//! Catalog access for anime-search.
//!
//! This library talks to the Jikan API v4 (the unofficial MyAnimeList API)
//! and exposes the [`CatalogApi`] seam the search front end is written
//! against, so tests can swap the HTTP client for an in-memory fake.

pub mod api;

pub use api::{CatalogApi, CatalogError, JikanClient};
pub use api::types::*;
