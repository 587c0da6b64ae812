//! Jikan API v4 client implementation.
//!
//! This module provides the catalog trait, a reqwest-backed client for the
//! Jikan API, the error taxonomy, and the wire types.

pub mod client;
pub mod error;
pub mod types;

use std::future::Future;

pub use client::JikanClient;
pub use error::CatalogError;

use types::{AnimeDetails, AnimePage};

/// Read-only access to the anime catalog.
pub trait CatalogApi: Send + Sync + 'static {
    /// Search titles matching `query`, returning one page of results.
    fn search_anime(
        &self,
        query: &str,
        page: u32,
    ) -> impl Future<Output = Result<AnimePage, CatalogError>> + Send;

    /// Fetch one title with extended fields. `Ok(None)` when the catalog has
    /// no such id.
    fn get_anime(
        &self,
        id: u32,
    ) -> impl Future<Output = Result<Option<AnimeDetails>, CatalogError>> + Send;
}
