//! Search state and the result store.
//!
//! The store is the only place search results live. It changes through four
//! transitions: `begin_fetch`, `fetch_succeeded`, `fetch_failed` and
//! `set_query`. Every fetch is tagged with a [`FetchTicket`]; only the newest
//! ticket may touch `list`, `pagination` or `loading`, so a slow response to
//! an older search can never overwrite a newer one.

use catalog::{AnimeEntry, Pagination};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// One search hit, normalised from the catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct ResultItem {
    pub id: u32,
    pub title: String,
    pub image_url: String,
    pub score: Option<f64>,
}

impl From<AnimeEntry> for ResultItem {
    fn from(entry: AnimeEntry) -> Self {
        Self {
            id: entry.mal_id,
            title: entry.title,
            image_url: entry.images.jpg.image_url.unwrap_or_default(),
            score: entry.score,
        }
    }
}

/// Server-reported pagination
#[derive(Debug, Clone, PartialEq)]
pub struct PageInfo {
    pub current_page: u32,
    pub last_page: u32,
    pub has_next: bool,
    pub total_items: Option<u32>,
}

impl PageInfo {
    /// Page controls only make sense with more than one page.
    pub fn has_controls(&self) -> bool {
        self.last_page > 1
    }

    /// Page after this one, if the catalog reports more.
    pub fn next_page(&self) -> Option<u32> {
        if self.has_next {
            self.current_page.checked_add(1)
        } else {
            None
        }
    }

    /// Total item count, estimated from the page count when the catalog
    /// did not report one.
    pub fn total_or_estimate(&self, page_size: u32) -> u32 {
        self.total_items
            .unwrap_or_else(|| self.last_page.saturating_mul(page_size))
    }
}

impl From<Pagination> for PageInfo {
    fn from(pagination: Pagination) -> Self {
        Self {
            current_page: pagination.current_page,
            last_page: pagination.last_visible_page,
            has_next: pagination.has_next_page,
            total_items: pagination.items.map(|items| items.total),
        }
    }
}

/// Everything the list view renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub list: Vec<ResultItem>,
    pub loading: bool,
    pub pagination: Option<PageInfo>,
}

/// Identifies one fetch started with [`ResultStore::begin_fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Search state plus the request generation counter
#[derive(Debug, Default)]
pub struct ResultStore {
    state: SearchState,
    generation: u64,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Enter `Loading`. List and pagination stay as they are.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state.loading = true;
        FetchTicket(self.generation)
    }

    fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Replace list and pagination wholesale and leave `Loading`.
    ///
    /// Returns `false` and changes nothing when a newer fetch has started
    /// since `ticket` was issued.
    pub fn fetch_succeeded(
        &mut self,
        ticket: FetchTicket,
        items: Vec<ResultItem>,
        page_info: Option<PageInfo>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(
                ticket = ticket.0,
                current = self.generation,
                "Discarding superseded search result"
            );
            return false;
        }

        self.state.loading = false;
        self.state.list = items;
        self.state.pagination = page_info;
        true
    }

    /// Leave `Loading`, keeping the previous list and pagination.
    ///
    /// Returns `false` and changes nothing for a superseded ticket.
    pub fn fetch_failed(&mut self, ticket: FetchTicket) -> bool {
        if !self.is_current(ticket) {
            debug!(
                ticket = ticket.0,
                current = self.generation,
                "Ignoring failure of superseded search"
            );
            return false;
        }

        self.state.loading = false;
        true
    }

    pub fn set_query(&mut self, text: &str) {
        self.state.query = text.to_string();
    }
}

/// Shared handle to the session's result store.
///
/// Cloning is cheap; all clones see the same store. The lock is held for a
/// single transition only.
#[derive(Debug, Clone, Default)]
pub struct SharedStore(Arc<Mutex<ResultStore>>);

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ResultStore> {
        // Transitions cannot leave the store half-written, so a poisoned
        // lock still guards consistent data.
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the store under the lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut ResultStore) -> R) -> R {
        f(&mut self.lock())
    }

    /// Copy of the current state for rendering.
    pub fn snapshot(&self) -> SearchState {
        self.lock().state().clone()
    }
}
