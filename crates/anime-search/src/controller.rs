//! Search controller.
//!
//! Turns keystrokes and page clicks into catalog searches. Typed text is
//! committed through a [`Debouncer`]; page changes dispatch immediately.
//! Searches run as spawned tasks that drive the [`SharedStore`] transitions
//! and report back over an event channel, so the front end can re-render
//! and show errors from searches it did not await itself.

use crate::debounce::Debouncer;
use crate::state::{PageInfo, ResultItem, SharedStore};
use catalog::{CatalogApi, CatalogError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Outcome notifications published by background searches
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// A fetch started; the store is loading.
    Loading { query: String, page: u32 },
    /// The store now holds this search's results.
    Updated {
        query: String,
        page: u32,
        results: usize,
    },
    /// A newer search started before this one finished; its outcome, success
    /// or failure, was dropped.
    Superseded { query: String, page: u32 },
    /// The search failed. `message` is meant for the user.
    Failed {
        query: String,
        page: u32,
        message: String,
    },
}

/// What a completed search did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Applied { results: usize },
    Superseded,
}

/// Everything a spawned search needs, cheap to clone into a task.
struct SearchContext<C> {
    catalog: Arc<C>,
    store: SharedStore,
    events: mpsc::UnboundedSender<SearchEvent>,
}

impl<C> Clone for SearchContext<C> {
    fn clone(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
            store: self.store.clone(),
            events: self.events.clone(),
        }
    }
}

impl<C: CatalogApi> SearchContext<C> {
    fn publish(&self, event: SearchEvent) {
        // A closed receiver only means nobody is rendering anymore.
        let _ = self.events.send(event);
    }

    /// Fetch one page and drive the store through begin -> succeeded/failed.
    async fn run(&self, query: &str, page: u32) -> Result<SearchOutcome, CatalogError> {
        let ticket = self.store.update(|store| store.begin_fetch());
        info!(
            query = query,
            page = page,
            generation = ticket.generation(),
            "Dispatching search"
        );
        self.publish(SearchEvent::Loading {
            query: query.to_string(),
            page,
        });

        match self.catalog.search_anime(query, page).await {
            Ok(result) => {
                let items: Vec<ResultItem> =
                    result.data.into_iter().map(ResultItem::from).collect();
                let page_info = result.pagination.map(PageInfo::from);
                let results = items.len();

                let applied = self
                    .store
                    .update(|store| store.fetch_succeeded(ticket, items, page_info));

                if applied {
                    debug!(query = query, page = page, results = results, "Search applied");
                    self.publish(SearchEvent::Updated {
                        query: query.to_string(),
                        page,
                        results,
                    });
                    Ok(SearchOutcome::Applied { results })
                } else {
                    info!(query = query, page = page, "Search superseded by a newer one");
                    self.publish(SearchEvent::Superseded {
                        query: query.to_string(),
                        page,
                    });
                    Ok(SearchOutcome::Superseded)
                }
            }
            Err(e) => {
                let current = self.store.update(|store| store.fetch_failed(ticket));
                warn!(
                    query = query,
                    page = page,
                    error = %e,
                    superseded = !current,
                    "Search failed"
                );
                if current {
                    self.publish(SearchEvent::Failed {
                        query: query.to_string(),
                        page,
                        message: e.to_string(),
                    });
                } else {
                    self.publish(SearchEvent::Superseded {
                        query: query.to_string(),
                        page,
                    });
                }
                Err(e)
            }
        }
    }

    /// Run a search in the background; the outcome arrives as an event.
    fn spawn(&self, query: String, page: u32) {
        let ctx = self.clone();
        tokio::spawn(async move {
            // Errors were already published and logged by `run`.
            let _ = ctx.run(&query, page).await;
        });
    }
}

/// Owns the query text and decides when to search
pub struct SearchController<C: CatalogApi> {
    ctx: SearchContext<C>,
    debouncer: Debouncer,
    /// Latest raw input, echoed back to the user immediately
    text: String,
    landed: bool,
}

impl<C: CatalogApi> SearchController<C> {
    /// Create a controller and the receiver for its events
    pub fn new(
        catalog: Arc<C>,
        store: SharedStore,
        debounce: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let controller = Self {
            ctx: SearchContext {
                catalog,
                store,
                events,
            },
            debouncer: Debouncer::new(debounce),
            text: String::new(),
            landed: false,
        };
        (controller, receiver)
    }

    /// Raw input as last typed
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn store(&self) -> &SharedStore {
        &self.ctx.store
    }

    /// Landing search with an empty query. Only the first call dispatches.
    pub fn start(&mut self) {
        if self.landed {
            return;
        }
        self.landed = true;
        debug!("Dispatching landing search");
        self.ctx.spawn(String::new(), 1);
    }

    /// Record typed text and schedule a debounced commit of it
    ///
    /// Repeating the current text does nothing. Blank text cancels any
    /// pending commit without searching.
    pub fn on_query_changed(&mut self, text: &str) {
        if text == self.text {
            return;
        }
        self.text = text.to_string();
        // Landing is over once the user has typed anything.
        self.landed = true;

        if text.trim().is_empty() {
            if self.debouncer.cancel() {
                debug!("Query cleared, pending commit cancelled");
            }
            return;
        }

        let ctx = self.ctx.clone();
        let committed = text.to_string();
        self.debouncer.schedule(move || {
            debug!(query = %committed, "Committing debounced query");
            ctx.store.update(|store| store.set_query(&committed));
            ctx.spawn(committed, 1);
        });
    }

    /// Search another page of the current text right away
    pub fn on_page_changed(&mut self, page: u32) {
        if page == 0 {
            warn!("Ignoring request for page 0");
            return;
        }
        self.ctx.spawn(self.text.clone(), page);
    }

    /// Search and wait for the outcome
    ///
    /// The error is the user-facing message; the store has already been
    /// updated either way.
    pub async fn search(&self, query: &str, page: u32) -> Result<SearchOutcome, String> {
        self.ctx.run(query, page).await.map_err(|e| e.to_string())
    }

    /// Cancel the pending commit, if any. In-flight searches still finish.
    pub fn shutdown(&mut self) {
        if self.debouncer.cancel() {
            debug!("Pending commit cancelled on shutdown");
        }
    }
}
