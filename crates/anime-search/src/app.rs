//! Terminal front end.
//!
//! Each input line is either a command (`:page 2`, `:open 20`, a route path
//! such as `/anime/20`) or the new contents of the search box. The app owns
//! the navigator and the detail view; search state lives in the store.
//!
//! Opening a title is two-phase: `handle_line` switches to the loading screen
//! and `settle` fetches the title for the current route.

use crate::controller::{SearchController, SearchEvent};
use crate::detail::{load_detail, DetailView};
use crate::router::{Navigator, Route};
use crate::view::{render_detail, render_search};
use catalog::CatalogApi;
use std::sync::Arc;
use tracing::debug;

pub const HELP: &str = "\
Type to search. Commands:
  :page <n>   go to page n        :next / :prev   step through pages
  :open <id>  show a title        /anime/<id>     same, as a route
  :more       toggle synopsis     :back           return to the list
  :help       this text           :quit           exit";

/// A parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Query(String),
    Page(u32),
    NextPage,
    PrevPage,
    Go(Route),
    Back,
    ToggleSynopsis,
    Help,
    Quit,
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();

        if trimmed.starts_with('/') {
            return match trimmed.parse() {
                Ok(route) => Command::Go(route),
                Err(e) => Command::Invalid(e.to_string()),
            };
        }

        let Some(command) = trimmed.strip_prefix(':') else {
            return Command::Query(line.trim_end_matches(['\r', '\n']).to_string());
        };

        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("page"), Some(n)) => match n.parse() {
                Ok(page) if page > 0 => Command::Page(page),
                _ => Command::Invalid(format!("not a page number: {}", n)),
            },
            (Some("next"), None) => Command::NextPage,
            (Some("prev"), None) => Command::PrevPage,
            (Some("open"), Some(id)) => match id.parse() {
                Ok(id) => Command::Go(Route::Detail { id }),
                Err(_) => Command::Invalid(format!("invalid anime id: {}", id)),
            },
            (Some("back"), None) => Command::Back,
            (Some("more"), None) => Command::ToggleSynopsis,
            (Some("help"), None) => Command::Help,
            (Some("quit") | Some("q"), None) => Command::Quit,
            _ => Command::Invalid(format!("unknown command: {}", trimmed)),
        }
    }
}

/// What the caller should do after handling a line
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Continue(Option<String>),
    Quit,
}

pub struct App<C: CatalogApi> {
    catalog: Arc<C>,
    controller: SearchController<C>,
    navigator: Navigator,
    /// Detail view and the id it belongs to
    detail: Option<(u32, DetailView)>,
    synopsis_expanded: bool,
    page_size: u32,
}

impl<C: CatalogApi> App<C> {
    pub fn new(catalog: Arc<C>, controller: SearchController<C>, page_size: u32) -> Self {
        Self {
            catalog,
            controller,
            navigator: Navigator::new(),
            detail: None,
            synopsis_expanded: false,
            page_size,
        }
    }

    pub fn route(&self) -> Route {
        self.navigator.current()
    }

    pub fn controller_mut(&mut self) -> &mut SearchController<C> {
        &mut self.controller
    }

    /// Current screen as text
    pub fn render(&self) -> String {
        match self.navigator.current() {
            Route::Search => render_search(
                &self.controller.store().snapshot(),
                self.controller.text(),
                self.page_size,
            ),
            Route::Detail { id } => match &self.detail {
                Some((loaded, view)) if *loaded == id => {
                    render_detail(view, self.synopsis_expanded)
                }
                _ => render_detail(&DetailView::Loading, false),
            },
        }
    }

    /// Mark the detail view as loading when the current route shows a
    /// different title than the one held.
    fn sync_detail(&mut self) {
        if let Route::Detail { id } = self.navigator.current() {
            if !matches!(self.detail, Some((loaded, _)) if loaded == id) {
                self.synopsis_expanded = false;
                self.detail = Some((id, DetailView::Loading));
            }
        }
    }

    /// Fetch the title for the current route if its view is still loading
    pub async fn settle(&mut self) -> Option<String> {
        let id = match (self.navigator.current(), &self.detail) {
            (Route::Detail { id }, Some((loaded, DetailView::Loading))) if *loaded == id => id,
            _ => return None,
        };

        let view = load_detail(self.catalog.as_ref(), id).await;
        self.detail = Some((id, view));
        Some(self.render())
    }

    fn current_page(&self) -> u32 {
        self.controller
            .store()
            .snapshot()
            .pagination
            .map_or(1, |p| p.current_page)
    }

    pub async fn handle_line(&mut self, line: &str) -> Flow {
        let command = Command::parse(line);
        debug!(command = ?command, "Handling input");

        let output = match command {
            Command::Query(text) => {
                if self.route() != Route::Search {
                    self.navigator.navigate(Route::Search);
                }
                self.controller.on_query_changed(&text);
                Some(format!("Search anime: {}", text))
            }
            Command::Page(page) => {
                self.controller.on_page_changed(page);
                None
            }
            Command::NextPage => {
                let state = self.controller.store().snapshot();
                match state.pagination.and_then(|p| p.next_page()) {
                    Some(page) => {
                        self.controller.on_page_changed(page);
                        None
                    }
                    None => Some("Already on the last page.".to_string()),
                }
            }
            Command::PrevPage => match self.current_page() {
                page if page > 1 => {
                    self.controller.on_page_changed(page - 1);
                    None
                }
                _ => Some("Already on the first page.".to_string()),
            },
            Command::Go(route) => {
                self.navigator.navigate(route);
                self.sync_detail();
                Some(self.render())
            }
            Command::Back => {
                self.navigator.back();
                self.sync_detail();
                Some(self.render())
            }
            Command::ToggleSynopsis => {
                self.synopsis_expanded = !self.synopsis_expanded;
                Some(self.render())
            }
            Command::Help => Some(HELP.to_string()),
            Command::Quit => {
                self.controller.shutdown();
                return Flow::Quit;
            }
            Command::Invalid(message) => Some(message),
        };

        Flow::Continue(output)
    }

    /// Output for a search event, if the list view is showing
    pub fn handle_event(&self, event: &SearchEvent) -> Option<String> {
        if self.route() != Route::Search {
            return None;
        }
        match event {
            SearchEvent::Loading { .. } | SearchEvent::Updated { .. } => Some(self.render()),
            SearchEvent::Superseded { .. } => None,
            SearchEvent::Failed { message, .. } => {
                Some(format!("{}Error: {}\n", self.render(), message))
            }
        }
    }
}
