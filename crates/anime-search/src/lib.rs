//! Debounced anime search over the Jikan catalog.
//!
//! The search controller turns typed text into catalog searches, the result
//! store holds what the list view shows, and the detail view loads a single
//! title. The terminal front end in `app` ties them together.

pub mod app;
pub mod controller;
pub mod debounce;
pub mod detail;
pub mod router;
pub mod state;
pub mod view;

pub use app::{App, Command, Flow};
pub use controller::{SearchController, SearchEvent, SearchOutcome};
pub use debounce::Debouncer;
pub use detail::{load_detail, DetailView};
pub use router::{Navigator, Route, RouteError};
pub use state::{FetchTicket, PageInfo, ResultItem, ResultStore, SearchState, SharedStore};
