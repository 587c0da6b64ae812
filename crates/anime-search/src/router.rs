//! Routes and navigation history.
//!
//! Two routes exist: the list at `/` and a title at `/anime/:id`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Search,
    Detail { id: u32 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("no route matches path: {0}")]
    UnknownPath(String),
    #[error("invalid anime id: {0}")]
    InvalidId(String),
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.trim();
        let segments: Vec<&str> = trimmed
            .trim_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            [] if trimmed.starts_with('/') => Ok(Route::Search),
            ["anime", id] => id
                .parse()
                .map(|id| Route::Detail { id })
                .map_err(|_| RouteError::InvalidId(id.to_string())),
            _ => Err(RouteError::UnknownPath(trimmed.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Search => write!(f, "/"),
            Route::Detail { id } => write!(f, "/anime/{}", id),
        }
    }
}

/// Route history, starting at the list view
#[derive(Debug, Clone)]
pub struct Navigator {
    history: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            history: vec![Route::Search],
        }
    }

    pub fn current(&self) -> Route {
        self.history.last().copied().unwrap_or(Route::Search)
    }

    /// Go to `route`. Navigating to the current route does not grow history.
    pub fn navigate(&mut self, route: Route) {
        if self.current() != route {
            self.history.push(route);
        }
    }

    /// Step back one route. The first route is never popped.
    pub fn back(&mut self) -> Route {
        if self.history.len() > 1 {
            self.history.pop();
        }
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!("/".parse::<Route>(), Ok(Route::Search));
        assert_eq!("/anime/20".parse::<Route>(), Ok(Route::Detail { id: 20 }));
        assert_eq!("/anime/20/".parse::<Route>(), Ok(Route::Detail { id: 20 }));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "/anime/naruto".parse::<Route>(),
            Err(RouteError::InvalidId("naruto".to_string()))
        );
        assert!(matches!(
            "/manga/1".parse::<Route>(),
            Err(RouteError::UnknownPath(_))
        ));
        assert!(matches!("".parse::<Route>(), Err(RouteError::UnknownPath(_))));
    }

    #[test]
    fn test_display_round_trips_paths() {
        assert_eq!(Route::Search.to_string(), "/");
        assert_eq!(Route::Detail { id: 5114 }.to_string(), "/anime/5114");
    }

    #[test]
    fn test_navigator_back() {
        let mut nav = Navigator::new();
        assert_eq!(nav.current(), Route::Search);

        nav.navigate(Route::Detail { id: 1 });
        nav.navigate(Route::Detail { id: 1 });
        assert_eq!(nav.current(), Route::Detail { id: 1 });

        assert_eq!(nav.back(), Route::Search);
        assert_eq!(nav.back(), Route::Search);
    }
}
