//! Shared library for the anime-search workspace.
//!
//! This crate provides the ambient pieces used by the other crates:
//! - Configuration management
//! - Logging infrastructure

pub mod config;
pub mod logging;

// Re-export commonly used types
pub use config::Config;
pub use logging::LogConfig;
