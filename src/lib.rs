//! Fresh Release Playlist Curator Library
//!
//! This library keeps a private Spotify playlist stocked with recent releases
//! from the artists an account follows. A run enumerates the followed artists,
//! resolves the managed playlist, prunes tracks that have outlived the
//! retention threshold and appends tracks from fresh albums and singles.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `curation` - The playlist curation pipeline (enumerate, resolve, prune, sync)
//! - `error` - Crate error types
//! - `logging` - Persistent log file setup
//! - `management` - Token and account cache persistence
//! - `report` - Console and log reporting handle passed to every component
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use fanfeed::{config, curation::Curator, report::ConsoleReporter};
//!
//! #[tokio::main]
//! async fn main() -> fanfeed::Result<()> {
//!     config::load_env().await?;
//!     // Build a client, then hand it to a Curator...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod curation;
pub mod error;
pub mod logging;
pub mod management;
pub mod report;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
