//! # API Module
//!
//! HTTP endpoints of the local server that runs while an account is being
//! authorized.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives Spotify's authorization redirect and completes
//!   the PKCE flow by exchanging the code for a token. The route path is taken
//!   from the configured redirect URI.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use fanfeed::api::{CallbackState, callback};
//!
//! let app = Router::new()
//!     .route("/", get(callback))
//!     .layer(Extension(state));
//! ```

mod callback;

pub use callback::{CallbackState, callback};
