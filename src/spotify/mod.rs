//! # Spotify Integration Module
//!
//! This module is the integration layer between the curator and the Spotify
//! Web API. It exposes the operations a curation run needs through the
//! [`SpotifyApi`] trait and implements them over HTTP in [`SpotifyClient`].
//!
//! ## Architecture
//!
//! ```text
//! Curation pipeline (artists, playlist, prune, releases)
//!          ↓
//! SpotifyApi trait  ←  in-memory fakes in tests
//!          ↓
//! SpotifyClient (reqwest, token refresh, retry/backoff)
//!          ↓
//! Spotify Web API
//! ```
//!
//! The trait works page by page: callers drive cursor or offset pagination
//! themselves, which keeps the client thin and lets the pagination rules be
//! tested without a network.
//!
//! ## Error Handling
//!
//! - **Rate limiting**: 429 responses become [`SpotifyError::RateLimited`]
//!   carrying the `Retry-After` value.
//! - **Transient failures**: 5xx responses and connection problems are
//!   retried with exponential backoff on read requests (see [`retry`]).
//! - **Mutations**: only retried on rate limits.
//!
//! ## API Coverage
//!
//! - `GET /me`
//! - `GET /me/following`
//! - `GET /playlists/{id}` and `GET /playlists/{id}/tracks`
//! - `POST /users/{user_id}/playlists`
//! - `POST` / `DELETE /playlists/{id}/tracks`
//! - `GET /artists/{id}/albums`
//! - `GET /albums/{id}/tracks`
//! - `POST /api/token` for code exchange and refresh

pub mod auth;
mod client;
pub mod retry;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{
    Album, Artist, CreatePlaylistRequest, CurrentUser, CursorPage, Page, Playlist, PlaylistItem,
    SnapshotResponse, Track,
};

pub use client::SpotifyClient;
pub use retry::RetryPolicy;

/// Most items a single add or remove request may carry.
pub const MAX_ITEMS_PER_MUTATION: usize = 100;

#[derive(Error, Debug)]
pub enum SpotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    #[error("Spotify API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The stored token was rejected or could not be refreshed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl SpotifyError {
    /// Errors worth retrying on a read request.
    pub fn is_transient(&self) -> bool {
        match self {
            SpotifyError::RateLimited { .. } => true,
            SpotifyError::Api { status, .. } => matches!(status, 500 | 502 | 503 | 504),
            SpotifyError::Http(e) => e.is_timeout() || e.is_connect(),
            SpotifyError::Unauthorized(_) => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SpotifyError::Api { status: 404, .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            SpotifyError::Unauthorized(_) | SpotifyError::Api { status: 401, .. }
        )
    }
}

/// Spotify Web API operations used by a curation run.
///
/// Listing operations return a single page; limits must respect the
/// service maxima (50 for artists, albums and album tracks, 100 for playlist
/// items). Add and remove requests accept at most
/// [`MAX_ITEMS_PER_MUTATION`] URIs.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    async fn current_user(&self) -> Result<CurrentUser, SpotifyError>;

    async fn followed_artists(
        &self,
        limit: u32,
        after: Option<&str>,
    ) -> Result<CursorPage<Artist>, SpotifyError>;

    async fn playlist(&self, playlist_id: &str) -> Result<Playlist, SpotifyError>;

    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<Playlist, SpotifyError>;

    async fn playlist_items(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<PlaylistItem>, SpotifyError>;

    async fn add_items(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<SnapshotResponse, SpotifyError>;

    /// Removes every occurrence of each URI from the playlist.
    async fn remove_all_occurrences(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<SnapshotResponse, SpotifyError>;

    async fn artist_albums(
        &self,
        artist_id: &str,
        include_groups: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Album>, SpotifyError>;

    async fn album_tracks(
        &self,
        album_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Track>, SpotifyError>;
}
