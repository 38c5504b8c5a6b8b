use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// OAuth token as stored on disk, one file per account label.
///
/// `obtained_at` is a Unix timestamp in seconds; together with `expires_in`
/// it decides when the token is refreshed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub display_name: Option<String>,
}

impl CurrentUser {
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

/// A followed artist as stored in the account cache: `[id, name]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef(pub String, pub String);

impl ArtistRef {
    pub fn id(&self) -> &str {
        &self.0
    }

    pub fn name(&self) -> &str {
        &self.1
    }
}

impl From<Artist> for ArtistRef {
    fn from(artist: Artist) -> Self {
        ArtistRef(artist.id, artist.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowedArtistsResponse {
    pub artists: CursorPage<Artist>,
}

/// A page of a cursor-paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
    pub cursors: Option<Cursors>,
    pub total: Option<u64>,
}

impl<T> CursorPage<T> {
    /// Cursor for the following page, `None` when this was the last one.
    pub fn after(&self) -> Option<&str> {
        self.cursors
            .as_ref()
            .and_then(|c| c.after.as_deref())
            .filter(|after| !after.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cursors {
    pub after: Option<String>,
}

/// A page of an offset-paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub total: u32,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some() && !self.items.is_empty()
    }
}

/// Granularity of an album's `release_date`.
///
/// Absent precision is read as `day`; unrecognised values map to `Unknown`
/// and the album is skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseDatePrecision {
    #[default]
    Day,
    Month,
    Year,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub release_date: String,
    #[serde(default)]
    pub release_date_precision: ReleaseDatePrecision,
    #[serde(default)]
    pub album_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// ISO 8601 timestamp, e.g. `2024-05-01T06:00:00Z`.
    pub added_at: Option<String>,
    pub track: Option<PlaylistTrack>,
}

impl PlaylistItem {
    pub fn uri(&self) -> Option<&str> {
        self.track.as_ref().and_then(|t| t.uri.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrack {
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub snapshot_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTracksRequest {
    pub tracks: Vec<TrackUri>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackUri {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

/// Row of the `info` table.
#[derive(Tabled)]
pub struct AccountTableRow {
    pub user: String,
    pub name: String,
    pub artists: usize,
    pub playlist: String,
}
