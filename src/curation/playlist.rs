use std::collections::HashSet;

use super::paging::collect_offset_pages;
use crate::{
    report::Reporter,
    spotify::{SpotifyApi, SpotifyError},
    types::{CreatePlaylistRequest, PlaylistItem},
};

pub const PLAYLIST_NAME: &str = "fanfeed";
pub const PLAYLIST_DESCRIPTION: &str =
    "A playlist of new releases from followed artists. Maintained by fanfeed.";

/// Largest page the playlist items endpoint serves.
pub const PLAYLIST_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlaylist {
    pub id: String,
    /// `true` when the playlist was created during this call.
    pub created: bool,
}

/// Returns the id of the managed playlist, creating it when needed.
///
/// # Arguments
///
/// * `api` - Client of the account
/// * `reporter` - Receives the fallback warning and creation notice
/// * `user_id` - Owner of a newly created playlist
/// * `cached_id` - Playlist id remembered from the previous run, if any
///
/// A cached id that can still be fetched is returned unchanged, even if the
/// playlist's name or description drifted. Any failure to fetch it (deleted,
/// not found, forbidden) is reported as a warning and a new private playlist
/// is created instead; the old one is left alone. At most one playlist is
/// created per call.
pub async fn resolve_playlist(
    api: &dyn SpotifyApi,
    reporter: &dyn Reporter,
    user_id: &str,
    cached_id: Option<&str>,
) -> Result<ResolvedPlaylist, SpotifyError> {
    if let Some(playlist_id) = cached_id {
        match api.playlist(playlist_id).await {
            Ok(_) => {
                return Ok(ResolvedPlaylist {
                    id: playlist_id.to_string(),
                    created: false,
                });
            }
            Err(e) => reporter.warning(&format!(
                "Couldn't fetch cached playlist ID {playlist_id}: {e}, will create a new one..."
            )),
        }
    }

    let request = CreatePlaylistRequest {
        name: PLAYLIST_NAME.to_string(),
        description: PLAYLIST_DESCRIPTION.to_string(),
        public: false,
        collaborative: false,
    };
    let playlist = api.create_playlist(user_id, &request).await?;
    reporter.info(&format!(
        "Created playlist: {} ({})",
        playlist.name, playlist.id
    ));

    Ok(ResolvedPlaylist {
        id: playlist.id,
        created: true,
    })
}

/// Fetches all items of a playlist, following pagination to the end.
pub async fn fetch_playlist_items(
    api: &dyn SpotifyApi,
    playlist_id: &str,
) -> Result<Vec<PlaylistItem>, SpotifyError> {
    collect_offset_pages(|offset| api.playlist_items(playlist_id, PLAYLIST_PAGE_SIZE, offset)).await
}

/// Snapshot of the track URIs currently in the playlist.
pub async fn existing_track_uris(
    api: &dyn SpotifyApi,
    playlist_id: &str,
) -> Result<HashSet<String>, SpotifyError> {
    let items = fetch_playlist_items(api, playlist_id).await?;
    Ok(items
        .iter()
        .filter_map(|item| item.uri().map(str::to_string))
        .collect())
}
