#![allow(dead_code)]

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use fanfeed::{
    spotify::{MAX_ITEMS_PER_MUTATION, SpotifyApi, SpotifyError},
    types::{
        Album, Artist, CreatePlaylistRequest, CurrentUser, CursorPage, Cursors, Page, Playlist,
        PlaylistItem, PlaylistTrack, ReleaseDatePrecision, SnapshotResponse, Track,
    },
};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> String {
    (now() - Duration::days(days)).format("%Y-%m-%d").to_string()
}

pub fn artist(id: &str, name: &str) -> Artist {
    Artist {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn album(id: &str, release_date: &str, precision: ReleaseDatePrecision) -> Album {
    Album {
        id: id.to_string(),
        name: format!("Album {id}"),
        release_date: release_date.to_string(),
        release_date_precision: precision,
        album_type: Some("album".to_string()),
    }
}

pub fn track(uri: &str) -> Track {
    Track {
        id: Some(uri.rsplit(':').next().unwrap_or(uri).to_string()),
        name: uri.to_string(),
        uri: uri.to_string(),
    }
}

pub fn item(uri: &str, added_at: DateTime<Utc>) -> PlaylistItem {
    PlaylistItem {
        added_at: Some(added_at.to_rfc3339()),
        track: Some(PlaylistTrack {
            uri: Some(uri.to_string()),
        }),
    }
}

/// Requests seen by the fake, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CurrentUser,
    FollowedArtists { after: Option<String> },
    GetPlaylist(String),
    CreatePlaylist { user_id: String, name: String, public: bool },
    PlaylistItems { playlist_id: String, offset: u32 },
    Add { playlist_id: String, uris: Vec<String> },
    Remove { playlist_id: String, uris: Vec<String> },
    ArtistAlbums { artist_id: String, offset: u32 },
    AlbumTracks { album_id: String, offset: u32 },
}

#[derive(Default)]
struct State {
    user_id: String,
    display_name: String,
    artists: Vec<Artist>,
    playlists: HashMap<String, Vec<PlaylistItem>>,
    albums: HashMap<String, Vec<Album>>,
    tracks: HashMap<String, Vec<Track>>,
    created: u32,
    calls: Vec<Call>,
}

/// In-memory stand-in for the Spotify Web API.
pub struct FakeSpotify {
    state: Mutex<State>,
    now: DateTime<Utc>,
}

impl FakeSpotify {
    pub fn new(user_id: &str) -> Self {
        Self {
            state: Mutex::new(State {
                user_id: user_id.to_string(),
                display_name: format!("{user_id} display"),
                ..State::default()
            }),
            now: now(),
        }
    }

    pub fn with_artists(self, artists: Vec<Artist>) -> Self {
        self.state.lock().unwrap().artists = artists;
        self
    }

    pub fn with_playlist(self, id: &str, items: Vec<PlaylistItem>) -> Self {
        self.state
            .lock()
            .unwrap()
            .playlists
            .insert(id.to_string(), items);
        self
    }

    pub fn with_albums(self, artist_id: &str, albums: Vec<Album>) -> Self {
        self.state
            .lock()
            .unwrap()
            .albums
            .insert(artist_id.to_string(), albums);
        self
    }

    pub fn with_tracks(self, album_id: &str, tracks: Vec<Track>) -> Self {
        self.state
            .lock()
            .unwrap()
            .tracks
            .insert(album_id.to_string(), tracks);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn playlist_uris(&self, id: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .playlists
            .get(id)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|i| i.uri().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn playlist_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .state
            .lock()
            .unwrap()
            .playlists
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| matches(c)).count()
    }

    pub fn position(&self, matches: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls().iter().position(|c| matches(c))
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

fn not_found() -> SpotifyError {
    SpotifyError::Api {
        status: 404,
        message: "Resource not found".to_string(),
    }
}

fn page_of<T: Clone>(all: &[T], limit: u32, offset: u32) -> Page<T> {
    let start = (offset as usize).min(all.len());
    let end = (start + limit as usize).min(all.len());
    Page {
        items: all[start..end].to_vec(),
        next: (end < all.len()).then(|| format!("offset={end}")),
        offset,
        total: all.len() as u32,
    }
}

#[async_trait]
impl SpotifyApi for FakeSpotify {
    async fn current_user(&self) -> Result<CurrentUser, SpotifyError> {
        self.record(Call::CurrentUser);
        let state = self.state.lock().unwrap();
        Ok(CurrentUser {
            id: state.user_id.clone(),
            display_name: Some(state.display_name.clone()),
        })
    }

    async fn followed_artists(
        &self,
        limit: u32,
        after: Option<&str>,
    ) -> Result<CursorPage<Artist>, SpotifyError> {
        assert!(limit <= 50, "followed artists limit above service maximum");
        self.record(Call::FollowedArtists {
            after: after.map(str::to_string),
        });

        let state = self.state.lock().unwrap();
        let start = match after {
            Some(cursor) => state
                .artists
                .iter()
                .position(|a| a.id == cursor)
                .map(|i| i + 1)
                .unwrap_or(state.artists.len()),
            None => 0,
        };
        let end = (start + limit as usize).min(state.artists.len());
        let items = state.artists[start..end].to_vec();
        let cursor = (end < state.artists.len()).then(|| state.artists[end - 1].id.clone());

        Ok(CursorPage {
            next: cursor.as_ref().map(|c| format!("after={c}")),
            cursors: Some(Cursors { after: cursor }),
            total: Some(state.artists.len() as u64),
            items,
        })
    }

    async fn playlist(&self, playlist_id: &str) -> Result<Playlist, SpotifyError> {
        self.record(Call::GetPlaylist(playlist_id.to_string()));
        let state = self.state.lock().unwrap();
        if !state.playlists.contains_key(playlist_id) {
            return Err(not_found());
        }
        Ok(Playlist {
            id: playlist_id.to_string(),
            name: "renamed by user".to_string(),
            description: None,
            public: Some(false),
            snapshot_id: None,
        })
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<Playlist, SpotifyError> {
        self.record(Call::CreatePlaylist {
            user_id: user_id.to_string(),
            name: request.name.clone(),
            public: request.public,
        });
        let mut state = self.state.lock().unwrap();
        state.created += 1;
        let id = format!("created-{}", state.created);
        state.playlists.insert(id.clone(), Vec::new());
        Ok(Playlist {
            id,
            name: request.name.clone(),
            description: Some(request.description.clone()),
            public: Some(request.public),
            snapshot_id: Some("snap".to_string()),
        })
    }

    async fn playlist_items(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<PlaylistItem>, SpotifyError> {
        assert!(limit <= 100, "playlist items limit above service maximum");
        self.record(Call::PlaylistItems {
            playlist_id: playlist_id.to_string(),
            offset,
        });
        let state = self.state.lock().unwrap();
        let items = state.playlists.get(playlist_id).ok_or_else(not_found)?;
        Ok(page_of(items, limit, offset))
    }

    async fn add_items(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<SnapshotResponse, SpotifyError> {
        self.record(Call::Add {
            playlist_id: playlist_id.to_string(),
            uris: uris.to_vec(),
        });
        if uris.len() > MAX_ITEMS_PER_MUTATION {
            return Err(SpotifyError::Api {
                status: 400,
                message: "Too many ids requested".to_string(),
            });
        }
        let mut state = self.state.lock().unwrap();
        let now = self.now;
        let items = state.playlists.get_mut(playlist_id).ok_or_else(not_found)?;
        items.extend(uris.iter().map(|uri| item(uri, now)));
        Ok(SnapshotResponse {
            snapshot_id: "snap".to_string(),
        })
    }

    async fn remove_all_occurrences(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<SnapshotResponse, SpotifyError> {
        self.record(Call::Remove {
            playlist_id: playlist_id.to_string(),
            uris: uris.to_vec(),
        });
        if uris.len() > MAX_ITEMS_PER_MUTATION {
            return Err(SpotifyError::Api {
                status: 400,
                message: "Too many ids requested".to_string(),
            });
        }
        let mut state = self.state.lock().unwrap();
        let items = state.playlists.get_mut(playlist_id).ok_or_else(not_found)?;
        items.retain(|i| !i.uri().is_some_and(|uri| uris.iter().any(|u| u == uri)));
        Ok(SnapshotResponse {
            snapshot_id: "snap".to_string(),
        })
    }

    async fn artist_albums(
        &self,
        artist_id: &str,
        include_groups: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Album>, SpotifyError> {
        assert_eq!(include_groups, "album,single");
        assert!(limit <= 50, "artist albums limit above service maximum");
        self.record(Call::ArtistAlbums {
            artist_id: artist_id.to_string(),
            offset,
        });
        let state = self.state.lock().unwrap();
        let albums = state.albums.get(artist_id).cloned().unwrap_or_default();
        Ok(page_of(&albums, limit, offset))
    }

    async fn album_tracks(
        &self,
        album_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Track>, SpotifyError> {
        assert!(limit <= 50, "album tracks limit above service maximum");
        self.record(Call::AlbumTracks {
            album_id: album_id.to_string(),
            offset,
        });
        let state = self.state.lock().unwrap();
        let tracks = state.tracks.get(album_id).ok_or_else(not_found)?;
        Ok(page_of(tracks, limit, offset))
    }
}
