use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;

use super::{
    SpotifyApi, SpotifyError,
    retry::{RetryOn, RetryPolicy, retry_with_backoff},
};
use crate::{
    config::Settings,
    management::TokenManager,
    types::{
        AddTracksRequest, Album, Artist, CreatePlaylistRequest, CurrentUser, CursorPage,
        FollowedArtistsResponse, Page, Playlist, PlaylistItem, RemoveTracksRequest,
        SnapshotResponse, Track, TrackUri,
    },
};

/// Spotify Web API client bound to one authorized account.
pub struct SpotifyClient {
    http: Client,
    settings: Settings,
    tokens: Mutex<TokenManager>,
    retry: RetryPolicy,
}

impl SpotifyClient {
    pub fn new(settings: Settings, tokens: TokenManager) -> Self {
        Self {
            http: Client::new(),
            settings,
            tokens: Mutex::new(tokens),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.api_url.trim_end_matches('/'), path)
    }

    async fn access_token(&self) -> Result<String, SpotifyError> {
        let mut tokens = self.tokens.lock().await;
        tokens.get_valid_token(&self.http, &self.settings).await
    }

    async fn get<T>(
        &self,
        operation: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SpotifyError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        retry_with_backoff(&self.retry, RetryOn::Transient, operation, move || {
            let url = url.clone();
            async move {
                let token = self.access_token().await?;
                log::debug!("GET {url}");
                let response = self
                    .http
                    .get(&url)
                    .query(query)
                    .bearer_auth(token)
                    .send()
                    .await?;
                decode(response).await
            }
        })
        .await
    }

    async fn send<B, T>(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, SpotifyError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        retry_with_backoff(&self.retry, RetryOn::RateLimit, operation, move || {
            let url = url.clone();
            let method = method.clone();
            async move {
                let token = self.access_token().await?;
                log::debug!("{method} {url}");
                let response = self
                    .http
                    .request(method, &url)
                    .json(body)
                    .bearer_auth(token)
                    .send()
                    .await?;
                decode(response).await
            }
        })
        .await
    }
}

/// Maps an HTTP response onto the expected payload or a [`SpotifyError`].
pub(crate) async fn decode<T>(response: Response) -> Result<T, SpotifyError>
where
    T: DeserializeOwned,
{
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(SpotifyError::RateLimited { retry_after });
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SpotifyError::Api {
            status: status.as_u16(),
            message: error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string()),
        });
    }

    Ok(response.json::<T>().await?)
}

// Spotify wraps errors as {"error": {"status": 404, "message": "..."}}; the
// token endpoint uses {"error": "...", "error_description": "..."} instead.
fn error_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = json.get("error")?;
    error
        .get("message")
        .and_then(|m| m.as_str())
        .or_else(|| json.get("error_description").and_then(|m| m.as_str()))
        .or_else(|| error.as_str())
        .map(str::to_string)
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    async fn current_user(&self) -> Result<CurrentUser, SpotifyError> {
        self.get("current user", "/me", &[]).await
    }

    async fn followed_artists(
        &self,
        limit: u32,
        after: Option<&str>,
    ) -> Result<CursorPage<Artist>, SpotifyError> {
        let mut query = vec![("type", "artist".to_string()), ("limit", limit.to_string())];
        if let Some(after) = after {
            query.push(("after", after.to_string()));
        }

        let response: FollowedArtistsResponse =
            self.get("followed artists", "/me/following", &query).await?;
        Ok(response.artists)
    }

    async fn playlist(&self, playlist_id: &str) -> Result<Playlist, SpotifyError> {
        let query = [("fields", "id,name,description,public,snapshot_id".to_string())];
        self.get("playlist", &format!("/playlists/{playlist_id}"), &query)
            .await
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<Playlist, SpotifyError> {
        self.send(
            "create playlist",
            Method::POST,
            &format!("/users/{user_id}/playlists"),
            request,
        )
        .await
    }

    async fn playlist_items(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<PlaylistItem>, SpotifyError> {
        let query = [
            (
                "fields",
                "items(added_at,track(uri)),next,offset,total".to_string(),
            ),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        self.get(
            "playlist items",
            &format!("/playlists/{playlist_id}/tracks"),
            &query,
        )
        .await
    }

    async fn add_items(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<SnapshotResponse, SpotifyError> {
        let body = AddTracksRequest {
            uris: uris.to_vec(),
        };
        self.send(
            "add items",
            Method::POST,
            &format!("/playlists/{playlist_id}/tracks"),
            &body,
        )
        .await
    }

    async fn remove_all_occurrences(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<SnapshotResponse, SpotifyError> {
        let body = RemoveTracksRequest {
            tracks: uris.iter().map(|uri| TrackUri { uri: uri.clone() }).collect(),
        };
        self.send(
            "remove items",
            Method::DELETE,
            &format!("/playlists/{playlist_id}/tracks"),
            &body,
        )
        .await
    }

    async fn artist_albums(
        &self,
        artist_id: &str,
        include_groups: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Album>, SpotifyError> {
        let query = [
            ("include_groups", include_groups.to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        self.get(
            "artist albums",
            &format!("/artists/{artist_id}/albums"),
            &query,
        )
        .await
    }

    async fn album_tracks(
        &self,
        album_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Track>, SpotifyError> {
        let query = [("limit", limit.to_string()), ("offset", offset.to_string())];
        self.get("album tracks", &format!("/albums/{album_id}/tracks"), &query)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_web_api_error_message() {
        let body = r#"{"error":{"status":404,"message":"Resource not found"}}"#;
        assert_eq!(error_message(body).as_deref(), Some("Resource not found"));
    }

    #[test]
    fn extracts_token_endpoint_error_description() {
        let body = r#"{"error":"invalid_grant","error_description":"Refresh token revoked"}"#;
        assert_eq!(error_message(body).as_deref(), Some("Refresh token revoked"));
    }

    #[test]
    fn ignores_non_json_bodies() {
        assert_eq!(error_message("<html>bad gateway</html>"), None);
    }
}
