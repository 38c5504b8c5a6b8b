use std::path::{Path, PathBuf};

use chrono::Utc;
use reqwest::Client;

use crate::{
    Result,
    config::Settings,
    spotify::{SpotifyError, auth::refresh_token},
    types::Token,
    utils,
};

/// Seconds before expiry at which a token is refreshed.
const EXPIRY_MARGIN: u64 = 240;

pub struct TokenManager {
    token: Token,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token, path: PathBuf) -> Self {
        TokenManager { token, path }
    }

    /// Location of the token file for an account label.
    pub fn token_path(dir: &Path, label: &str) -> PathBuf {
        dir.join(format!("{}.json", utils::sanitize_label(label)))
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = async_fs::read_to_string(path).await?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self {
            token,
            path: path.to_path_buf(),
        })
    }

    pub async fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Returns an access token, refreshing and persisting it first when it is
    /// about to expire.
    pub async fn get_valid_token(
        &mut self,
        http: &Client,
        settings: &Settings,
    ) -> std::result::Result<String, SpotifyError> {
        if self.is_expired() {
            if self.token.refresh_token.is_empty() {
                return Err(SpotifyError::Unauthorized(
                    "token expired and no refresh token is stored".to_string(),
                ));
            }

            self.token = refresh_token(http, settings, &self.token.refresh_token).await?;
            if let Err(e) = self.persist().await {
                log::warn!("Failed to save refreshed token to {}: {}", self.path.display(), e);
            }
        }

        Ok(self.token.access_token.clone())
    }

    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN >= self.token.obtained_at + self.token.expires_in
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
