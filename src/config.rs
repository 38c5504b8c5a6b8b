//! Configuration management for the playlist curator.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and an optional `.env` file. It provides a single
//! place for the Spotify API credentials, endpoint URLs and the on-disk
//! locations used for tokens, account caches and the log file.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{Error, Result};

pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:1815";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Permissions requested during authorization.
pub const SCOPES: &str =
    "user-library-read user-follow-read playlist-modify-private playlist-read-private";

const APP_DIR: &str = "fanfeed";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the data directory if it doesn't exist and loads variables from
/// `fanfeed/.env` below the platform-specific local data directory. A
/// missing file is not an error; credentials may come from the process
/// environment alone.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/fanfeed/.env`
/// - macOS: `~/Library/Application Support/fanfeed/.env`
/// - Windows: `%LOCALAPPDATA%/fanfeed/.env`
///
/// # Errors
///
/// Returns an error if the directory cannot be created or if the `.env` file
/// exists but cannot be parsed.
pub async fn load_env() -> Result<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path)?;
    }
    Ok(())
}

/// Root directory for everything the curator stores locally.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

pub fn default_cache_dir() -> PathBuf {
    data_dir().join("cache")
}

pub fn default_token_dir() -> PathBuf {
    data_dir().join("tokens")
}

pub fn default_log_file() -> PathBuf {
    data_dir().join("fanfeed.log")
}

/// Spotify application settings resolved from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// `true` when `SPOTIFY_REDIRECT_URI` was not set and the default is used.
    pub redirect_uri_defaulted: bool,
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub token_dir: PathBuf,
}

impl Settings {
    /// Reads the settings from the process environment.
    ///
    /// `SPOTIFY_CLIENT_ID` and `SPOTIFY_CLIENT_SECRET` are required; every
    /// other value falls back to the public Spotify endpoints.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let (Some(client_id), Some(client_secret)) =
            (get("SPOTIFY_CLIENT_ID"), get("SPOTIFY_CLIENT_SECRET"))
        else {
            return Err(Error::Config(
                "SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET environment variables must be set with your Spotify app credentials.".to_string(),
            ));
        };

        let redirect = get("SPOTIFY_REDIRECT_URI");
        Ok(Self {
            client_id,
            client_secret,
            redirect_uri_defaulted: redirect.is_none(),
            redirect_uri: redirect.unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            api_url: get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            auth_url: get("SPOTIFY_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            token_dir: default_token_dir(),
        })
    }

    pub fn with_token_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.token_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Socket address the OAuth callback server must listen on, taken from the
    /// redirect URI (e.g. `127.0.0.1:1815`).
    pub fn callback_addr(&self) -> Result<String> {
        let url = url::Url::parse(&self.redirect_uri)
            .map_err(|e| Error::Config(format!("Invalid redirect URI {}: {e}", self.redirect_uri)))?;
        let host = url
            .host_str()
            .ok_or_else(|| Error::Config(format!("Redirect URI {} has no host", self.redirect_uri)))?;
        let port = url.port_or_known_default().unwrap_or(80);
        let host = if host == "localhost" { "127.0.0.1" } else { host };
        Ok(format!("{host}:{port}"))
    }

    /// Path the callback server routes the authorization redirect to.
    pub fn callback_path(&self) -> String {
        url::Url::parse(&self.redirect_uri)
            .map(|u| u.path().to_string())
            .unwrap_or_else(|_| "/".to_string())
    }
}
