use thiserror::Error;

use crate::spotify::SpotifyError;

/// Errors surfaced by a curation run.
///
/// Spotify API failures are wrapped so callers can still inspect the
/// underlying [`SpotifyError`], e.g. to tell an authentication problem from a
/// transient outage.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration (environment variables, paths).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A Spotify Web API request failed after retries were exhausted.
    #[error(transparent)]
    Spotify(#[from] SpotifyError),

    /// The account could not be authorized or its token could not be refreshed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` when the error means the account's credentials are unusable.
    pub fn is_auth(&self) -> bool {
        match self {
            Error::Auth(_) => true,
            Error::Spotify(e) => e.is_unauthorized(),
            _ => false,
        }
    }
}

impl From<dotenv::Error> for Error {
    fn from(err: dotenv::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
