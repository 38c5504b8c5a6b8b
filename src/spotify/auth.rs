use std::{path::PathBuf, sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use super::{SpotifyError, client::decode};
use crate::{
    Error, Result,
    api::CallbackState,
    config::{SCOPES, Settings},
    management::TokenManager,
    report::Reporter,
    server,
    types::{PkceToken, Token},
    utils,
};

const AUTH_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

impl TokenResponse {
    // Spotify may omit the refresh token on refresh; the old one stays valid then.
    fn into_token(self, previous_refresh_token: Option<&str>) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh_token.map(str::to_string))
                .unwrap_or_default(),
            scope: self.scope.unwrap_or_default(),
            expires_in: self.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Returns the token manager for `label`, authorizing interactively when no
/// token has been stored for it yet.
pub async fn token_for_account(
    settings: &Settings,
    label: &str,
    reporter: &dyn Reporter,
) -> Result<TokenManager> {
    let path = TokenManager::token_path(&settings.token_dir, label);
    match TokenManager::load(&path).await {
        Ok(manager) => Ok(manager),
        Err(e) => {
            log::debug!("No usable token at {}: {}", path.display(), e);
            authorize(settings, label, path, reporter).await
        }
    }
}

/// Runs the authorization-code flow with PKCE for one account.
///
/// Starts the local callback server on the redirect URI's address, opens the
/// authorization page in the browser (or prints it) and waits for the
/// callback to deliver a token. The token is persisted to `path`.
pub async fn authorize(
    settings: &Settings,
    label: &str,
    path: PathBuf,
    reporter: &dyn Reporter,
) -> Result<TokenManager> {
    // generate PKCE verifier and challenge
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let pkce = Arc::new(Mutex::new(Some(PkceToken {
        code_verifier,
        token: None,
    })));

    let listener = server::bind(settings).await?;
    let state = CallbackState {
        settings: settings.clone(),
        pkce: Arc::clone(&pkce),
    };
    let callback_path = settings.callback_path();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::serve(listener, &callback_path, state).await {
            log::error!("Callback server stopped: {}", e);
        }
    });

    let auth_url = authorize_url(settings, &code_challenge)?;

    reporter.info(&format!("Please log in for account {label}."));
    reporter.info(
        "If you are authorizing multiple accounts, make sure the browser is logged in to the correct Spotify account. Use a private window if necessary.",
    );
    if webbrowser::open(&auth_url).is_err() {
        reporter.warning(&format!(
            "Failed to open browser. Please navigate to the following URL manually:\n{auth_url}"
        ));
    }

    let token = wait_for_token(pkce, AUTH_TIMEOUT).await;
    server_handle.abort();

    let Some(token) = token else {
        return Err(Error::Auth(format!(
            "Authorization for account {label} failed or timed out."
        )));
    };

    let manager = TokenManager::new(token, path);
    manager.persist().await?;
    reporter.success(&format!("Authorization for account {label} successful."));
    Ok(manager)
}

pub fn authorize_url(settings: &Settings, code_challenge: &str) -> Result<String> {
    let mut url = url::Url::parse(&settings.auth_url)
        .map_err(|e| Error::Config(format!("Invalid auth URL {}: {e}", settings.auth_url)))?;
    url.query_pairs_mut()
        .append_pair("client_id", &settings.client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", &settings.redirect_uri)
        .append_pair("code_challenge", code_challenge)
        .append_pair("code_challenge_method", "S256")
        .append_pair("scope", SCOPES)
        .append_pair("show_dialog", "true");
    Ok(url.into())
}

async fn wait_for_token(
    shared_state: Arc<Mutex<Option<PkceToken>>>,
    max_wait: Duration,
) -> Option<Token> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(pkce_token) = lock.as_ref() {
            if let Some(token) = &pkce_token.token {
                return Some(token.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

pub async fn refresh_token(
    http: &Client,
    settings: &Settings,
    refresh_token: &str,
) -> std::result::Result<Token, SpotifyError> {
    let response = http
        .post(&settings.token_url)
        .basic_auth(&settings.client_id, Some(&settings.client_secret))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await?;

    match decode::<TokenResponse>(response).await {
        Ok(json) => Ok(json.into_token(Some(refresh_token))),
        Err(SpotifyError::Api { status: 400 | 401, message }) => {
            Err(SpotifyError::Unauthorized(message))
        }
        Err(e) => Err(e),
    }
}

pub async fn exchange_code_pkce(
    settings: &Settings,
    code: &str,
    verifier: &str,
) -> std::result::Result<Token, SpotifyError> {
    let client = Client::new();
    let response = client
        .post(&settings.token_url)
        .basic_auth(&settings.client_id, Some(&settings.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", settings.redirect_uri.as_str()),
        ])
        .send()
        .await?;

    let json = decode::<TokenResponse>(response).await?;
    Ok(json.into_token(None))
}
