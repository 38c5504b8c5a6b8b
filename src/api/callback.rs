use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{config::Settings, spotify::auth::exchange_code_pkce, types::PkceToken};

/// State shared between the authorization flow and the callback handler.
#[derive(Clone)]
pub struct CallbackState {
    pub settings: Settings,
    pub pkce: Arc<Mutex<Option<PkceToken>>>,
}

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<CallbackState>,
) -> Html<&'static str> {
    if let Some(error) = params.get("error") {
        log::warn!("Authorization was not granted: {}", error);
        return Html("<h4>Authorization was not granted.</h4>");
    }

    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let mut pkce = state.pkce.lock().await;
    // Take code verifier from state
    let Some(pkce_state) = pkce.as_mut() else {
        return Html("<h4>Missing PKCE code verifier.</h4>");
    };

    let verifier = pkce_state.code_verifier.clone();

    match exchange_code_pkce(&state.settings, code, &verifier).await {
        Ok(token) => {
            pkce_state.token = Some(token);
            Html("<h2>Authorization successful.</h2><p>You can close this window.</p>")
        }
        Err(e) => {
            log::error!("Token exchange failed: {}", e);
            Html("<h4>Login failed.</h4>")
        }
    }
}
