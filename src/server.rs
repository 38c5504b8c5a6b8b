use axum::{Extension, Router, routing::get};
use tokio::net::TcpListener;

use crate::{
    Error, Result,
    api::{self, CallbackState},
    config::Settings,
};

/// Binds the callback listener on the redirect URI's address.
pub async fn bind(settings: &Settings) -> Result<TcpListener> {
    let addr = settings.callback_addr()?;
    TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Config(format!("Cannot listen on {addr} for the OAuth callback: {e}")))
}

pub async fn serve(listener: TcpListener, callback_path: &str, state: CallbackState) -> Result<()> {
    let app = Router::new()
        .route(callback_path, get(api::callback))
        .layer(Extension(state));

    axum::serve(listener, app).await?;
    Ok(())
}
