use crate::{
    Result,
    config::Settings,
    management::TokenManager,
    report::Reporter,
    spotify::{SpotifyApi, SpotifyClient, auth},
};

/// Authorizes `label` interactively, replacing any stored token, and checks
/// the new token against the API.
pub async fn auth(settings: &Settings, label: &str, reporter: &dyn Reporter) -> Result<()> {
    let path = TokenManager::token_path(&settings.token_dir, label);
    let tokens = auth::authorize(settings, label, path, reporter).await?;

    let client = SpotifyClient::new(settings.clone(), tokens);
    let user = client.current_user().await?;
    reporter.success(&format!(
        "Account {label} is linked to {} ({})",
        user.name(),
        user.id
    ));
    Ok(())
}
