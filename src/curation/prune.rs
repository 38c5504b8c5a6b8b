use chrono::{DateTime, Utc};

use super::playlist::fetch_playlist_items;
use crate::{
    report::Reporter,
    spotify::{MAX_ITEMS_PER_MUTATION, SpotifyApi, SpotifyError},
    types::PlaylistItem,
    utils,
};

/// Removes tracks added more than `max_age_days` days before `now`.
///
/// Every occurrence of an expired URI is removed, duplicates included. The
/// removal is sent in chunks of at most [`MAX_ITEMS_PER_MUTATION`] URIs; when
/// nothing has expired no request is made.
///
/// # Arguments
///
/// * `api` - Client of the account owning the playlist
/// * `reporter` - Receives the summary line
/// * `playlist_id` - The managed playlist
/// * `max_age_days` - Retention threshold; an item exactly this old is kept
/// * `now` - Reference time for the item ages
///
/// # Returns
///
/// The number of distinct URIs removed, `0` when nothing had expired.
///
/// # Errors
///
/// Fails when the playlist cannot be listed or a removal request is rejected.
/// Chunks sent before the failure stay applied.
pub async fn prune_playlist(
    api: &dyn SpotifyApi,
    reporter: &dyn Reporter,
    playlist_id: &str,
    max_age_days: u32,
    now: DateTime<Utc>,
) -> Result<usize, SpotifyError> {
    let items = fetch_playlist_items(api, playlist_id).await?;
    let expired = expired_track_uris(&items, max_age_days, now);

    if expired.is_empty() {
        reporter.info("No old tracks to remove from the playlist");
        return Ok(0);
    }

    for chunk in expired.chunks(MAX_ITEMS_PER_MUTATION) {
        api.remove_all_occurrences(playlist_id, chunk).await?;
    }

    reporter.info(&format!(
        "Removed {} old tracks from the playlist",
        expired.len()
    ));
    Ok(expired.len())
}

/// URIs of the items whose age in whole days exceeds `max_age_days`.
///
/// An item added exactly `max_age_days` days ago is kept. Items without a
/// track, URI or parseable `added_at` are never selected.
pub fn expired_track_uris(
    items: &[PlaylistItem],
    max_age_days: u32,
    now: DateTime<Utc>,
) -> Vec<String> {
    let expired = items
        .iter()
        .filter_map(|item| {
            let uri = item.uri()?;
            let added_at = item.added_at.as_deref()?;
            let Some(added_at) = utils::parse_added_at(added_at) else {
                log::debug!("Ignoring {uri} with unparseable added_at {added_at}");
                return None;
            };
            (utils::age_in_days(added_at, now) > i64::from(max_age_days)).then(|| uri.to_string())
        })
        .collect();

    utils::dedup_preserving_order(expired)
}
