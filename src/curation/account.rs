use std::path::Path;

use chrono::{DateTime, Utc};

use super::{artists, playlist, prune, releases};
use crate::{Result, management::AccountCache, report::Reporter, spotify::SpotifyApi};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurationOptions {
    /// Days back from now within which a release counts as fresh.
    pub freshness_days: u32,
    /// Days after which a track is pruned from the playlist.
    pub retention_days: u32,
}

impl Default for CurationOptions {
    fn default() -> Self {
        Self {
            freshness_days: 7,
            retention_days: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub user_id: String,
    pub display_name: String,
    pub playlist_id: String,
    pub playlist_created: bool,
    pub artists: usize,
    pub removed: usize,
    pub added: usize,
    pub add_calls: usize,
}

/// Runs the curation phases for the account behind `api`.
pub struct Curator<'a> {
    api: &'a dyn SpotifyApi,
    reporter: &'a dyn Reporter,
    options: CurationOptions,
}

impl<'a> Curator<'a> {
    pub fn new(
        api: &'a dyn SpotifyApi,
        reporter: &'a dyn Reporter,
        options: CurationOptions,
    ) -> Self {
        Self {
            api,
            reporter,
            options,
        }
    }

    /// Enumerates, resolves, prunes and synchronizes, then writes the account
    /// cache in `cache_dir` back. The cache is only written when every phase
    /// succeeded.
    pub async fn run_account(&self, cache_dir: &Path, now: DateTime<Utc>) -> Result<RunSummary> {
        let user = self.api.current_user().await?;
        self.reporter
            .info(&format!("Logged in as {} ({})", user.name(), user.id));

        let mut cache = AccountCache::load(cache_dir, &user.id, user.name(), self.reporter).await;

        self.reporter.phase("Fetching followed artists...");
        let followed = artists::fetch_followed_artists(self.api).await?;
        self.reporter
            .info(&format!("Found {} followed artists", followed.len()));
        cache.set_followed_artists(followed);

        self.reporter.phase("Resolving playlist...");
        let resolved =
            playlist::resolve_playlist(self.api, self.reporter, &user.id, cache.playlist_id())
                .await?;
        cache.set_playlist_id(resolved.id.clone());

        self.reporter.phase("Removing old tracks...");
        let removed = prune::prune_playlist(
            self.api,
            self.reporter,
            &resolved.id,
            self.options.retention_days,
            now,
        )
        .await?;

        self.reporter.phase("Adding new releases...");
        let mut existing = playlist::existing_track_uris(self.api, &resolved.id).await?;
        let outcome = releases::synchronize(
            self.api,
            self.reporter,
            &resolved.id,
            cache.followed_artists(),
            &mut existing,
            self.options.freshness_days,
            now,
        )
        .await?;

        if outcome.added == 0 {
            self.reporter.info("No new tracks to add to the playlist");
        }

        cache.persist().await?;

        Ok(RunSummary {
            user_id: user.id.clone(),
            display_name: user.name().to_string(),
            playlist_id: resolved.id,
            playlist_created: resolved.created,
            artists: cache.followed_artists().len(),
            removed,
            added: outcome.added,
            add_calls: outcome.add_calls,
        })
    }
}
