use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    report::Reporter,
    types::{AccountTableRow, ArtistRef},
    utils,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CachedUser {
    pub user_id: String,
    pub display_name: String,
    #[serde(default)]
    pub followed_artists: Vec<ArtistRef>,
}

/// Per-account record kept between runs.
///
/// ```json
/// { "user": { "user_id": "...", "display_name": "...", "followed_artists": [["id", "name"]] },
///   "playlist_id": "..." }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub user: CachedUser,
    pub playlist_id: Option<String>,
}

pub struct AccountCache {
    path: PathBuf,
    record: AccountRecord,
}

impl AccountCache {
    /// Cache file of `user_id` inside `dir`.
    pub fn path_for(dir: &Path, user_id: &str) -> PathBuf {
        dir.join(format!("user-{}.json", utils::sanitize_label(user_id)))
    }

    /// Loads the record of `user_id`.
    ///
    /// A missing file yields an empty record; so does an unreadable or
    /// malformed one, after a warning. The identity fields are always set
    /// from the arguments.
    pub async fn load(
        dir: &Path,
        user_id: &str,
        display_name: &str,
        reporter: &dyn Reporter,
    ) -> Self {
        let path = Self::path_for(dir, user_id);
        let mut record = match async_fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str::<AccountRecord>(&content) {
                Ok(record) => record,
                Err(e) => {
                    reporter.warning(&format!(
                        "Ignoring malformed cache file {}: {}",
                        path.display(),
                        e
                    ));
                    AccountRecord::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => AccountRecord::default(),
            Err(e) => {
                reporter.warning(&format!(
                    "Cannot read cache file {}: {}",
                    path.display(),
                    e
                ));
                AccountRecord::default()
            }
        };

        record.user.user_id = user_id.to_string();
        record.user.display_name = display_name.to_string();
        Self { path, record }
    }

    /// Overwrites the cache file with the current record.
    pub async fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.record)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Reads every cached record in `dir`, skipping files that do not parse.
    pub async fn load_all(dir: &Path) -> Result<Vec<AccountRecord>> {
        let mut records = Vec::new();
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(records),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if !(name.starts_with("user-") && name.ends_with(".json")) {
                continue;
            }
            let content = async_fs::read_to_string(entry.path()).await?;
            match serde_json::from_str::<AccountRecord>(&content) {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("Skipping malformed cache file {}: {}", name, e),
            }
        }

        records.sort_by(|a, b| a.user.user_id.cmp(&b.user.user_id));
        Ok(records)
    }

    pub fn record(&self) -> &AccountRecord {
        &self.record
    }

    pub fn playlist_id(&self) -> Option<&str> {
        self.record.playlist_id.as_deref()
    }

    pub fn set_playlist_id(&mut self, playlist_id: String) -> &mut Self {
        self.record.playlist_id = Some(playlist_id);
        self
    }

    pub fn set_followed_artists(&mut self, artists: Vec<ArtistRef>) -> &mut Self {
        self.record.user.followed_artists = artists;
        self
    }

    pub fn followed_artists(&self) -> &[ArtistRef] {
        &self.record.user.followed_artists
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl From<&AccountRecord> for AccountTableRow {
    fn from(record: &AccountRecord) -> Self {
        AccountTableRow {
            user: record.user.user_id.clone(),
            name: record.user.display_name.clone(),
            artists: record.user.followed_artists.len(),
            playlist: record.playlist_id.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}
