use std::{future::Future, path::PathBuf};

use chrono::{DateTime, Local, Utc};

use crate::{
    Result,
    config::Settings,
    curation::{CurationOptions, Curator},
    report::Reporter,
    spotify::{SpotifyApi, SpotifyClient, auth},
};

/// Label used when no account is named on the command line.
pub const DEFAULT_ACCOUNT: &str = "default";

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub options: CurationOptions,
    /// Accounts to process; empty means the default account.
    pub user_ids: Vec<String>,
    /// Abort on the first failing account instead of moving on.
    pub fail_fast: bool,
    pub cache_dir: PathBuf,
}

impl RunRequest {
    /// Account labels to process, trimmed, in command-line order.
    pub fn labels(&self) -> Vec<String> {
        let labels: Vec<String> = self
            .user_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();

        if labels.is_empty() {
            vec![DEFAULT_ACCOUNT.to_string()]
        } else {
            labels
        }
    }

    /// `true` when no usable account label was given.
    pub fn uses_default(&self) -> bool {
        self.user_ids.iter().all(|id| id.trim().is_empty())
    }
}

/// Curates the playlist of every requested account.
///
/// Returns `true` when all accounts completed.
pub async fn run(settings: &Settings, request: RunRequest, reporter: &dyn Reporter) -> bool {
    run_accounts(&request, reporter, Utc::now, move |label| async move {
        let tokens = auth::token_for_account(settings, &label, reporter).await?;
        Ok::<_, crate::Error>(SpotifyClient::new(settings.clone(), tokens))
    })
    .await
}

/// Runs the curation for each label of `request` with the client `connect`
/// returns for it.
///
/// # Arguments
///
/// * `request` - Accounts, options and cache directory of the run
/// * `reporter` - Receives progress and failures
/// * `clock` - Supplies "now" once per account
/// * `connect` - Builds the API client of an account label; a failure here
///   counts as a failure of that account
///
/// # Returns
///
/// `true` when every account completed. A failing account is reported (as
/// critical when its credentials are unusable) and the next one is processed,
/// unless `fail_fast` is set, in which case the run stops right away.
pub async fn run_accounts<A, C, F, Fut>(
    request: &RunRequest,
    reporter: &dyn Reporter,
    clock: C,
    mut connect: F,
) -> bool
where
    A: SpotifyApi,
    C: Fn() -> DateTime<Utc>,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<A>>,
{
    reporter.info(&format!(
        "Starting run at {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    log::info!(
        "Called with --track-freshness: {} days, --old-track-threshold: {} days",
        request.options.freshness_days,
        request.options.retention_days
    );

    if request.uses_default() {
        reporter.info("No user ID provided, using the default account");
    }

    let mut all_ok = true;
    for label in request.labels() {
        let result = match connect(label.clone()).await {
            Ok(api) => {
                Curator::new(&api, reporter, request.options)
                    .run_account(&request.cache_dir, clock())
                    .await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(summary) => reporter.success(&format!(
                "Account {} done: {} removed, {} added to playlist {}",
                summary.user_id, summary.removed, summary.added, summary.playlist_id
            )),
            Err(e) => {
                all_ok = false;
                if e.is_auth() {
                    reporter.critical(&format!(
                        "Authentication failed for user ID {label}: {e}"
                    ));
                } else {
                    reporter.error(&format!("Run failed for user ID {label}: {e}"));
                }

                if request.fail_fast {
                    reporter.critical("Stopping because --fail-fast is set");
                    return false;
                }
            }
        }
    }

    reporter.info(&format!(
        "Run completed at {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    all_ok
}
