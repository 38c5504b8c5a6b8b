use std::{future::Future, time::Duration};

use tokio::time::sleep;

use super::SpotifyError;

/// Bounded exponential backoff for Spotify requests.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first try
    pub max_retries: u32,
    /// Delay before the first retry, doubled on every following one
    pub base_delay: Duration,
    /// Upper bound for a single wait, including server-provided `Retry-After`
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 4,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Which failures a request may be retried on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOn {
    /// Reads: rate limits, 5xx responses and connection problems.
    Transient,
    /// Mutations: only rate limits, which reject the request before it applies.
    RateLimit,
}

impl RetryOn {
    fn allows(self, err: &SpotifyError) -> bool {
        match self {
            RetryOn::Transient => err.is_transient(),
            RetryOn::RateLimit => matches!(err, SpotifyError::RateLimited { .. }),
        }
    }
}

/// Runs `operation` until it succeeds, fails permanently or the policy gives up.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    retry_on: RetryOn,
    operation_name: &str,
    mut operation: F,
) -> Result<T, SpotifyError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SpotifyError>>,
{
    let mut retries = 0;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !retry_on.allows(&err) {
            return Err(err);
        }

        if retries >= policy.max_retries {
            log::warn!(
                "Max retries ({}) exceeded for {}: {}",
                policy.max_retries,
                operation_name,
                err
            );
            return Err(err);
        }

        let mut delay = policy.backoff(retries);
        if let SpotifyError::RateLimited { retry_after } = err {
            let requested = Duration::from_secs(retry_after);
            if requested > policy.max_delay {
                log::warn!(
                    "{} asked to wait {} seconds, which exceeds the retry limit; giving up",
                    operation_name,
                    retry_after
                );
                return Err(err);
            }
            delay = delay.max(requested);
        }

        log::info!(
            "{} failed ({}). Waiting {:?} before retry {} of {}",
            operation_name,
            err,
            delay,
            retries + 1,
            policy.max_retries
        );

        sleep(delay).await;
        retries += 1;
    }
}
