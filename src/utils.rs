use std::collections::HashSet;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Days, NaiveDate, Utc};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::ReleaseDatePrecision;

/// Generates a random PKCE code verifier.
///
/// The verifier is 128 alphanumeric characters, the maximum length allowed by
/// RFC 7636, and must be kept until the authorization code is exchanged.
pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

/// Derives the `S256` code challenge sent with the authorization request.
///
/// # Arguments
///
/// * `verifier` - The code verifier from [`generate_code_verifier`]
///
/// # Returns
///
/// The base64url-encoded (unpadded) SHA-256 digest of the verifier.
///
/// # Example
///
/// ```
/// let verifier = generate_code_verifier();
/// let challenge = generate_code_challenge(&verifier);
/// assert_eq!(challenge.len(), 43);
/// ```
pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Turns a release date reported at the given precision into a comparable date.
///
/// Month precision maps to the first of the month, year precision to January
/// 1st. Returns `None` for an unknown precision or a value that does not match
/// its precision.
pub fn parse_release_date(value: &str, precision: ReleaseDatePrecision) -> Option<NaiveDate> {
    match precision {
        ReleaseDatePrecision::Day => NaiveDate::parse_from_str(value, "%Y-%m-%d").ok(),
        ReleaseDatePrecision::Month => {
            NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").ok()
        }
        ReleaseDatePrecision::Year => {
            let year: i32 = value.parse().ok()?;
            NaiveDate::from_ymd_opt(year, 1, 1)
        }
        ReleaseDatePrecision::Unknown => None,
    }
}

/// Oldest release date still considered fresh, in whole days back from `now`.
pub fn freshness_cutoff(now: DateTime<Utc>, freshness_days: u32) -> NaiveDate {
    let today = now.date_naive();
    today
        .checked_sub_days(Days::new(u64::from(freshness_days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Parses a playlist item's `added_at` timestamp (RFC 3339) into UTC.
pub fn parse_added_at(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Whole days elapsed between `added_at` and `now`.
pub fn age_in_days(added_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - added_at).num_days()
}

/// Drops repeated entries, keeping the first occurrence of each.
pub fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Makes an account label safe to use as a file name.
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
