use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};

use super::paging::collect_offset_pages;
use crate::{
    report::Reporter,
    spotify::{MAX_ITEMS_PER_MUTATION, SpotifyApi, SpotifyError},
    types::{Album, ArtistRef, ReleaseDatePrecision},
    utils,
};

/// Release groups searched for fresh material.
pub const INCLUDE_GROUPS: &str = "album,single";
pub const ALBUM_PAGE_SIZE: u32 = 50;
pub const TRACK_PAGE_SIZE: u32 = 50;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Tracks appended to the playlist.
    pub added: usize,
    /// Add requests issued.
    pub add_calls: usize,
}

/// Comparable release date of an album, `None` when it cannot be derived.
pub fn release_date(album: &Album) -> Option<NaiveDate> {
    utils::parse_release_date(&album.release_date, album.release_date_precision)
}

/// Appends tracks of fresh releases that are not in the playlist yet.
///
/// `existing` must hold the playlist's URIs as they were before this call;
/// every URI added here is inserted into it, so a track shared by several
/// albums or artists is only added once. Albums are visited per artist in the
/// given order and each album with new tracks costs one add request.
pub async fn synchronize(
    api: &dyn SpotifyApi,
    reporter: &dyn Reporter,
    playlist_id: &str,
    artists: &[ArtistRef],
    existing: &mut HashSet<String>,
    freshness_days: u32,
    now: DateTime<Utc>,
) -> Result<SyncOutcome, SpotifyError> {
    let cutoff = utils::freshness_cutoff(now, freshness_days);
    let mut outcome = SyncOutcome::default();
    let mut visited_albums = HashSet::new();

    for artist in artists {
        let albums = collect_offset_pages(|offset| {
            api.artist_albums(artist.id(), INCLUDE_GROUPS, ALBUM_PAGE_SIZE, offset)
        })
        .await?;

        for album in albums {
            let Some(date) = release_date(&album) else {
                if album.release_date_precision != ReleaseDatePrecision::Unknown {
                    reporter.warning(&format!(
                        "Skipping album '{}' with unreadable release date '{}'",
                        album.name, album.release_date
                    ));
                }
                continue;
            };

            // collaborations show up once per artist
            if date < cutoff || !visited_albums.insert(album.id.clone()) {
                continue;
            }

            let tracks = collect_offset_pages(|offset| {
                api.album_tracks(&album.id, TRACK_PAGE_SIZE, offset)
            })
            .await?;

            let mut new_uris = Vec::new();
            for track in tracks {
                if !existing.contains(&track.uri) && !new_uris.contains(&track.uri) {
                    new_uris.push(track.uri);
                }
            }

            if new_uris.is_empty() {
                continue;
            }

            for chunk in new_uris.chunks(MAX_ITEMS_PER_MUTATION) {
                api.add_items(playlist_id, chunk).await?;
                outcome.add_calls += 1;
            }

            reporter.info(&format!(
                "Added {} tracks from {}'s album '{}'",
                new_uris.len(),
                artist.name(),
                album.name
            ));
            outcome.added += new_uris.len();
            existing.extend(new_uris);
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album(date: &str, precision: ReleaseDatePrecision) -> Album {
        Album {
            id: "album".into(),
            name: "Album".into(),
            release_date: date.into(),
            release_date_precision: precision,
            album_type: Some("album".into()),
        }
    }

    #[test]
    fn year_precision_maps_to_new_year() {
        assert_eq!(
            release_date(&album("2020", ReleaseDatePrecision::Year)),
            NaiveDate::from_ymd_opt(2020, 1, 1)
        );
    }

    #[test]
    fn month_precision_maps_to_first_day() {
        assert_eq!(
            release_date(&album("2023-07", ReleaseDatePrecision::Month)),
            NaiveDate::from_ymd_opt(2023, 7, 1)
        );
    }

    #[test]
    fn day_precision_is_parsed_as_is() {
        assert_eq!(
            release_date(&album("2024-02-29", ReleaseDatePrecision::Day)),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn unknown_precision_or_mismatched_value_yields_nothing() {
        assert_eq!(
            release_date(&album("2024-01-01", ReleaseDatePrecision::Unknown)),
            None
        );
        assert_eq!(release_date(&album("2024", ReleaseDatePrecision::Day)), None);
    }
}
