use crate::{
    spotify::{SpotifyApi, SpotifyError},
    types::ArtistRef,
};

/// Largest page the followed-artists endpoint serves.
pub const ARTIST_PAGE_SIZE: u32 = 50;

/// Fetches every artist the account follows, in the order Spotify lists them.
///
/// The list is re-fetched in full on every run. Pages are requested with the
/// previous page's `after` cursor until a page comes back empty or without a
/// cursor.
pub async fn fetch_followed_artists(api: &dyn SpotifyApi) -> Result<Vec<ArtistRef>, SpotifyError> {
    let mut artists = Vec::new();
    let mut after: Option<String> = None;

    loop {
        let page = api
            .followed_artists(ARTIST_PAGE_SIZE, after.as_deref())
            .await?;
        if page.items.is_empty() {
            break;
        }

        let next = page.after().map(str::to_string);
        artists.extend(page.items.into_iter().map(ArtistRef::from));

        match next {
            Some(cursor) => after = Some(cursor),
            None => break,
        }
    }

    Ok(artists)
}
