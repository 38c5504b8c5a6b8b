use std::future::Future;

use crate::{spotify::SpotifyError, types::Page};

/// Walks an offset-paginated listing to the end.
///
/// `fetch` receives the offset of the page to load. The walk stops at the
/// first page without a `next` link or without items.
pub(crate) async fn collect_offset_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>, SpotifyError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, SpotifyError>>,
{
    let mut items = Vec::new();
    let mut offset = 0;

    loop {
        let page = fetch(offset).await?;
        let has_next = page.has_next();
        offset += page.items.len() as u32;
        items.extend(page.items);

        if !has_next {
            break;
        }
    }

    Ok(items)
}
