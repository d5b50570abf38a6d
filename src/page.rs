//! # Pagination
//!
//! The indexer returns list results one page at a time. Pages are numbered
//! from 1 and an empty page marks the end of the result set.
//!
//! [`paginate`] turns a page fetcher into a stream of batches and [`drain`]
//! collects such a stream into a single list. Both stop at the first error:
//! the caller either receives every row or the error that interrupted the
//! walk, never a partial list.
//!
//! Dropping the future returned by [`drain`] (for example when a
//! `tokio::time::timeout` elapses) stops the walk before the next page is
//! requested.

use std::future::Future;
use std::pin::pin;

use futures_util::{Stream, StreamExt, stream};

use crate::Result;

/// Number of the first page.
pub const FIRST_PAGE: u32 = 1;

/// Stream the pages produced by `fetch`, starting at [`FIRST_PAGE`].
///
/// Each item is one non-empty page. The stream ends after the first empty
/// page, or after yielding the first error.
pub fn paginate<T, F, Fut>(fetch: F) -> impl Stream<Item = Result<Vec<T>>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    stream::try_unfold((fetch, FIRST_PAGE), |(mut fetch, page)| async move {
        let batch = fetch(page).await?;
        if batch.is_empty() {
            tracing::trace!(page, "empty page, end of results");
            return Ok::<_, crate::Error>(None);
        }
        tracing::trace!(page, rows = batch.len(), "page received");
        Ok(Some((batch, (fetch, page + 1))))
    })
}

/// Collect every batch of a paged stream into one list.
///
/// # Errors
///
/// Returns the first error the stream yields. Rows received before the error
/// are discarded.
pub async fn drain<T, S>(pages: S) -> Result<Vec<T>>
where
    S: Stream<Item = Result<Vec<T>>>,
{
    let mut pages = pin!(pages);
    let mut rows = Vec::new();
    while let Some(batch) = pages.next().await {
        rows.extend(batch?);
    }
    Ok(rows)
}
