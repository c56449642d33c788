//! Pagination for Cloud Foundry list endpoints.
//!
//! List endpoints return one page at a time. [`Paginator`] drives a page
//! fetcher (any `FnMut(u32) -> Future<Output = Result<Page<T>>>`) and
//! flattens the pages into a single ordered [`Stream`] of items.
//!
//! Pages are requested strictly one after another: the next page is only
//! requested once every item of the previous page has been yielded. Some
//! list endpoints do not report a stable total under concurrent requests,
//! so overlapping fetches could drop or duplicate items.
//!
//! ```ignore
//! use futures::TryStreamExt;
//!
//! let orgs: Vec<Organization> = cfops::aggregate(|page| {
//!     Organization::list_page(&client, &query, page)
//! })
//! .try_collect()
//! .await?;
//! ```

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Stream, TryStreamExt};
use pin_project_lite::pin_project;
use serde::Serialize;

use crate::error::{CfError, Result};

/// A page of results from a list endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page, in server order.
    pub items: Vec<T>,
    /// Page number (1-indexed).
    pub page: u32,
    /// Total number of pages, when the server reports it.
    pub total_pages: Option<u32>,
    /// Total number of items across all pages, when the server reports it.
    pub total_results: Option<u64>,
    /// The page to request next. `None` marks the last page.
    pub next: Option<u32>,
}

impl<T> Page<T> {
    /// Create a page whose successor is derived from the reported page count.
    #[must_use]
    pub fn new(items: Vec<T>, page: u32, total_pages: Option<u32>) -> Self {
        let next = match total_pages {
            Some(total) if page < total => Some(page + 1),
            _ => None,
        };
        Self {
            items,
            page,
            total_pages,
            total_results: None,
            next,
        }
    }

    /// Create a page with an explicit next cursor.
    #[must_use]
    pub fn with_next(items: Vec<T>, page: u32, next: Option<u32>) -> Self {
        Self {
            items,
            page,
            total_pages: None,
            total_results: None,
            next,
        }
    }

    /// Attach the total result count reported by the server.
    #[must_use]
    pub fn total_results(mut self, total_results: Option<u64>) -> Self {
        self.total_results = total_results;
        self
    }

    /// Whether another page follows this one.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            total_pages: self.total_pages,
            total_results: self.total_results,
            next: self.next,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

pin_project! {
    /// A stream of items spread over consecutive pages.
    ///
    /// Created by [`aggregate`]. The stream is finite and cannot be
    /// restarted; run a new aggregation to enumerate the listing again.
    /// Dropping it stops pagination: at most the in-flight request is
    /// abandoned and no further page is requested.
    #[must_use = "streams do nothing unless polled"]
    pub struct Paginator<T, F, Fut>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Page<T>>>,
    {
        next_page: Option<u32>,
        in_flight: u32,
        buffer: VecDeque<T>,
        fetcher: F,
        #[pin]
        current_fetch: Option<Fut>,
    }
}

impl<T, F, Fut> Paginator<T, F, Fut>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    /// Create a paginator starting at page 1.
    pub fn new(fetcher: F) -> Self {
        Self {
            next_page: Some(1),
            in_flight: 0,
            buffer: VecDeque::new(),
            fetcher,
            current_fetch: None,
        }
    }
}

impl<T, F, Fut> Stream for Paginator<T, F, Fut>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(item) = this.buffer.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            if let Some(fut) = this.current_fetch.as_mut().as_pin_mut() {
                match fut.poll(cx) {
                    Poll::Ready(Ok(page)) => {
                        this.current_fetch.set(None);

                        if let Some(next) = page.next {
                            if next <= *this.in_flight {
                                return Poll::Ready(Some(Err(CfError::InvalidCursor {
                                    page: *this.in_flight,
                                    next,
                                })));
                            }
                        }

                        tracing::debug!(
                            page = *this.in_flight,
                            items = page.items.len(),
                            next = ?page.next,
                            "received page"
                        );

                        *this.next_page = page.next;
                        this.buffer.extend(page.items);
                        continue;
                    }
                    Poll::Ready(Err(e)) => {
                        this.current_fetch.set(None);
                        return Poll::Ready(Some(Err(e)));
                    }
                    Poll::Pending => return Poll::Pending,
                }
            }

            let Some(page) = this.next_page.take() else {
                return Poll::Ready(None);
            };

            tracing::debug!(page, "requesting page");
            *this.in_flight = page;
            let fut = (this.fetcher)(page);
            this.current_fetch.set(Some(fut));
        }
    }
}

/// Aggregate a paged listing into a single lazy stream of items.
///
/// `fetcher` is called with page numbers starting at 1. Items are yielded in
/// page order, then in server order within each page. A failed fetch is
/// yielded as the final `Err` item.
pub fn aggregate<T, F, Fut>(fetcher: F) -> Paginator<T, F, Fut>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    Paginator::new(fetcher)
}

/// Fetch every page and collect the items.
///
/// # Errors
///
/// Returns the first fetch error; items gathered before it are discarded.
pub async fn collect_all<T, F, Fut>(fetcher: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    aggregate(fetcher).try_collect().await
}
