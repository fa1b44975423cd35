//! Cursor-based pagination over list endpoints.
//!
//! List endpoints return one page of records plus opaque `before`/`after`
//! cursors. [`CursorPager`] walks pages forward on demand, and
//! [`PaginatedStream`] flattens the same walk into a `Stream` of records.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::Stream;
use serde::Deserialize;

use crate::{Error, Result};

/// Cursors returned in a list response's `meta`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Cursors {
    /// Cursor for the page before this one
    #[serde(default)]
    pub before: Option<String>,
    /// Cursor for the page after this one
    #[serde(default)]
    pub after: Option<String>,
}

/// Pagination metadata from a list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListMeta {
    /// Page cursors
    #[serde(default)]
    pub cursors: Cursors,
    /// Page size the server applied
    #[serde(default)]
    pub limit: Option<u32>,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    /// Records in server order.
    pub items: Vec<T>,
    /// Pagination metadata.
    pub meta: ListMeta,
}

impl<T> ListPage<T> {
    /// The `after` cursor, treating an empty string as absent.
    pub fn next_cursor(&self) -> Option<&str> {
        self.meta.cursors.after.as_deref().filter(|c| !c.is_empty())
    }

    /// The `before` cursor, treating an empty string as absent.
    pub fn previous_cursor(&self) -> Option<&str> {
        self.meta.cursors.before.as_deref().filter(|c| !c.is_empty())
    }

    /// Check if another page follows this one.
    ///
    /// An empty page ends iteration even if the server sent a cursor.
    pub fn has_more(&self) -> bool {
        self.next_cursor().is_some() && !self.items.is_empty()
    }

    /// Number of records on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the page holds no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the records on this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for ListPage<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Type alias for a boxed future used by page fetchers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Fetches the page that follows `after` (or the first page for `None`).
pub type PageFetcher<T> =
    Arc<dyn Fn(Option<String>) -> BoxFuture<'static, Result<ListPage<T>>> + Send + Sync>;

/// A pull-based pager over a cursor-paginated list endpoint.
///
/// The pager starts out unfetched, which counts as having more. Each call to
/// [`value`](Self::value) fetches the page for the current cursor and adopts
/// that page's `after` cursor. Once a page comes back without a cursor (or
/// without records) the pager is exhausted and `value` keeps returning the
/// last page without touching the network. It is forward-only: there is no
/// way to rewind.
///
/// # Example
///
/// ```no_run
/// use gocardless_rs::models::ListCreditorBankAccountsParams;
///
/// # async fn example(client: gocardless_rs::GoCardlessClient) -> gocardless_rs::Result<()> {
/// let params = ListCreditorBankAccountsParams { limit: Some(50), ..Default::default() };
/// let mut pager = client.creditor_bank_accounts().all(params, None);
///
/// while pager.has_more() {
///     let page = pager.value().await?;
///     for account in page.iter() {
///         println!("{}", account.id);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct CursorPager<T> {
    fetch: PageFetcher<T>,
    cursor: Option<String>,
    response: Option<ListPage<T>>,
}

impl<T> CursorPager<T> {
    /// Create a pager from a page-fetching function.
    pub fn new<F>(fetch: F) -> Self
    where
        F: Fn(Option<String>) -> BoxFuture<'static, Result<ListPage<T>>> + Send + Sync + 'static,
    {
        Self::from_fetcher(Arc::new(fetch))
    }

    pub(crate) fn from_fetcher(fetch: PageFetcher<T>) -> Self {
        Self {
            fetch,
            cursor: None,
            response: None,
        }
    }

    /// Check whether a further page can be fetched.
    pub fn has_more(&self) -> bool {
        match self.response {
            None => true,
            Some(ref page) => self.cursor.is_some() && !page.items.is_empty(),
        }
    }

    /// The cursor the next fetch will send as `after`.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Fetch the next page, or return the last page once exhausted.
    ///
    /// A failed fetch leaves the pager unchanged, so the call can be repeated.
    pub async fn value(&mut self) -> Result<&ListPage<T>> {
        if self.has_more() {
            let page = (self.fetch)(self.cursor.clone()).await?;
            self.cursor = page.next_cursor().map(str::to_string);
            tracing::debug!(
                records = page.items.len(),
                has_more = self.cursor.is_some(),
                "fetched page"
            );
            self.response = Some(page);
        }

        // Only reachable without a response if the pager was never fetched,
        // which `has_more` rules out above.
        self.response.as_ref().ok_or(Error::MissingResult { resource: "meta" })
    }

    /// Fetch the next page, returning `None` once exhausted.
    pub async fn next_page(&mut self) -> Result<Option<ListPage<T>>>
    where
        T: Clone,
    {
        if !self.has_more() {
            return Ok(None);
        }
        self.value().await.map(|page| Some(page.clone()))
    }

    /// Turn the remaining pages into a stream of individual records.
    ///
    /// Records on pages already returned by [`value`](Self::value) are not
    /// yielded again.
    pub fn into_stream(self) -> PaginatedStream<T> {
        let has_more = self.has_more();
        let next = if self.response.is_none() {
            NextPage::Start
        } else {
            match self.cursor {
                Some(cursor) if has_more => NextPage::After(cursor),
                _ => NextPage::Done,
            }
        };
        PaginatedStream::with_state(self.fetch, next)
    }
}

impl<T> std::fmt::Debug for CursorPager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorPager")
            .field("cursor", &self.cursor)
            .field("fetched", &self.response.is_some())
            .field("has_more", &self.has_more())
            .finish()
    }
}

enum NextPage {
    Start,
    After(String),
    Done,
}

/// A stream that lazily fetches pages from a cursor-paginated endpoint.
///
/// This stream yields individual records from each page, fetching the next
/// page when the current one is exhausted. The stream ends after the first
/// error.
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
///
/// # async fn example(client: gocardless_rs::GoCardlessClient) -> gocardless_rs::Result<()> {
/// let mut stream = client
///     .creditor_bank_accounts()
///     .list_stream(Default::default(), None);
///
/// while let Some(result) = stream.next().await {
///     let account = result?;
///     println!("{:?}", account);
/// }
/// # Ok(())
/// # }
/// ```
pub struct PaginatedStream<T> {
    /// Function to fetch a page by cursor.
    fetch: PageFetcher<T>,
    /// Records of the current page not yet yielded.
    current_items: VecDeque<T>,
    /// Where the next fetch starts.
    next: NextPage,
    /// Current in-flight fetch future.
    pending_fetch: Option<BoxFuture<'static, Result<ListPage<T>>>>,
}

impl<T> PaginatedStream<T> {
    /// Create a new paginated stream starting at the first page.
    pub fn new<F>(fetch: F) -> Self
    where
        F: Fn(Option<String>) -> BoxFuture<'static, Result<ListPage<T>>> + Send + Sync + 'static,
    {
        Self::with_state(Arc::new(fetch), NextPage::Start)
    }

    fn with_state(fetch: PageFetcher<T>, next: NextPage) -> Self {
        Self {
            fetch,
            current_items: VecDeque::new(),
            next,
            pending_fetch: None,
        }
    }
}

impl<T> Stream for PaginatedStream<T> {
    type Item = Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            if let Some(item) = this.current_items.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            if let Some(ref mut fut) = this.pending_fetch {
                match fut.as_mut().poll(cx) {
                    Poll::Ready(Ok(page)) => {
                        this.pending_fetch = None;
                        this.next = match (page.has_more(), page.next_cursor()) {
                            (true, Some(cursor)) => NextPage::After(cursor.to_string()),
                            _ => NextPage::Done,
                        };
                        this.current_items = page.items.into();
                        continue;
                    }
                    Poll::Ready(Err(e)) => {
                        this.pending_fetch = None;
                        this.next = NextPage::Done; // Stop on error
                        return Poll::Ready(Some(Err(e)));
                    }
                    Poll::Pending => {
                        return Poll::Pending;
                    }
                }
            }

            let cursor = match std::mem::replace(&mut this.next, NextPage::Done) {
                NextPage::Start => None,
                NextPage::After(cursor) => Some(cursor),
                NextPage::Done => return Poll::Ready(None),
            };
            this.pending_fetch = Some((this.fetch)(cursor));
        }
    }
}

impl<T> Unpin for PaginatedStream<T> {}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use futures_util::StreamExt;

    use super::*;

    fn page(items: Vec<u32>, after: Option<&str>) -> ListPage<u32> {
        ListPage {
            items,
            meta: ListMeta {
                cursors: Cursors {
                    before: None,
                    after: after.map(str::to_string),
                },
                limit: Some(2),
            },
        }
    }

    /// Serves `records` in pages of `limit`, using the next offset as cursor.
    fn fixture(records: Vec<u32>, limit: usize, calls: Arc<AtomicU32>) -> PageFetcher<u32> {
        let records = Arc::new(records);
        Arc::new(move |cursor: Option<String>| {
            let records = records.clone();
            let calls = calls.clone();
            let fut: BoxFuture<'static, Result<ListPage<u32>>> = Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                let start = cursor
                    .map(|c| c.parse::<usize>().expect("numeric cursor"))
                    .unwrap_or(0);
                let end = (start + limit).min(records.len());
                let after = (end < records.len()).then(|| end.to_string());
                Ok(page(records[start..end].to_vec(), after.as_deref()))
            });
            fut
        })
    }

    #[tokio::test]
    async fn test_pager_visits_every_record_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut pager = CursorPager::from_fetcher(fixture(vec![1, 2, 3, 4, 5], 2, calls.clone()));

        let mut sizes = Vec::new();
        let mut seen = Vec::new();
        while pager.has_more() {
            let page = pager.value().await.unwrap();
            sizes.push(page.len());
            seen.extend(page.iter().copied());
        }

        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausted_pager_returns_last_page_without_fetching() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut pager = CursorPager::from_fetcher(fixture(vec![1, 2, 3], 2, calls.clone()));

        pager.value().await.unwrap();
        let last = pager.value().await.unwrap().clone();
        assert!(!pager.has_more());

        let again = pager.value().await.unwrap();
        assert_eq!(again, &last);
        assert_eq!(again.items, vec![3]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_first_page_terminates() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_in = calls.clone();
        let mut pager = CursorPager::new(move |_cursor: Option<String>| {
            calls_in.fetch_add(1, Ordering::SeqCst);
            // Server sends a cursor even though the page is empty
            Box::pin(async { Ok(page(Vec::new(), Some("BA999"))) })
        });

        assert!(pager.has_more());
        let first = pager.value().await.unwrap();
        assert!(first.is_empty());
        assert!(!pager.has_more());
        assert_eq!(pager.next_page().await.unwrap(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_string_cursor_is_terminal() {
        let mut pager = CursorPager::new(|_cursor: Option<String>| {
            Box::pin(async { Ok(page(vec![1], Some(""))) })
        });

        pager.value().await.unwrap();
        assert!(!pager.has_more());
        assert_eq!(pager.cursor(), None);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_pager_unchanged() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_in = calls.clone();
        let mut pager = CursorPager::new(move |_cursor: Option<String>| {
            let n = calls_in.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                if n == 0 {
                    Err(Error::MissingResult { resource: "creditor_bank_accounts" })
                } else {
                    Ok(page(vec![1], None))
                }
            })
        });

        assert!(pager.value().await.is_err());
        assert!(pager.has_more());
        assert_eq!(pager.value().await.unwrap().items, vec![1]);
    }

    #[tokio::test]
    async fn test_next_page_sequence() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut pager = CursorPager::from_fetcher(fixture(vec![1, 2, 3, 4, 5], 2, calls));

        let mut cursors = Vec::new();
        while let Some(page) = pager.next_page().await.unwrap() {
            cursors.push(page.next_cursor().map(str::to_string));
        }

        assert_eq!(cursors, vec![Some("2".to_string()), Some("4".to_string()), None]);
    }

    #[tokio::test]
    async fn test_stream_yields_all_records() {
        let calls = Arc::new(AtomicU32::new(0));
        let stream = CursorPager::from_fetcher(fixture(vec![1, 2, 3, 4, 5], 2, calls.clone()))
            .into_stream();

        let records: Vec<u32> = stream.map(|r| r.unwrap()).collect().await;
        assert_eq!(records, vec![1, 2, 3, 4, 5]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_stream_resumes_after_consumed_pages() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut pager = CursorPager::from_fetcher(fixture(vec![1, 2, 3, 4, 5], 2, calls));
        pager.value().await.unwrap();

        let records: Vec<u32> = pager.into_stream().map(|r| r.unwrap()).collect().await;
        assert_eq!(records, vec![3, 4, 5]);
    }

    #[tokio::test]
    async fn test_stream_stops_after_error() {
        let mut stream = PaginatedStream::<u32>::new(|_cursor: Option<String>| {
            Box::pin(async { Err(Error::MissingResult { resource: "creditor_bank_accounts" }) })
        });

        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
    }
}
