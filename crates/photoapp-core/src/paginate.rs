//! Cursor pagination over the bucket listing.
//!
//! The service returns up to [`PAGE_SIZE`] items per call and accepts the key
//! of the last item seen as the cursor for the next call. There is no explicit
//! "has more" flag: a short page ends the listing, and so does an empty one.
//! A listing whose length is an exact multiple of the page size therefore
//! costs one extra call that comes back empty.

use crate::error::ClientError;
use crate::response::ClassifiedResult;

/// Items per page served by the bucket endpoint.
pub const PAGE_SIZE: usize = 12;

/// An item that can serve as the cursor for the following page.
pub trait PageItem {
    fn cursor_key(&self) -> &str;
}

/// Lazy, finite, non-restartable sequence of pages.
///
/// Each call to `next` issues at most one fetch. The first error (transport
/// failure or a non-200 classification) is yielded once and ends the sequence.
pub struct Pages<T, F> {
    endpoint: String,
    fetch: F,
    cursor: String,
    fetches: usize,
    finished: bool,
    _item: std::marker::PhantomData<fn() -> T>,
}

impl<T, F> Pages<T, F>
where
    T: PageItem,
    F: FnMut(&str) -> Result<ClassifiedResult<Vec<T>>, ClientError>,
{
    /// `endpoint` names the listing in errors; `fetch` is called with the
    /// current cursor, empty for the first page.
    pub fn new(endpoint: impl Into<String>, fetch: F) -> Self {
        Pages {
            endpoint: endpoint.into(),
            fetch,
            cursor: String::new(),
            fetches: 0,
            finished: false,
            _item: std::marker::PhantomData,
        }
    }

    /// Cursor the next fetch will use.
    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    /// Number of fetches issued so far.
    pub fn fetches(&self) -> usize {
        self.fetches
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Drain the remaining pages into one list of items.
    pub fn collect_items(self) -> Result<Vec<T>, ClientError> {
        let mut items = Vec::new();
        for page in self {
            items.extend(page?);
        }
        Ok(items)
    }
}

impl<T, F> Iterator for Pages<T, F>
where
    T: PageItem,
    F: FnMut(&str) -> Result<ClassifiedResult<Vec<T>>, ClientError>,
{
    type Item = Result<Vec<T>, ClientError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.fetches += 1;
        let page = match (self.fetch)(&self.cursor).and_then(|r| r.into_result(&self.endpoint)) {
            Ok(page) => page,
            Err(e) => {
                self.finished = true;
                return Some(Err(e));
            }
        };

        let Some(last) = page.last() else {
            tracing::debug!(endpoint = %self.endpoint, fetches = self.fetches, "empty page, listing done");
            self.finished = true;
            return None;
        };
        self.cursor = last.cursor_key().to_string();

        if page.len() < PAGE_SIZE {
            self.finished = true;
        }
        Some(Ok(page))
    }
}
