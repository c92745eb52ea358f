// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::Result;
use crate::status::Status;

/// Describes a raw page returned by a list RPC, as defined by
/// [AIP-158](https://google.aip.dev/158).
pub trait PageableResponse {
    /// The continuation token. Empty on the last page.
    fn next_page_token(&self) -> &str;
}

/// Fetches one page of a list RPC into a caller-provided container.
///
/// On success the container holds either some elements and a non-empty
/// continuation token, or no elements and an empty token. Any error stops the
/// iteration and is returned to the caller.
///
/// The retriever tracks its own cursor. [Pages] and [PaginatedResult] clone the
/// retriever at the start of each traversal, so retrievers must be [Clone] and
/// a fresh clone must start from the first page.
pub trait PageRetriever<P> {
    fn fetch(&mut self, page: &mut P) -> Result<()>;
}

impl<P, F> PageRetriever<P> for F
where
    F: FnMut(&mut P) -> Result<()>,
{
    fn fetch(&mut self, page: &mut P) -> Result<()> {
        self(page)
    }
}

/// Extracts the element collection from a raw page.
///
/// # Example
/// ```
/// # use gax::pagination::Accessor;
/// #[derive(Default)]
/// struct ListBooksResponse {
///     books: Vec<String>,
///     next_page_token: String,
/// }
///
/// #[derive(Clone)]
/// struct BooksAccessor;
/// impl Accessor<ListBooksResponse> for BooksAccessor {
///     type Element = String;
///     fn elements<'a>(&self, page: &'a ListBooksResponse) -> &'a [String] {
///         &page.books
///     }
///     fn elements_mut<'a>(&self, page: &'a mut ListBooksResponse) -> &'a mut Vec<String> {
///         &mut page.books
///     }
/// }
/// ```
pub trait Accessor<P> {
    type Element;
    fn elements<'a>(&self, page: &'a P) -> &'a [Self::Element];
    fn elements_mut<'a>(&self, page: &'a mut P) -> &'a mut Vec<Self::Element>;
}

/// One fetched page.
///
/// A `PageResult` is a single-use snapshot. [take_elements][Self::take_elements]
/// moves the elements out and leaves the page's element collection empty.
#[derive(Clone, Debug)]
pub struct PageResult<P, A> {
    page: P,
    accessor: A,
}

impl<P, A> PageResult<P, A>
where
    A: Accessor<P>,
{
    pub fn new(page: P, accessor: A) -> Self {
        Self { page, accessor }
    }

    /// The underlying page.
    pub fn raw_page(&self) -> &P {
        &self.page
    }

    /// Consumes the result, returning the underlying page.
    pub fn into_raw_page(self) -> P {
        self.page
    }

    /// The number of elements in the page.
    pub fn len(&self) -> usize {
        self.accessor.elements(&self.page).len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessor.elements(&self.page).is_empty()
    }

    /// Iterates over the elements in the page.
    pub fn iter(&self) -> std::slice::Iter<'_, A::Element> {
        self.accessor.elements(&self.page).iter()
    }

    /// Moves the elements out of the page.
    pub fn take_elements(&mut self) -> Vec<A::Element> {
        std::mem::take(self.accessor.elements_mut(&mut self.page))
    }

    /// Consumes the result, returning its elements.
    pub fn into_elements(mut self) -> Vec<A::Element> {
        self.take_elements()
    }
}

impl<P, A> PageResult<P, A>
where
    P: PageableResponse,
{
    /// The continuation token of this page, empty if this is the last page.
    pub fn next_page_token(&self) -> &str {
        self.page.next_page_token()
    }
}

impl<P, A> IntoIterator for PageResult<P, A>
where
    A: Accessor<P>,
{
    type Item = A::Element;
    type IntoIter = std::vec::IntoIter<A::Element>;
    fn into_iter(self) -> Self::IntoIter {
        self.into_elements().into_iter()
    }
}

impl<'a, P, A> IntoIterator for &'a PageResult<P, A>
where
    A: Accessor<P>,
{
    type Item = &'a A::Element;
    type IntoIter = std::slice::Iter<'a, A::Element>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A lazy sequence of pages.
///
/// No page is fetched until the sequence is iterated. Each call to
/// [iter][Self::iter] starts a new traversal from the first page, using a
/// fresh clone of the retriever, and produces the same pages as any previous
/// traversal.
///
/// With a non-zero `cap` the traversal stops once `cap` pages are fetched. The
/// last fetched page is never yielded, neither when its token is empty nor
/// when it reaches the cap, but it is available via [PagesIter::end_page].
///
/// # Example
/// ```
/// # use gax::pagination::*;
/// # #[derive(Default)]
/// # struct Page { items: Vec<i32>, token: String }
/// # impl PageableResponse for Page {
/// #     fn next_page_token(&self) -> &str { &self.token }
/// # }
/// # #[derive(Clone)]
/// # struct Items;
/// # impl Accessor<Page> for Items {
/// #     type Element = i32;
/// #     fn elements<'a>(&self, p: &'a Page) -> &'a [i32] { &p.items }
/// #     fn elements_mut<'a>(&self, p: &'a mut Page) -> &'a mut Vec<i32> { &mut p.items }
/// # }
/// let mut count = 0;
/// let retriever = move |page: &mut Page| -> gax::Result<()> {
///     count += 1;
///     if count <= 3 {
///         page.items = vec![count];
///         page.token = format!("page-{count}");
///     }
///     Ok(())
/// };
/// let pages = Pages::new(retriever, Items, 0);
/// let tokens = pages
///     .iter()
///     .map(|p| p.map(|p| p.next_page_token().to_string()))
///     .collect::<gax::Result<Vec<_>>>()?;
/// assert_eq!(tokens, vec!["page-1", "page-2", "page-3"]);
/// # Ok::<(), gax::Status>(())
/// ```
#[derive(Clone, Debug)]
pub struct Pages<P, A, R> {
    retriever: R,
    accessor: A,
    cap: usize,
    _page: std::marker::PhantomData<fn() -> P>,
}

impl<P, A, R> Pages<P, A, R>
where
    P: Default + PageableResponse,
    A: Accessor<P> + Clone,
    R: PageRetriever<P> + Clone,
{
    /// Creates a new sequence. A `cap` of 0 means unlimited.
    pub fn new(retriever: R, accessor: A, cap: usize) -> Self {
        Self {
            retriever,
            accessor,
            cap,
            _page: std::marker::PhantomData,
        }
    }

    /// The maximum number of pages fetched per traversal, 0 if unlimited.
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Starts a new traversal.
    pub fn iter(&self) -> PagesIter<P, A, R> {
        PagesIter {
            retriever: self.retriever.clone(),
            accessor: self.accessor.clone(),
            cap: self.cap,
            page_count: 0,
            state: PagesState::Fetching,
        }
    }
}

impl<'a, P, A, R> IntoIterator for &'a Pages<P, A, R>
where
    P: Default + PageableResponse,
    A: Accessor<P> + Clone,
    R: PageRetriever<P> + Clone,
{
    type Item = Result<PageResult<P, A>>;
    type IntoIter = PagesIter<P, A, R>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug)]
enum PagesState<P, A> {
    // The next call to `next()` fetches a page.
    Fetching,
    // The traversal reached the last page, or the page cap.
    Exhausted(PageResult<P, A>),
    // The retriever failed, there is no terminal page.
    Failed(Status),
}

/// One traversal of a [Pages] sequence.
///
/// Each call to `next()` fetches one page. A fetch error is returned exactly
/// once, after which the iterator is finished, and [status][Self::status]
/// reports the error. Exhaustion and failure are always distinguishable:
/// after exhaustion [end_page][Self::end_page] returns the terminal page.
#[derive(Debug)]
pub struct PagesIter<P, A, R> {
    retriever: R,
    accessor: A,
    cap: usize,
    page_count: usize,
    state: PagesState<P, A>,
}

impl<P, A, R> PagesIter<P, A, R> {
    /// The number of pages fetched so far, including the terminal page.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Returns true once the traversal reached its terminal page.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, PagesState::Exhausted(_))
    }

    /// The terminal page, once the traversal is exhausted.
    ///
    /// When the traversal stops because of the page cap, this page contains
    /// the elements of the last page fetched, which are never yielded.
    pub fn end_page(&self) -> Option<&PageResult<P, A>> {
        match &self.state {
            PagesState::Exhausted(page) => Some(page),
            _ => None,
        }
    }

    /// Consumes the iterator, returning the terminal page, if any.
    pub fn into_end_page(self) -> Option<PageResult<P, A>> {
        match self.state {
            PagesState::Exhausted(page) => Some(page),
            _ => None,
        }
    }

    /// The error that stopped the traversal, if any.
    pub fn status(&self) -> Option<&Status> {
        match &self.state {
            PagesState::Failed(status) => Some(status),
            _ => None,
        }
    }
}

impl<P, A, R> Iterator for PagesIter<P, A, R>
where
    P: Default + PageableResponse,
    A: Accessor<P> + Clone,
    R: PageRetriever<P>,
{
    type Item = Result<PageResult<P, A>>;

    fn next(&mut self) -> Option<Self::Item> {
        if !matches!(self.state, PagesState::Fetching) {
            return None;
        }
        let mut page = P::default();
        if let Err(status) = self.retriever.fetch(&mut page) {
            tracing::debug!(page_count = self.page_count, %status, "cannot fetch page");
            self.state = PagesState::Failed(status.clone());
            return Some(Err(status));
        }
        self.page_count += 1;
        let page = PageResult::new(page, self.accessor.clone());
        if page.next_page_token().is_empty() || (self.cap != 0 && self.page_count >= self.cap) {
            self.state = PagesState::Exhausted(page);
            return None;
        }
        Some(Ok(page))
    }
}

impl<P, A, R> std::iter::FusedIterator for PagesIter<P, A, R>
where
    P: Default + PageableResponse,
    A: Accessor<P> + Clone,
    R: PageRetriever<P>,
{
}

/// A lazy sequence of elements, flattened across the pages of a list RPC.
///
/// Uses the same retriever and cap configuration as [Pages]. The elements of
/// the terminal page are never returned.
#[derive(Clone, Debug)]
pub struct PaginatedResult<P, A, R> {
    pages: Pages<P, A, R>,
}

impl<P, A, R> PaginatedResult<P, A, R>
where
    P: Default + PageableResponse,
    A: Accessor<P> + Clone,
    R: PageRetriever<P> + Clone,
{
    /// Creates a new sequence. A `cap` of 0 means unlimited.
    pub fn new(retriever: R, accessor: A, cap: usize) -> Self {
        Self {
            pages: Pages::new(retriever, accessor, cap),
        }
    }

    /// The underlying sequence of pages.
    pub fn pages(&self) -> &Pages<P, A, R> {
        &self.pages
    }

    /// Starts a new traversal.
    pub fn iter(&self) -> PaginatedIter<P, A, R> {
        PaginatedIter {
            pages: self.pages.iter(),
            current: Vec::new().into_iter(),
        }
    }
}

impl<'a, P, A, R> IntoIterator for &'a PaginatedResult<P, A, R>
where
    P: Default + PageableResponse,
    A: Accessor<P> + Clone,
    R: PageRetriever<P> + Clone,
{
    type Item = Result<A::Element>;
    type IntoIter = PaginatedIter<P, A, R>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One traversal of a [PaginatedResult].
pub struct PaginatedIter<P, A, R>
where
    A: Accessor<P>,
{
    pages: PagesIter<P, A, R>,
    current: std::vec::IntoIter<A::Element>,
}

impl<P, A, R> PaginatedIter<P, A, R>
where
    A: Accessor<P>,
{
    /// The underlying page traversal.
    pub fn pages(&self) -> &PagesIter<P, A, R> {
        &self.pages
    }
}

impl<P, A, R> Iterator for PaginatedIter<P, A, R>
where
    P: Default + PageableResponse,
    A: Accessor<P> + Clone,
    R: PageRetriever<P>,
{
    type Item = Result<A::Element>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(element) = self.current.next() {
                return Some(Ok(element));
            }
            match self.pages.next()? {
                Ok(page) => self.current = page.into_elements().into_iter(),
                Err(status) => return Some(Err(status)),
            }
        }
    }
}

impl<P, A, R> std::iter::FusedIterator for PaginatedIter<P, A, R>
where
    P: Default + PageableResponse,
    A: Accessor<P> + Clone,
    R: PageRetriever<P>,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Code;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct TestPage {
        items: Vec<String>,
        next_page_token: String,
    }

    impl PageableResponse for TestPage {
        fn next_page_token(&self) -> &str {
            &self.next_page_token
        }
    }

    #[derive(Clone, Debug)]
    struct Items;

    impl Accessor<TestPage> for Items {
        type Element = String;
        fn elements<'a>(&self, page: &'a TestPage) -> &'a [String] {
            &page.items
        }
        fn elements_mut<'a>(&self, page: &'a mut TestPage) -> &'a mut Vec<String> {
            &mut page.items
        }
    }

    fn test_page() -> PageResult<TestPage, Items> {
        let page = TestPage {
            items: (0..10).map(|i| format!("item-{i}")).collect(),
            next_page_token: "next".into(),
        };
        PageResult::new(page, Items)
    }

    // Returns `count` pages with one element each, then fails if `fail` is set.
    fn retriever(count: usize, fail: bool) -> impl FnMut(&mut TestPage) -> Result<()> + Clone {
        let mut i = 0;
        move |page| {
            i += 1;
            if i <= count {
                page.items = vec![format!("item-{i}")];
                page.next_page_token = format!("token-{i}");
                return Ok(());
            }
            if fail {
                return Err(Status::new(Code::Unavailable, "try-again"));
            }
            Ok(())
        }
    }

    #[test]
    fn page_result_accessors() {
        let page = test_page();
        assert_eq!(page.next_page_token(), "next");
        assert_eq!(page.raw_page().next_page_token, "next");
        assert_eq!(page.len(), 10);
        assert!(!page.is_empty());
        assert_eq!(page.iter().next().map(String::as_str), Some("item-0"));
        let names = (&page).into_iter().cloned().collect::<Vec<_>>();
        assert_eq!(names, page.raw_page().items);
    }

    #[test]
    fn page_result_take_elements() {
        let mut page = test_page();
        let items = page.take_elements();
        assert_eq!(items.len(), 10);
        assert!(page.is_empty());
        assert!(page.iter().next().is_none());
        assert_eq!(page.next_page_token(), "next");
    }

    #[test]
    fn page_result_into_iter() {
        let got = test_page().into_iter().collect::<Vec<_>>();
        let want = (0..10).map(|i| format!("item-{i}")).collect::<Vec<_>>();
        assert_eq!(got, want);
    }

    #[test]
    fn pages_lazy() {
        let mut calls = 0;
        let retriever = move |_: &mut TestPage| -> Result<()> {
            calls += 1;
            assert!(calls <= 1, "unexpected call");
            Ok(())
        };
        let pages = Pages::new(retriever, Items, 0);
        assert_eq!(pages.cap(), 0);
        let iter = pages.iter();
        assert_eq!(iter.page_count(), 0);
        assert!(!iter.is_exhausted());
    }

    #[test]
    fn pages_failure() {
        let pages = Pages::new(retriever(2, true), Items, 0);
        let mut iter = pages.iter();
        assert!(matches!(iter.next(), Some(Ok(_))));
        assert!(matches!(iter.next(), Some(Ok(_))));
        let err = iter.next().and_then(|r| r.err());
        assert_eq!(err, Some(Status::new(Code::Unavailable, "try-again")));
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
        assert!(iter.end_page().is_none());
        assert!(!iter.is_exhausted());
        assert_eq!(iter.status().map(|s| s.code()), Some(Code::Unavailable));
        assert_eq!(iter.page_count(), 2);
    }

    #[test]
    fn pages_exhausted_has_no_status() {
        let pages = Pages::new(retriever(2, false), Items, 0);
        let mut iter = pages.iter();
        assert_eq!(iter.by_ref().count(), 2);
        assert!(iter.is_exhausted());
        assert!(iter.status().is_none());
        assert_eq!(iter.page_count(), 3);
        let end = iter
            .into_end_page()
            .expect("exhausted iterators have an end page");
        assert_eq!(end.next_page_token(), "");
    }

    #[test]
    fn paginated_failure() {
        let result = PaginatedResult::new(retriever(2, true), Items, 0);
        let got = result.iter().collect::<Vec<_>>();
        assert_eq!(
            got,
            vec![
                Ok("item-1".to_string()),
                Ok("item-2".to_string()),
                Err(Status::new(Code::Unavailable, "try-again")),
            ]
        );
    }

    #[test]
    fn paginated_pages_view() {
        let result = PaginatedResult::new(retriever(3, false), Items, 2);
        assert_eq!(result.pages().cap(), 2);
        let mut iter = result.iter();
        assert_eq!(iter.next().transpose(), Ok(Some("item-1".to_string())));
        assert_eq!(iter.next().transpose(), Ok(None));
        assert_eq!(iter.pages().page_count(), 2);
        let end = iter.pages().end_page().map(|p| p.next_page_token());
        assert_eq!(end, Some("token-2"));
    }
}
