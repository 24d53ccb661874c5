//! List Pages
//!
//! Pagination, query building and search debouncing shared by every table.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::api::{ApiClient, ApiError, Resource};
use crate::config::DEFAULT_PAGE_SIZE;
use crate::context::{use_api, use_notifier};

// ========================
// Response shapes
// ========================

/// A list endpoint answers either a plain array or a page envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Page<T> {
    Plain(Vec<T>),
    Paginated {
        count: u32,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        results: Vec<T>,
    },
}

impl<T> Page<T> {
    pub fn total(&self) -> u32 {
        match self {
            Page::Plain(items) => items.len() as u32,
            Page::Paginated { count, .. } => *count,
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Page::Plain(items) => items,
            Page::Paginated { results, .. } => results,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Page::Plain(items) => items,
            Page::Paginated { results, .. } => results,
        }
    }

    pub fn is_paginated(&self) -> bool {
        matches!(self, Page::Paginated { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current: u32,
    pub page_size: u32,
    pub total: u32,
}

impl Pagination {
    /// A plain list is one page holding everything.
    /// `current` is clamped to the last page the total allows.
    pub fn from_page<T>(page: &Page<T>, current: u32, page_size: u32) -> Self {
        if page.is_paginated() {
            let mut pagination = Self {
                current: current.max(1),
                page_size: page_size.max(1),
                total: page.total(),
            };
            pagination.current = pagination.current.min(pagination.page_count());
            pagination
        } else {
            Self {
                current: 1,
                page_size: page.total().max(1),
                total: page.total(),
            }
        }
    }

    pub fn page_count(&self) -> u32 {
        if self.total == 0 {
            1
        } else {
            self.total.div_ceil(self.page_size.max(1))
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.page_count()
    }

    /// 1-based index range of the rows shown, for "11-20 of 42"
    pub fn shown_range(&self) -> (u32, u32) {
        if self.total == 0 {
            return (0, 0);
        }
        let start = (self.current - 1) * self.page_size + 1;
        let end = (self.current * self.page_size).min(self.total);
        (start, end)
    }
}

// ========================
// Query
// ========================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: Option<u32>,
    pub search: String,
    pub filters: Vec<(&'static str, String)>,
}

impl ListQuery {
    pub fn search(page: u32, search: &str) -> Self {
        Self {
            page,
            search: search.to_string(),
            ..Default::default()
        }
    }

    /// Query pairs with empty values left out
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.page > 1 || self.page_size.is_some() {
            pairs.push(("page", self.page.max(1).to_string()));
        }
        if let Some(size) = self.page_size {
            pairs.push(("page_size", size.to_string()));
        }
        let search = self.search.trim();
        if !search.is_empty() {
            pairs.push(("search", search.to_string()));
        }
        for (key, value) in &self.filters {
            if !value.trim().is_empty() {
                pairs.push((*key, value.trim().to_string()));
            }
        }
        pairs
    }
}

// ========================
// Debounce
// ========================

/// Generation counter: only the most recent scheduled action is still current.
#[derive(Debug, Clone, Default)]
pub struct Debouncer {
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    /// Wait out `sleep`; true when no newer call arrived meanwhile.
    pub async fn settle<F: Future<Output = ()>>(&self, sleep: F) -> bool {
        let ticket = self.bump();
        sleep.await;
        self.is_current(ticket)
    }
}

// ========================
// Fetching
// ========================

/// Fetch one page of `resource`. A page past the first that no longer
/// exists (404 "Invalid page." after its last row was deleted) falls back
/// to the page before it; the returned pagination names the page loaded.
pub async fn load_page<T: DeserializeOwned>(
    resource: Resource<T>,
    client: &ApiClient,
    mut query: ListQuery,
) -> Result<(Vec<T>, Pagination), ApiError> {
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    loop {
        match resource.list(client, &query.to_pairs()).await {
            Ok(page) => {
                let pagination = Pagination::from_page(&page, query.page, page_size);
                return Ok((page.into_items(), pagination));
            }
            Err(err) if err.status() == Some(404) && query.page > 1 => {
                log::info!("[LIST] page {} is gone, falling back", query.page);
                query.page -= 1;
            }
            Err(err) => return Err(err),
        }
    }
}

// ========================
// Reactive list state
// ========================

/// Rows of the latest successful fetch plus its pagination
pub struct ListState<T: Send + Sync + 'static> {
    pub rows: RwSignal<Vec<T>>,
    pub pagination: RwSignal<Pagination>,
    pub loading: RwSignal<bool>,
    /// Requested page; search and filter changes reset it to 1.
    pub page: RwSignal<u32>,
    reload: RwSignal<u32>,
}

impl<T: Send + Sync + 'static> Clone for ListState<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for ListState<T> {}

impl<T: Send + Sync + 'static> ListState<T> {
    /// Fetch the current page again, e.g. after a create or delete.
    pub fn reload(&self) {
        self.reload.update(|v| *v += 1);
    }
}

/// Fetch `resource` whenever the page, the query (built from the page) or a
/// reload changes. A failed fetch keeps the previous rows and toasts the error.
pub fn use_list<T, Q>(resource: Resource<T>, query: Q) -> ListState<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
    Q: Fn(u32) -> ListQuery + 'static,
{
    let client = use_api();
    let notifier = use_notifier();
    let state = ListState {
        rows: RwSignal::new(Vec::new()),
        pagination: RwSignal::new(Pagination {
            current: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total: 0,
        }),
        loading: RwSignal::new(false),
        page: RwSignal::new(1),
        reload: RwSignal::new(0),
    };

    Effect::new(move |_| {
        let query = query(state.page.get());
        state.reload.track();
        let client = client.clone();
        state.loading.set(true);
        spawn_local(async move {
            match load_page(resource, &client, query).await {
                Ok((rows, pagination)) => {
                    // a fallback already fetched the right rows
                    state.page.update_untracked(|p| *p = pagination.current);
                    state.pagination.set(pagination);
                    state.rows.set(rows);
                }
                Err(err) => notifier.api_error(&err),
            }
            state.loading.set(false);
        });
    });

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{empty_response, json_response, path_of, MockTransport};
    use crate::api::{Method, CUSTOMERS};
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    #[test]
    fn test_page_shapes() {
        let plain: Page<u32> = serde_json::from_value(json!([1, 2, 3])).unwrap();
        assert_eq!(plain.total(), 3);
        assert!(!plain.is_paginated());

        let paged: Page<u32> = serde_json::from_value(json!({
            "count": 42, "next": "http://api/x/?page=3", "previous": null, "results": [1, 2]
        }))
        .unwrap();
        assert_eq!(paged.total(), 42);
        assert_eq!(paged.items(), &[1, 2]);
    }

    #[test]
    fn test_pagination_from_server_count() {
        let paged: Page<u32> = Page::Paginated { count: 42, next: None, previous: None, results: vec![] };
        let p = Pagination::from_page(&paged, 2, 10);
        assert_eq!(p.page_count(), 5);
        assert_eq!(p.shown_range(), (11, 20));
        assert!(p.has_previous() && p.has_next());

        let last = Pagination { current: 5, ..p };
        assert_eq!(last.shown_range(), (41, 42));
        assert!(!last.has_next());
    }

    #[test]
    fn test_current_clamped_to_last_page() {
        let paged: Page<u32> = Page::Paginated { count: 10, next: None, previous: None, results: vec![] };
        let p = Pagination::from_page(&paged, 2, 10);
        assert_eq!(p.current, 1);
        assert_eq!(p.shown_range(), (1, 10));
        assert!(!p.has_next());
    }

    #[test]
    fn test_plain_list_is_single_page() {
        let plain: Page<u32> = Page::Plain(vec![1, 2, 3]);
        let p = Pagination::from_page(&plain, 4, 10);
        assert_eq!(p, Pagination { current: 1, page_size: 3, total: 3 });
        assert!(!p.has_next());
    }

    #[test]
    fn test_query_first_page_without_size_is_bare() {
        assert!(ListQuery::search(1, "  ").to_pairs().is_empty());
        assert_eq!(
            ListQuery::search(3, "acme").to_pairs(),
            vec![("page", "3".to_string()), ("search", "acme".to_string())]
        );
    }

    /// Eleven customers, ten per page; out-of-range pages answer like DRF.
    fn paged_server(rows: Arc<Mutex<Vec<u32>>>) -> MockTransport {
        MockTransport::new(move |req| {
            let mut rows = rows.lock().unwrap();
            if req.method == Method::Delete {
                rows.retain(|id| !path_of(req).ends_with(&format!("customers/{}/", id)));
                return empty_response(204);
            }
            let page: usize = path_of(req)
                .split(['?', '&'])
                .find_map(|pair| pair.strip_prefix("page="))
                .and_then(|n| n.parse().ok())
                .unwrap_or(1);
            let start = (page - 1) * 10;
            if page > 1 && start >= rows.len() {
                return json_response(404, json!({"detail": "Invalid page."}));
            }
            let results: Vec<_> = rows
                .iter()
                .skip(start)
                .take(10)
                .map(|id| json!({"id": id, "name": format!("Customer {}", id)}))
                .collect();
            json_response(200, json!({"count": rows.len(), "results": results}))
        })
    }

    #[tokio::test]
    async fn test_deleting_last_row_of_last_page_falls_back() {
        let rows = Arc::new(Mutex::new((1..=11).collect::<Vec<u32>>()));
        let mock = paged_server(rows);
        let client = mock.default_client();

        let (shown, pagination) = load_page(CUSTOMERS, &client, ListQuery::search(2, "")).await.unwrap();
        assert_eq!(shown.iter().map(|c| c.id).collect::<Vec<_>>(), vec![11]);
        assert_eq!(pagination.current, 2);

        CUSTOMERS.delete(&client, 11).await.unwrap();
        let (shown, pagination) = load_page(CUSTOMERS, &client, ListQuery::search(2, "")).await.unwrap();
        assert_eq!(shown.len(), 10);
        assert!(shown.iter().all(|c| c.id != 11));
        assert_eq!(pagination.current, 1);
        assert_eq!(pagination.shown_range(), (1, 10));

        let pages: Vec<String> = mock
            .calls()
            .into_iter()
            .filter(|(method, _)| *method == Method::Get)
            .map(|(_, path)| path)
            .collect();
        assert_eq!(pages, vec!["customers/?page=2", "customers/?page=2", "customers/"]);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let mock = MockTransport::new(|_| json_response(500, json!({"detail": "boom"})));
        let client = mock.default_client();

        let err = load_page(CUSTOMERS, &client, ListQuery::search(3, "")).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_only_latest_keystroke_fires() {
        let debouncer = Debouncer::new();
        let fired = Arc::new(std::sync::Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for (i, (text, delay)) in [("a", 0u64), ("ac", 10), ("acm", 20)].into_iter().enumerate() {
            let debouncer = debouncer.clone();
            let fired = fired.clone();
            handles.push(tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                if debouncer.settle(tokio::time::sleep(Duration::from_millis(100))).await {
                    fired.lock().unwrap().push((i, text));
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*fired.lock().unwrap(), vec![(2, "acm")]);
    }

    #[tokio::test]
    async fn test_bump_cancels_pending_settle() {
        let debouncer = Debouncer::new();
        let answer = debouncer.clone();
        let (fired, _) = tokio::join!(debouncer.settle(tokio::time::sleep(Duration::from_millis(50))), async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            answer.bump();
        });
        assert!(!fired);
    }

    #[tokio::test]
    async fn test_typing_burst_sends_one_search_request() {
        let mock = MockTransport::new(|_| json_response(200, json!({"count": 0, "results": []})));
        let client = mock.default_client();
        let debouncer = Debouncer::new();

        let keystroke = |text: &'static str, delay: u64| {
            let debouncer = debouncer.clone();
            let client = client.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                if debouncer.settle(tokio::time::sleep(Duration::from_millis(100))).await {
                    load_page(CUSTOMERS, &client, ListQuery::search(1, text)).await.unwrap();
                }
            }
        };
        tokio::join!(keystroke("a", 0), keystroke("ac", 10), keystroke("acm", 20));

        assert_eq!(mock.calls(), vec![(Method::Get, "customers/?search=acm".to_string())]);
    }
}
