//! Paginated view over the administered users collection
//!
//! Holds one [`PageWindow`] at a time. Every successful fetch replaces the
//! window wholesale; a failed fetch leaves the last good window in place.
//!
//! Requests are tagged with a sequence number. When navigations overlap, only
//! the response to the most recently issued request may replace the window;
//! earlier responses are dropped on arrival.

use crate::error::{ClientError, Result};
use crate::session::SessionManager;
use crate::transport::ApiRequest;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use waitlist_common::users::{AdminUser, UsersCount, UsersPage, USERS_PAGE_SIZE};

pub const USERS_COUNT_PATH: &str = "/api/admin/users/count";

pub fn users_page_path(page_number: u32) -> String {
    format!("/api/admin/users/{}", page_number)
}

/// The currently displayed slice of the users collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageWindow {
    pub page_number: u32,
    pub page_size: usize,
    pub items: Vec<AdminUser>,
    pub total_count: u64,
    pub is_last_page: bool,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: USERS_PAGE_SIZE,
            items: Vec::new(),
            total_count: 0,
            is_last_page: false,
        }
    }
}

impl PageWindow {
    fn from_response(page_number: u32, page_size: usize, page: UsersPage) -> Result<Self> {
        if page.users.len() > page_size {
            return Err(ClientError::Fetch(format!(
                "server returned {} users for a page of {}",
                page.users.len(),
                page_size
            )));
        }

        Ok(Self {
            page_number,
            page_size,
            items: page.users,
            total_count: page.total_users,
            is_last_page: page.is_last_page,
        })
    }

    /// Number of pages implied by `total_count`, at least 1
    pub fn page_count(&self) -> u64 {
        let size = self.page_size.max(1) as u64;
        self.total_count.div_ceil(size).max(1)
    }

    /// 1-based position of the first item on this page, 0 when empty
    pub fn first_item_number(&self) -> u64 {
        if self.items.is_empty() {
            0
        } else {
            (self.page_number as u64 - 1) * self.page_size as u64 + 1
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageState {
    Empty,
    Loading,
    Loaded,
    Error,
}

/// Collection-wide counters from the count endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateCount {
    pub total_count: u64,
    /// Users registered in the last 24 hours
    pub recent_count: u64,
}

#[derive(Debug)]
struct PagerState {
    window: PageWindow,
    state: PageState,
    aggregate: AggregateCount,
    loaded_once: bool,
}

pub struct UserPager {
    session: Arc<SessionManager>,
    page_size: usize,
    inner: RwLock<PagerState>,
    issued: AtomicU64,
}

impl UserPager {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self {
            session,
            page_size: USERS_PAGE_SIZE,
            inner: RwLock::new(PagerState {
                window: PageWindow::default(),
                state: PageState::Empty,
                aggregate: AggregateCount::default(),
                loaded_once: false,
            }),
            issued: AtomicU64::new(0),
        }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub async fn window(&self) -> PageWindow {
        self.inner.read().await.window.clone()
    }

    pub async fn state(&self) -> PageState {
        self.inner.read().await.state
    }

    pub async fn aggregate(&self) -> AggregateCount {
        self.inner.read().await.aggregate
    }

    /// Fetch `page_number` and make it the current window.
    ///
    /// Only the most recently issued load updates the pager. When a newer
    /// load was issued while this one was in flight, this one's response is
    /// discarded: a success returns whatever window is current when it
    /// arrives (the window from before the newer load, if that is still in
    /// flight), and a failure returns its own error. Either way the returned
    /// window may not be `page_number`; read [`UserPager::window`] once all
    /// loads have settled.
    pub async fn load_page(&self, page_number: u32) -> Result<PageWindow> {
        if page_number == 0 {
            return Err(ClientError::InvalidPage(page_number));
        }

        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.write().await.state = PageState::Loading;
        debug!(page = page_number, seq, "loading users page");

        let result = self.fetch_page(page_number).await;

        let mut inner = self.inner.write().await;
        if seq != self.issued.load(Ordering::SeqCst) {
            debug!(page = page_number, seq, "dropping superseded page response");
            return result.map(|_| inner.window.clone());
        }

        match result {
            Ok(window) => {
                inner.window = window.clone();
                inner.state = PageState::Loaded;
                inner.loaded_once = true;
                Ok(window)
            }
            Err(e) => {
                warn!(page = page_number, error = %e, "failed to load users page");
                inner.state = PageState::Error;
                Err(e)
            }
        }
    }

    /// Load the following page; no-op on the last page
    pub async fn next_page(&self) -> Result<PageWindow> {
        let (window, loaded_once) = {
            let inner = self.inner.read().await;
            (inner.window.clone(), inner.loaded_once)
        };

        if !loaded_once {
            return self.load_page(window.page_number).await;
        }
        if window.is_last_page {
            return Ok(window);
        }
        self.load_page(window.page_number + 1).await
    }

    /// Load the preceding page; no-op on page 1
    pub async fn previous_page(&self) -> Result<PageWindow> {
        let window = self.window().await;
        if window.page_number <= 1 {
            return Ok(window);
        }
        self.load_page(window.page_number - 1).await
    }

    /// Refresh the collection counters. Best-effort: on failure the last
    /// known counters are returned and the failure is only logged.
    pub async fn load_aggregate_count(&self) -> AggregateCount {
        let fetched = self.fetch_count().await;

        let mut inner = self.inner.write().await;
        match fetched {
            Ok(count) => {
                let total_count = count.total_users.unwrap_or(inner.window.total_count);
                inner.aggregate = AggregateCount {
                    total_count,
                    recent_count: count.users_last_24h,
                };
            }
            Err(e) => warn!(error = %e, "failed to load user counters"),
        }
        inner.aggregate
    }

    /// Narrow the loaded page by a case-insensitive substring of email or
    /// display name. Covers the current page only.
    pub async fn filter_locally(&self, query: &str) -> Vec<AdminUser> {
        let needle = query.trim().to_lowercase();
        let inner = self.inner.read().await;

        if needle.is_empty() {
            return inner.window.items.clone();
        }

        inner
            .window
            .items
            .iter()
            .filter(|user| user.matches_lowercase(&needle))
            .cloned()
            .collect()
    }

    async fn fetch_page(&self, page_number: u32) -> Result<PageWindow> {
        let response = self
            .session
            .send_authorized(ApiRequest::get(users_page_path(page_number)))
            .await
            .map_err(into_fetch_error)?;

        if !response.is_success() {
            return Err(ClientError::Fetch(response.describe()));
        }

        let page: UsersPage = response
            .json()
            .map_err(|e| ClientError::Fetch(format!("malformed users page: {}", e)))?;

        PageWindow::from_response(page_number, self.page_size, page)
    }

    async fn fetch_count(&self) -> Result<UsersCount> {
        let response = self
            .session
            .send_authorized(ApiRequest::get(USERS_COUNT_PATH))
            .await
            .map_err(into_fetch_error)?;

        if !response.is_success() {
            return Err(ClientError::Fetch(response.describe()));
        }

        response
            .json()
            .map_err(|e| ClientError::Fetch(format!("malformed user counters: {}", e)))
    }
}

/// Session expiry inside a data fetch becomes `Authorization`; everything
/// else becomes `Fetch`
fn into_fetch_error(e: ClientError) -> ClientError {
    match e {
        ClientError::SessionExpired | ClientError::Authorization => ClientError::Authorization,
        ClientError::Fetch(msg) | ClientError::Transport(msg) => ClientError::Fetch(msg),
        other => ClientError::Fetch(other.to_string()),
    }
}
