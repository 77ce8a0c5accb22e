//! Debounced search-as-you-type with last-request-wins semantics.
//!
//! Each call takes a new sequence token. A call waits out the quiet period,
//! gives up if a newer call arrived meanwhile, and after fetching publishes
//! its result only if it still holds the newest token. A slow response to
//! an older keystroke can therefore never replace a fresher one.
//!
//! The server itself answers each search request independently; this type is
//! for clients embedding the crate (a console backend or CLI) that issue
//! searches as the user types.

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct SearchSession {
    latest: Arc<AtomicU64>,
    debounce: Duration,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SearchSession {
    pub fn new(debounce: Duration) -> Self {
        Self {
            latest: Arc::new(AtomicU64::new(0)),
            debounce,
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Invalidate every pending call, e.g. when the search box closes.
    pub fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    fn is_current(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }

    /// Run `fetch` for `term` unless superseded. Returns `None` for blank
    /// terms and for calls overtaken by a newer one.
    pub async fn search<T, F, Fut>(&self, term: &str, fetch: F) -> Option<T>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = T>,
    {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let term = term.trim();
        if term.is_empty() {
            return None;
        }

        tokio::time::sleep(self.debounce).await;
        if !self.is_current(token) {
            tracing::debug!(token, "search superseded during debounce");
            return None;
        }

        let result = fetch(term.to_string()).await;
        if !self.is_current(token) {
            tracing::debug!(token, "dropping stale search result");
            return None;
        }
        Some(result)
    }
}
