use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::AppResult;
use crate::models::Payment;
use crate::services::api_client::ApiClient;

/// A single remote retrieval. Scoping is decided here, at the query
/// boundary: a scoped search hits the category-scoped endpoint, never an
/// unscoped fetch followed by client-side filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Unscoped { term: String },
    CategoryScoped { category_name: String, term: String },
}

impl SearchQuery {
    /// Build the query for a submitted search. A non-empty category name
    /// selects the category-scoped shape; the two shapes are mutually
    /// exclusive per call.
    pub fn new(term: &str, category_name: Option<&str>) -> Self {
        match category_name {
            Some(name) if !name.is_empty() => Self::CategoryScoped {
                category_name: name.to_string(),
                term: term.to_string(),
            },
            _ => Self::Unscoped {
                term: term.to_string(),
            },
        }
    }

    async fn run(&self, client: &ApiClient) -> AppResult<Vec<Payment>> {
        match self {
            Self::Unscoped { term } => client.search_payments(term).await,
            Self::CategoryScoped {
                category_name,
                term,
            } => client.search_payments_by_category(category_name, term).await,
        }
    }
}

/// How a submitted search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The response became the current result list.
    Published,
    /// A newer search was issued before this one resolved; the response was
    /// discarded.
    Superseded,
    /// The retrieval failed; the previously published list is kept.
    Failed,
}

/// Holds the result list the presentation layer displays, across overlapping
/// search submissions.
///
/// Each submission takes a token from a monotonically increasing generation
/// counter and a response is published only while its token is still the
/// latest issued, so a slow early response cannot overwrite a fast later one.
/// A failed retrieval leaves the published list untouched.
pub struct SearchFeed {
    results: RwLock<Vec<Payment>>,
    generation: AtomicU64,
    min_delay: Duration,
}

impl SearchFeed {
    pub fn new() -> Self {
        Self::with_min_delay(Duration::ZERO)
    }

    /// `min_delay` is a floor on how fast a search may resolve, so quick
    /// responses do not flash the loading state. Zero disables it.
    pub fn with_min_delay(min_delay: Duration) -> Self {
        Self {
            results: RwLock::new(Vec::new()),
            generation: AtomicU64::new(0),
            min_delay,
        }
    }

    /// Snapshot of the currently published result list.
    pub fn results(&self) -> Vec<Payment> {
        self.results
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Replace the published list outside of a search, e.g. with the initial
    /// unfiltered listing.
    pub fn seed(&self, payments: Vec<Payment>) {
        if let Ok(mut guard) = self.results.write() {
            *guard = payments;
        }
    }

    /// Run one search: issue exactly one remote retrieval and publish the
    /// response unless it failed or was superseded.
    pub async fn submit(&self, client: &ApiClient, query: SearchQuery) -> SearchOutcome {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(token, ?query, "Search pending");

        let result = if self.min_delay.is_zero() {
            query.run(client).await
        } else {
            let (result, _) = tokio::join!(query.run(client), tokio::time::sleep(self.min_delay));
            result
        };

        match result {
            Ok(payments) => self.publish(token, payments),
            Err(e) => {
                warn!(token, error = %e, "Search failed, keeping previous results");
                SearchOutcome::Failed
            }
        }
    }

    fn publish(&self, token: u64, payments: Vec<Payment>) -> SearchOutcome {
        if token != self.generation.load(Ordering::SeqCst) {
            debug!(token, "Discarding stale search response");
            return SearchOutcome::Superseded;
        }
        if let Ok(mut guard) = self.results.write() {
            *guard = payments;
        }
        debug!(token, "Search results published");
        SearchOutcome::Published
    }
}

impl Default for SearchFeed {
    fn default() -> Self {
        Self::new()
    }
}
