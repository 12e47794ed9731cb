//! Type-ahead suggestions for the host and origin fields

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::{
    api::{KioskApi, KioskApiExt, MIN_SEARCH_TERM_CHARS},
    config::ApiConfig,
    models::{Employee, Supplier},
};

/// Employees whose name starts with `prefix`, case-insensitive, in list order.
///
/// An empty prefix matches nothing.
pub fn match_employees(prefix: &str, employees: &[Employee]) -> Vec<Employee> {
    if prefix.is_empty() {
        return Vec::new();
    }
    let prefix = prefix.to_lowercase();
    employees
        .iter()
        .filter(|employee| employee.name.to_lowercase().starts_with(&prefix))
        .cloned()
        .collect()
}

/// Visible host suggestions
#[derive(Debug, Clone, Default)]
pub struct HostSuggestions {
    suggestions: Vec<Employee>,
}

impl HostSuggestions {
    pub fn update(&mut self, prefix: &str, employees: &[Employee]) {
        self.suggestions = match_employees(prefix, employees);
    }

    pub fn suggestions(&self) -> &[Employee] {
        &self.suggestions
    }

    /// Take the suggestion at `index` and hide the list
    pub fn select(&mut self, index: usize) -> Option<Employee> {
        if index >= self.suggestions.len() {
            return None;
        }
        let employee = self.suggestions.swap_remove(index);
        self.suggestions.clear();
        Some(employee)
    }

    pub fn clear(&mut self) {
        self.suggestions.clear();
    }
}

/// A pending supplier search, runnable off the UI state
#[derive(Debug)]
pub struct SearchTicket {
    token: u64,
    term: String,
    limit: u32,
    debounce: Duration,
    latest: Arc<AtomicU64>,
}

/// Result of a [`SearchTicket`]; `suppliers` is `None` when the ticket was
/// superseded before its request went out
#[derive(Debug)]
pub struct SearchResponse {
    pub token: u64,
    pub term: String,
    pub suppliers: Option<Vec<Supplier>>,
}

impl SearchTicket {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Still the most recent search issued by its [`SupplierSearch`]
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.token
    }

    /// Wait out the debounce, then query unless a newer search was issued
    pub async fn run<A: KioskApi + ?Sized>(self, api: &A) -> SearchResponse {
        if !self.debounce.is_zero() {
            tokio::time::sleep(self.debounce).await;
        }

        if !self.is_current() {
            tracing::debug!(token = self.token, term = %self.term, "Supplier search superseded before sending");
            return SearchResponse {
                token: self.token,
                term: self.term,
                suppliers: None,
            };
        }

        let suppliers = api.search_suppliers(&self.term, self.limit).await;
        SearchResponse {
            token: self.token,
            term: self.term,
            suppliers: Some(suppliers),
        }
    }
}

/// Remote supplier search where the most recently issued query wins
#[derive(Debug)]
pub struct SupplierSearch {
    latest: Arc<AtomicU64>,
    suggestions: Vec<Supplier>,
    searching: bool,
    limit: u32,
    debounce: Duration,
}

impl SupplierSearch {
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_settings(config.supplier_search_limit, config.search_debounce())
    }

    pub fn with_settings(limit: u32, debounce: Duration) -> Self {
        Self {
            latest: Arc::new(AtomicU64::new(0)),
            suggestions: Vec::new(),
            searching: false,
            limit,
            debounce,
        }
    }

    /// Origin text changed. Returns the search to run, if the text is long
    /// enough. Either way every earlier search becomes stale.
    pub fn input(&mut self, term: &str) -> Option<SearchTicket> {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        if term.chars().count() < MIN_SEARCH_TERM_CHARS {
            self.suggestions.clear();
            self.searching = false;
            return None;
        }

        self.searching = true;
        Some(SearchTicket {
            token,
            term: term.to_string(),
            limit: self.limit,
            debounce: self.debounce,
            latest: Arc::clone(&self.latest),
        })
    }

    /// Apply a finished search. Returns `false` for stale responses, which
    /// leave the visible suggestions untouched.
    pub fn apply(&mut self, response: SearchResponse) -> bool {
        if response.token != self.latest.load(Ordering::SeqCst) {
            tracing::debug!(token = response.token, term = %response.term, "Dropping stale supplier search");
            return false;
        }

        self.searching = false;
        self.suggestions = response.suppliers.unwrap_or_default();
        true
    }

    /// Search indicator: the latest issued search has not resolved yet
    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn suggestions(&self) -> &[Supplier] {
        &self.suggestions
    }

    /// Take the suggestion at `index` and hide the list
    pub fn select(&mut self, index: usize) -> Option<Supplier> {
        if index >= self.suggestions.len() {
            return None;
        }
        let supplier = self.suggestions.swap_remove(index);
        self.reset();
        Some(supplier)
    }

    /// Hide suggestions and invalidate any search in flight
    pub fn reset(&mut self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
        self.suggestions.clear();
        self.searching = false;
    }
}
