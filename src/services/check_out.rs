//! Check-out table: today's visitors still on site

use std::time::Duration;

use chrono::NaiveDate;

use crate::{
    api::{ApiResult, KioskApi, KioskApiExt},
    config::KioskConfig,
    error::{AppError, AppResult},
    models::{Visitor, VisitorPurpose},
    services::{pagination::Pagination, InFlight, Navigate},
};

/// Purpose dropdown selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PurposeFilter {
    #[default]
    All,
    Only(VisitorPurpose),
}

impl PurposeFilter {
    pub fn matches(&self, visitor: &Visitor) -> bool {
        match self {
            PurposeFilter::All => true,
            PurposeFilter::Only(purpose) => &visitor.visitor_needs == purpose,
        }
    }
}

/// Row highlight, keyed by purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTone {
    Meeting,
    Delivery,
    Contractor,
    Sortir,
    Plain,
}

impl From<&VisitorPurpose> for RowTone {
    fn from(purpose: &VisitorPurpose) -> Self {
        match purpose {
            VisitorPurpose::Meeting => RowTone::Meeting,
            VisitorPurpose::Delivery => RowTone::Delivery,
            VisitorPurpose::Contractor => RowTone::Contractor,
            VisitorPurpose::Sortir => RowTone::Sortir,
            VisitorPurpose::Other(_) => RowTone::Plain,
        }
    }
}

/// Check-out screen state
#[derive(Debug)]
pub struct CheckOutTable {
    /// Active visitors of the day, unfiltered
    visitors: Vec<Visitor>,
    filter: PurposeFilter,
    pagination: Pagination,
    filter_threshold: usize,
    return_home_delay: Duration,
    /// Visitor awaiting confirmation
    prompt: Option<Visitor>,
    checking_out: bool,
    error: Option<String>,
}

impl CheckOutTable {
    pub fn new(config: &KioskConfig) -> Self {
        Self {
            visitors: Vec::new(),
            filter: PurposeFilter::All,
            pagination: Pagination::new(config.page_size),
            filter_threshold: config.filter_threshold,
            return_home_delay: config.return_home_delay(),
            prompt: None,
            checking_out: false,
            error: None,
        }
    }

    /// Reload from the server. A failed fetch shows as an empty table.
    pub async fn load<A: KioskApi + ?Sized>(&mut self, api: &A, today: NaiveDate) {
        let visitors = api.list_visitors().await;
        self.set_visitors(visitors, today);
    }

    /// Keep the visitors active on `today` and re-apply filter and page
    pub fn set_visitors(&mut self, visitors: Vec<Visitor>, today: NaiveDate) {
        self.visitors = visitors
            .into_iter()
            .filter(|v| v.is_active_on(today))
            .collect();

        if !self.shows_filter() && self.filter != PurposeFilter::All {
            self.filter = PurposeFilter::All;
            self.pagination.reset();
        }
        self.pagination.clamp(self.filtered_count());
        tracing::debug!(active = self.visitors.len(), "Check-out table refreshed");
    }

    /// The purpose dropdown is offered only for a busy day
    pub fn shows_filter(&self) -> bool {
        self.visitors.len() >= self.filter_threshold
    }

    pub fn filter(&self) -> &PurposeFilter {
        &self.filter
    }

    /// Change the purpose filter and go back to the first page. Ignored while
    /// the dropdown is hidden.
    pub fn set_filter(&mut self, filter: PurposeFilter) -> bool {
        if !self.shows_filter() {
            return false;
        }
        self.filter = filter;
        self.pagination.reset();
        true
    }

    /// Rows passing the filter, in server order
    pub fn filtered(&self) -> Vec<&Visitor> {
        self.visitors.iter().filter(|v| self.filter.matches(v)).collect()
    }

    fn filtered_count(&self) -> usize {
        self.visitors.iter().filter(|v| self.filter.matches(v)).count()
    }

    /// Rows on the current page
    pub fn page_rows(&self) -> Vec<&Visitor> {
        let filtered = self.filtered();
        self.pagination.slice(&filtered).to_vec()
    }

    pub fn page(&self) -> usize {
        self.pagination.page()
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.filtered_count())
    }

    pub fn go_to_page(&mut self, page: usize) -> usize {
        let count = self.filtered_count();
        self.pagination.go_to(page, count)
    }

    pub fn first_row_number(&self) -> usize {
        self.pagination.first_row_number()
    }

    pub fn row_tone(visitor: &Visitor) -> RowTone {
        RowTone::from(&visitor.visitor_needs)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn prompt(&self) -> Option<&Visitor> {
        self.prompt.as_ref()
    }

    /// Confirm/cancel controls and backdrop dismissal are disabled
    pub fn is_checking_out(&self) -> bool {
        self.checking_out
    }

    /// Open the confirmation prompt for a row
    pub fn select(&mut self, visitor_id: &str) -> bool {
        if self.checking_out {
            return false;
        }
        match self.visitors.iter().find(|v| v.visitor_id == visitor_id) {
            Some(visitor) => {
                self.prompt = Some(visitor.clone());
                self.error = None;
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self) -> bool {
        if self.checking_out || self.prompt.is_none() {
            return false;
        }
        self.prompt = None;
        true
    }

    /// Click outside the prompt
    pub fn dismiss(&mut self) -> bool {
        self.cancel()
    }

    /// Lock the prompt and return the id to check out. `None` with no prompt
    /// open or a checkout already in flight.
    pub fn begin_checkout(&mut self) -> Option<String> {
        if self.checking_out {
            return None;
        }
        let visitor_id = self.prompt.as_ref()?.visitor_id.clone();
        self.checking_out = true;
        tracing::info!(visitor_id = %visitor_id, "Check-out confirmed");
        Some(visitor_id)
    }

    /// Apply the checkout result. On success `visitors` is the reloaded list;
    /// on failure the table is left as it was.
    pub fn finish_checkout(
        &mut self,
        result: ApiResult<()>,
        visitors: Option<Vec<Visitor>>,
        today: NaiveDate,
    ) -> AppResult<Navigate> {
        self.checking_out = false;
        self.prompt = None;

        match result {
            Ok(()) => {
                if let Some(visitors) = visitors {
                    self.set_visitors(visitors, today);
                }
                Ok(Navigate::Home {
                    after: self.return_home_delay,
                })
            }
            Err(e) => {
                let e = AppError::from(e);
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Check out the visitor in the prompt, then reload from the server
    pub async fn confirm<A: KioskApi + ?Sized>(
        &mut self,
        api: &A,
        today: NaiveDate,
    ) -> AppResult<Option<Navigate>> {
        let Some(visitor_id) = self.begin_checkout() else {
            return Ok(None);
        };

        // unlocks the prompt even if this future is dropped mid-request
        let mut table = InFlight::new(self, |table: &mut Self| table.checking_out = false);
        let result = api.checkout_visitor(&visitor_id).await;
        let visitors = match result {
            Ok(()) => Some(api.list_visitors().await),
            Err(_) => None,
        };
        table.finish_checkout(result, visitors, today).map(Some)
    }
}
