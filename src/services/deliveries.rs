//! Delivery check-in: pending manifest entries and their check-in action

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::{
    api::{ApiResult, KioskApi},
    config::KioskConfig,
    error::{AppError, AppResult},
    models::{delivery::normalize_time, DeliveryManifestEntry, NewVisitor, Visitor, VisitorPurpose},
    services::{pagination::Pagination, InFlight, Navigate},
};

/// Manifest entries with no realized check-in on `today`, sorted by
/// scheduled time (empty times first).
///
/// A manifest entry is realized by a Delivery visitor of the same day with
/// a check-in timestamp and the same driver, plate and normalized time.
pub fn pending_deliveries(
    manifest: Vec<DeliveryManifestEntry>,
    visitors: &[Visitor],
    today: NaiveDate,
) -> Vec<DeliveryManifestEntry> {
    let checked_in: HashSet<(&str, &str, &str)> = visitors
        .iter()
        .filter(|v| {
            v.visitor_date == today
                && v.visitor_needs == VisitorPurpose::Delivery
                && v.visitor_checkin.is_some()
        })
        .map(|v| {
            (
                v.visitor_name.as_str(),
                v.visitor_vehicle.as_str(),
                normalize_time(v.plan_delivery_time.as_deref()),
            )
        })
        .collect();

    let mut pending: Vec<DeliveryManifestEntry> = manifest
        .into_iter()
        .filter(|entry| {
            !checked_in.contains(&(
                entry.driver_name.as_str(),
                entry.plat_number.as_str(),
                entry.normalized_time(),
            ))
        })
        .collect();

    pending.sort_by(|a, b| a.normalized_time().cmp(b.normalized_time()));
    pending
}

/// Delivery check-in screen state
#[derive(Debug)]
pub struct DeliveryCheckIn {
    entries: Vec<DeliveryManifestEntry>,
    loading: bool,
    error: Option<String>,
    /// Manifest ids with a create call in flight
    checking_in: HashSet<String>,
    pagination: Pagination,
    warehouse_host: String,
}

impl DeliveryCheckIn {
    pub fn new(config: &KioskConfig) -> Self {
        Self {
            entries: Vec::new(),
            loading: false,
            error: None,
            checking_in: HashSet::new(),
            pagination: Pagination::new(config.page_size),
            warehouse_host: config.warehouse_host.clone(),
        }
    }

    /// Reload the manifest and today's visitors, then reconcile.
    ///
    /// Both fetches must succeed; on failure the previous list stays.
    pub async fn load<A: KioskApi + ?Sized>(&mut self, api: &A, today: NaiveDate) -> AppResult<()> {
        self.loading = true;
        let mut this = InFlight::new(self, |this: &mut Self| this.loading = false);
        let result = tokio::try_join!(api.fetch_deliveries(), api.fetch_visitors());
        this.loading = false;

        match result {
            Ok((manifest, visitors)) => {
                this.set_pending(pending_deliveries(manifest, &visitors, today));
                this.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load pending deliveries");
                let e = AppError::from(e);
                this.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    fn set_pending(&mut self, entries: Vec<DeliveryManifestEntry>) {
        tracing::debug!(pending = entries.len(), "Pending deliveries reconciled");
        self.entries = entries;
        self.pagination.clamp(self.entries.len());
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// All pending entries in display order
    pub fn entries(&self) -> &[DeliveryManifestEntry] {
        &self.entries
    }

    /// Entries on the current page
    pub fn page_rows(&self) -> &[DeliveryManifestEntry] {
        self.pagination.slice(&self.entries)
    }

    pub fn page(&self) -> usize {
        self.pagination.page()
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.entries.len())
    }

    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.pagination.go_to(page, self.entries.len())
    }

    pub fn first_row_number(&self) -> usize {
        self.pagination.first_row_number()
    }

    /// Whether the check-in action for `no_dn` is disabled
    pub fn is_checking_in(&self, no_dn: &str) -> bool {
        self.checking_in.contains(no_dn)
    }

    /// Lock the entry and build its visitor record. `None` when the entry
    /// is unknown or already being checked in.
    pub fn begin_check_in(&mut self, no_dn: &str, today: NaiveDate) -> Option<NewVisitor> {
        if self.checking_in.contains(no_dn) {
            tracing::debug!(no_dn, "Check-in already in flight");
            return None;
        }
        let entry = self.entries.iter().find(|e| e.no_dn == no_dn)?;

        let visitor = NewVisitor {
            visitor_date: today,
            visitor_name: entry.driver_name.clone(),
            visitor_from: entry.origin().to_string(),
            visitor_host: self.warehouse_host.clone(),
            visitor_needs: VisitorPurpose::Delivery,
            visitor_amount: 1,
            visitor_vehicle: entry.plat_number.clone(),
            department: String::new(),
            plan_delivery_time: Some(entry.normalized_time())
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        };

        self.checking_in.insert(no_dn.to_string());
        self.error = None;
        tracing::info!(no_dn, driver = %visitor.visitor_name, "Delivery check-in started");
        Some(visitor)
    }

    /// Release the entry's lock and turn the create result into a screen change
    pub fn finish_check_in(&mut self, no_dn: &str, result: ApiResult<String>) -> AppResult<Navigate> {
        self.checking_in.remove(no_dn);

        match result {
            Ok(visitor_id) => {
                tracing::info!(no_dn, visitor_id = %visitor_id, "Delivery checked in");
                Ok(Navigate::Receipt { visitor_id })
            }
            Err(e) => {
                tracing::error!(error = %e, no_dn, "Delivery check-in failed");
                let e = AppError::from(e);
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Check in one entry end to end. `Ok(None)` when the entry is locked
    /// or no longer pending.
    pub async fn check_in<A: KioskApi + ?Sized>(
        &mut self,
        api: &A,
        no_dn: &str,
        today: NaiveDate,
    ) -> AppResult<Option<Navigate>> {
        let Some(visitor) = self.begin_check_in(no_dn, today) else {
            return Ok(None);
        };
        let mut this = InFlight::new(self, move |this: &mut Self| {
            this.checking_in.remove(no_dn);
        });
        let result = api.submit_visitor(&visitor).await;
        this.finish_check_in(no_dn, result).map(Some)
    }
}
