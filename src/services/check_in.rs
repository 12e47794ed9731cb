//! Walk-in check-in form
//!
//! Purpose drives the form's mode. For deliveries the host is pinned to the
//! warehouse and the origin becomes a supplier search; for every other
//! purpose the host is typed with employee suggestions and the origin is
//! free text.

use chrono::NaiveDate;

use crate::{
    api::{ApiResult, KioskApi, KioskApiExt},
    config::AppConfig,
    error::{AppError, AppResult},
    models::{Employee, NewVisitor, Supplier, VisitorForm, VisitorPurpose},
    services::{
        suggestions::{HostSuggestions, SearchResponse, SearchTicket, SupplierSearch},
        InFlight, Navigate,
    },
};

/// Check-in form state
#[derive(Debug)]
pub struct CheckInForm {
    form: VisitorForm,
    employees: Vec<Employee>,
    host_suggestions: HostSuggestions,
    supplier_search: SupplierSearch,
    submitting: bool,
    error: Option<String>,
    warehouse_host: String,
}

impl CheckInForm {
    pub fn new(config: &AppConfig, today: NaiveDate) -> Self {
        Self {
            form: VisitorForm::new(today),
            employees: Vec::new(),
            host_suggestions: HostSuggestions::default(),
            supplier_search: SupplierSearch::new(&config.api),
            submitting: false,
            error: None,
            warehouse_host: config.kiosk.warehouse_host.clone(),
        }
    }

    /// Fetch the employee list used for host suggestions
    pub async fn load_employees<A: KioskApi + ?Sized>(&mut self, api: &A) {
        self.set_employees(api.list_employees().await);
    }

    pub fn set_employees(&mut self, employees: Vec<Employee>) {
        tracing::debug!(count = employees.len(), "Host directory loaded");
        self.employees = employees;
    }

    pub fn form(&self) -> &VisitorForm {
        &self.form
    }

    pub fn is_delivery(&self) -> bool {
        self.form
            .visitor_needs
            .as_ref()
            .is_some_and(VisitorPurpose::is_delivery)
    }

    /// Host is pinned for deliveries
    pub fn is_host_read_only(&self) -> bool {
        self.is_delivery()
    }

    pub fn host_suggestions(&self) -> &[Employee] {
        self.host_suggestions.suggestions()
    }

    pub fn supplier_suggestions(&self) -> &[Supplier] {
        self.supplier_search.suggestions()
    }

    pub fn is_searching_suppliers(&self) -> bool {
        self.supplier_search.is_searching()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.form.visitor_date = date;
    }

    pub fn set_name(&mut self, name: &str) {
        self.form.visitor_name = name.to_string();
    }

    pub fn set_amount(&mut self, amount: u32) {
        self.form.visitor_amount = amount;
    }

    pub fn set_vehicle(&mut self, vehicle: &str) {
        self.form.visitor_vehicle = vehicle.to_string();
    }

    /// Switch purpose and apply the mode change to host, department and origin
    pub fn set_purpose(&mut self, purpose: VisitorPurpose) {
        if purpose.is_delivery() {
            self.form.visitor_host = self.warehouse_host.clone();
            self.form.department.clear();
            self.form.visitor_from.clear();
            self.host_suggestions.clear();
        } else {
            if self.form.visitor_host == self.warehouse_host {
                self.form.visitor_host.clear();
                self.form.department.clear();
            }
            if self.is_delivery() {
                // origin leaves supplier search mode
                self.supplier_search.reset();
            }
        }
        self.form.visitor_needs = Some(purpose);
    }

    /// Host text changed. Ignored in delivery mode; otherwise clears the
    /// department until a suggestion is picked.
    pub fn input_host(&mut self, text: &str) -> bool {
        if self.is_delivery() {
            return false;
        }
        self.form.visitor_host = text.to_string();
        self.form.department.clear();
        self.host_suggestions.update(text, &self.employees);
        true
    }

    /// Take host name and department from the suggestion at `index`
    pub fn select_host(&mut self, index: usize) -> bool {
        match self.host_suggestions.select(index) {
            Some(employee) => {
                self.form.visitor_host = employee.name;
                self.form.department = employee.department;
                true
            }
            None => false,
        }
    }

    /// Origin text changed. In delivery mode this may start a supplier search;
    /// the caller runs the ticket and hands the response to
    /// [`CheckInForm::apply_supplier_search`].
    pub fn input_origin(&mut self, text: &str) -> Option<SearchTicket> {
        self.form.visitor_from = text.to_string();
        if !self.is_delivery() {
            return None;
        }
        self.supplier_search.input(text)
    }

    pub fn apply_supplier_search(&mut self, response: SearchResponse) -> bool {
        self.supplier_search.apply(response)
    }

    /// Use the supplier at `index` as origin
    pub fn select_supplier(&mut self, index: usize) -> bool {
        match self.supplier_search.select(index) {
            Some(supplier) => {
                self.form.visitor_from = supplier.value;
                true
            }
            None => false,
        }
    }

    /// Validate and lock the form for submission. `Ok(None)` while a
    /// submission is already in flight.
    pub fn begin_submit(&mut self, today: NaiveDate) -> AppResult<Option<NewVisitor>> {
        if self.submitting {
            return Ok(None);
        }
        let visitor = match self.form.to_new_visitor(today) {
            Ok(visitor) => visitor,
            Err(errors) => {
                let e = AppError::Validation(errors);
                self.error = Some(e.user_message());
                return Err(e);
            }
        };
        self.submitting = true;
        self.error = None;
        Ok(Some(visitor))
    }

    /// Unlock the form and turn the create result into a screen change.
    /// On failure the form stays as typed.
    pub fn finish_submit(&mut self, result: ApiResult<String>) -> AppResult<Navigate> {
        self.submitting = false;
        match result {
            Ok(visitor_id) => {
                tracing::info!(visitor_id = %visitor_id, "Visitor checked in");
                Ok(Navigate::Receipt { visitor_id })
            }
            Err(e) => {
                tracing::error!(error = %e, "Visitor check-in failed");
                let e = AppError::from(e);
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    pub async fn submit<A: KioskApi + ?Sized>(
        &mut self,
        api: &A,
        today: NaiveDate,
    ) -> AppResult<Option<Navigate>> {
        let Some(visitor) = self.begin_submit(today)? else {
            return Ok(None);
        };
        let mut form = InFlight::new(self, |form: &mut Self| form.submitting = false);
        let result = api.submit_visitor(&visitor).await;
        form.finish_submit(result).map(Some)
    }
}
