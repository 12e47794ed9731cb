//! REST client for the visitor backend
//!
//! [`KioskApi`] is the seam the controllers depend on; every method is
//! fallible and reports a [`RequestError`]. [`KioskApiExt`] layers the read
//! policy on top: listing calls log the failure and yield empty data, since
//! the kiosk treats "no data" as "nothing to show".

pub mod deliveries;
pub mod employees;
pub mod suppliers;
pub mod visitors;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::{
    config::ApiConfig,
    error::RequestError,
    models::{DeliveryManifestEntry, Employee, Envelope, NewVisitor, Supplier, UpdateEmployee, Visitor},
};

/// Result type alias for remote calls
pub type ApiResult<T> = Result<T, RequestError>;

/// Supplier searches with shorter terms are never sent
pub const MIN_SEARCH_TERM_CHARS: usize = 2;

/// Remote operations used by the kiosk
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KioskApi: Send + Sync {
    /// `GET /visitor`
    async fn fetch_visitors(&self) -> ApiResult<Vec<Visitor>>;

    /// `GET /index`
    async fn fetch_all_visitors(&self) -> ApiResult<Vec<Visitor>>;

    /// `GET /print-data/{id}`
    async fn fetch_print_data(&self, visitor_id: &str) -> ApiResult<Visitor>;

    /// `POST /create`, returning the new visitor id
    async fn submit_visitor(&self, visitor: &NewVisitor) -> ApiResult<String>;

    /// `PUT /checkout/{id}`
    async fn checkout_visitor(&self, visitor_id: &str) -> ApiResult<()>;

    async fn fetch_employees(&self) -> ApiResult<Vec<Employee>>;

    async fn create_employee(&self, employee: &Employee) -> ApiResult<()>;

    async fn fetch_employee(&self, nik: &str) -> ApiResult<Employee>;

    async fn update_employee(&self, nik: &str, data: &UpdateEmployee) -> ApiResult<()>;

    async fn delete_employee(&self, nik: &str) -> ApiResult<()>;

    async fn fetch_suppliers(&self) -> ApiResult<Vec<Supplier>>;

    async fn fetch_supplier(&self, code: &str) -> ApiResult<Supplier>;

    /// Server-side search; result order is the server's
    async fn fetch_supplier_search(&self, term: &str, limit: u32) -> ApiResult<Vec<Supplier>>;

    /// Planned deliveries, including ones that already checked in
    async fn fetch_deliveries(&self) -> ApiResult<Vec<DeliveryManifestEntry>>;
}

fn or_empty<T: Default>(result: ApiResult<T>, what: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch {}", what);
            T::default()
        }
    }
}

/// Read calls that swallow failures into empty results
#[async_trait]
pub trait KioskApiExt: KioskApi {
    async fn list_visitors(&self) -> Vec<Visitor> {
        or_empty(self.fetch_visitors().await, "visitors")
    }

    async fn list_all_visitors(&self) -> Vec<Visitor> {
        or_empty(self.fetch_all_visitors().await, "visitor log")
    }

    async fn list_employees(&self) -> Vec<Employee> {
        or_empty(self.fetch_employees().await, "employees")
    }

    async fn list_suppliers(&self) -> Vec<Supplier> {
        or_empty(self.fetch_suppliers().await, "suppliers")
    }

    async fn list_deliveries(&self) -> Vec<DeliveryManifestEntry> {
        or_empty(self.fetch_deliveries().await, "delivery manifest")
    }

    async fn supplier_by_code(&self, code: &str) -> Option<Supplier> {
        match self.fetch_supplier(code).await {
            Ok(supplier) => Some(supplier),
            Err(e) => {
                tracing::warn!(error = %e, code, "Failed to fetch supplier");
                None
            }
        }
    }

    /// Empty without a request when `term` is too short to search
    async fn search_suppliers(&self, term: &str, limit: u32) -> Vec<Supplier> {
        if term.chars().count() < MIN_SEARCH_TERM_CHARS {
            return Vec::new();
        }
        or_empty(self.fetch_supplier_search(term, limit).await, "supplier search")
    }
}

impl<T: KioskApi + ?Sized> KioskApiExt for T {}

/// reqwest implementation of [`KioskApi`]
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| RequestError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(RequestError::InvalidUrl(config.base_url.clone()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL extended with percent-encoded path segments
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RequestError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_data<T: DeserializeOwned>(&self, segments: &[&str]) -> ApiResult<T> {
        let url = self.endpoint(segments)?;
        self.send_data(self.http.get(url)).await
    }

    async fn send_data<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        read_data(request.send().await?).await
    }

    /// Send a request whose success body carries nothing the kiosk needs
    async fn send_empty(&self, request: RequestBuilder) -> ApiResult<()> {
        Self::expect_success(request.send().await?).await.map(drop)
    }

    async fn expect_success(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RequestError::Status { status, body })
    }
}

/// Unwrap the `{ "data": ... }` envelope of a successful response
async fn read_data<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let response = ApiClient::expect_success(response).await?;
    let bytes = response.bytes().await?;
    let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
    Ok(envelope.data)
}

#[async_trait]
impl KioskApi for ApiClient {
    async fn fetch_visitors(&self) -> ApiResult<Vec<Visitor>> {
        self.visitors().await
    }

    async fn fetch_all_visitors(&self) -> ApiResult<Vec<Visitor>> {
        self.visitor_log().await
    }

    async fn fetch_print_data(&self, visitor_id: &str) -> ApiResult<Visitor> {
        self.print_data(visitor_id).await
    }

    async fn submit_visitor(&self, visitor: &NewVisitor) -> ApiResult<String> {
        self.create_visitor(visitor).await
    }

    async fn checkout_visitor(&self, visitor_id: &str) -> ApiResult<()> {
        self.checkout(visitor_id).await
    }

    async fn fetch_employees(&self) -> ApiResult<Vec<Employee>> {
        self.employees().await
    }

    async fn create_employee(&self, employee: &Employee) -> ApiResult<()> {
        self.add_employee(employee).await
    }

    async fn fetch_employee(&self, nik: &str) -> ApiResult<Employee> {
        self.employee_for_edit(nik).await
    }

    async fn update_employee(&self, nik: &str, data: &UpdateEmployee) -> ApiResult<()> {
        self.edit_employee(nik, data).await
    }

    async fn delete_employee(&self, nik: &str) -> ApiResult<()> {
        self.remove_employee(nik).await
    }

    async fn fetch_suppliers(&self) -> ApiResult<Vec<Supplier>> {
        self.suppliers().await
    }

    async fn fetch_supplier(&self, code: &str) -> ApiResult<Supplier> {
        self.supplier(code).await
    }

    async fn fetch_supplier_search(&self, term: &str, limit: u32) -> ApiResult<Vec<Supplier>> {
        self.supplier_search(term, limit).await
    }

    async fn fetch_deliveries(&self) -> ApiResult<Vec<DeliveryManifestEntry>> {
        self.deliveries().await
    }
}

/// Backend that never answers
#[cfg(test)]
pub(crate) struct StalledApi;

#[cfg(test)]
#[async_trait]
impl KioskApi for StalledApi {
    async fn fetch_visitors(&self) -> ApiResult<Vec<Visitor>> {
        std::future::pending().await
    }

    async fn fetch_all_visitors(&self) -> ApiResult<Vec<Visitor>> {
        std::future::pending().await
    }

    async fn fetch_print_data(&self, _visitor_id: &str) -> ApiResult<Visitor> {
        std::future::pending().await
    }

    async fn submit_visitor(&self, _visitor: &NewVisitor) -> ApiResult<String> {
        std::future::pending().await
    }

    async fn checkout_visitor(&self, _visitor_id: &str) -> ApiResult<()> {
        std::future::pending().await
    }

    async fn fetch_employees(&self) -> ApiResult<Vec<Employee>> {
        std::future::pending().await
    }

    async fn create_employee(&self, _employee: &Employee) -> ApiResult<()> {
        std::future::pending().await
    }

    async fn fetch_employee(&self, _nik: &str) -> ApiResult<Employee> {
        std::future::pending().await
    }

    async fn update_employee(&self, _nik: &str, _data: &UpdateEmployee) -> ApiResult<()> {
        std::future::pending().await
    }

    async fn delete_employee(&self, _nik: &str) -> ApiResult<()> {
        std::future::pending().await
    }

    async fn fetch_suppliers(&self) -> ApiResult<Vec<Supplier>> {
        std::future::pending().await
    }

    async fn fetch_supplier(&self, _code: &str) -> ApiResult<Supplier> {
        std::future::pending().await
    }

    async fn fetch_supplier_search(&self, _term: &str, _limit: u32) -> ApiResult<Vec<Supplier>> {
        std::future::pending().await
    }

    async fn fetch_deliveries(&self) -> ApiResult<Vec<DeliveryManifestEntry>> {
        std::future::pending().await
    }
}
