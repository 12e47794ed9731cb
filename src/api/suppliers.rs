//! Supplier endpoints

use crate::models::Supplier;

use super::{ApiClient, ApiResult};

impl ApiClient {
    /// Full supplier list (`GET /supplier/`, trailing slash included)
    pub(super) async fn suppliers(&self) -> ApiResult<Vec<Supplier>> {
        let suppliers: Vec<Supplier> = self.get_data(&["supplier", ""]).await?;
        tracing::debug!(count = suppliers.len(), "Fetched suppliers");
        Ok(suppliers)
    }

    pub(super) async fn supplier(&self, code: &str) -> ApiResult<Supplier> {
        self.get_data(&["supplier", code]).await
    }

    pub(super) async fn supplier_search(&self, term: &str, limit: u32) -> ApiResult<Vec<Supplier>> {
        let url = self.endpoint(&["supplier", "search"])?;
        let request = self
            .http
            .get(url)
            .query(&[("q", term.to_string()), ("limit", limit.to_string())]);
        let suppliers: Vec<Supplier> = self.send_data(request).await?;
        tracing::debug!(term, count = suppliers.len(), "Supplier search finished");
        Ok(suppliers)
    }
}
