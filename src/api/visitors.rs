//! Visitor endpoints

use crate::models::{CreatedVisitor, NewVisitor, Visitor};

use super::{ApiClient, ApiResult};

impl ApiClient {
    /// List visitors; today-scoping is left to the caller
    pub(super) async fn visitors(&self) -> ApiResult<Vec<Visitor>> {
        let visitors: Vec<Visitor> = self.get_data(&["visitor"]).await?;
        tracing::debug!(count = visitors.len(), "Fetched visitors");
        Ok(visitors)
    }

    /// Full visitor log
    pub(super) async fn visitor_log(&self) -> ApiResult<Vec<Visitor>> {
        let visitors: Vec<Visitor> = self.get_data(&["index"]).await?;
        tracing::debug!(count = visitors.len(), "Fetched visitor log");
        Ok(visitors)
    }

    /// Single visitor as rendered on the printed receipt
    pub(super) async fn print_data(&self, visitor_id: &str) -> ApiResult<Visitor> {
        self.get_data(&["print-data", visitor_id])
            .await
            .inspect_err(|e| tracing::error!(error = %e, visitor_id, "Failed to fetch print data"))
    }

    pub(super) async fn create_visitor(&self, visitor: &NewVisitor) -> ApiResult<String> {
        let url = self.endpoint(&["create"])?;
        self.send_data::<CreatedVisitor>(self.http.post(url).json(visitor))
            .await
            .map(|created| created.visitor_id)
            .inspect(|visitor_id| tracing::info!(visitor_id = %visitor_id, "Visitor created"))
            .inspect_err(|e| tracing::error!(error = %e, "Failed to submit visitor"))
    }

    pub(super) async fn checkout(&self, visitor_id: &str) -> ApiResult<()> {
        let url = self.endpoint(&["checkout", visitor_id])?;
        self.send_empty(self.http.put(url))
            .await
            .inspect(|_| tracing::info!(visitor_id, "Visitor checked out"))
            .inspect_err(|e| tracing::error!(error = %e, visitor_id, "Failed to check out visitor"))
    }
}
