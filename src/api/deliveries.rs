//! Delivery manifest endpoint

use crate::models::DeliveryManifestEntry;

use super::{ApiClient, ApiResult};

impl ApiClient {
    pub(super) async fn deliveries(&self) -> ApiResult<Vec<DeliveryManifestEntry>> {
        let entries: Vec<DeliveryManifestEntry> = self.get_data(&["delivery"]).await?;
        tracing::debug!(count = entries.len(), "Fetched delivery manifest");
        Ok(entries)
    }
}
