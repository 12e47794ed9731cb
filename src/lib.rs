//! Gatehouse Kiosk
//!
//! Client-side core of the visitor and delivery check-in kiosk: a typed
//! client for the visitor backend plus the state controllers behind the
//! check-in form, the delivery check-in list and the check-out table.

use std::sync::Arc;

use chrono::NaiveDate;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use api::{ApiClient, KioskApi, KioskApiExt};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use services::Navigate;

use services::{
    check_in::CheckInForm, check_out::CheckOutTable, deliveries::DeliveryCheckIn,
    receipt::ReceiptView,
};

/// Calendar day of the kiosk, local time
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Kiosk state shared across all screens
#[derive(Clone)]
pub struct Kiosk {
    pub config: Arc<AppConfig>,
    pub api: Arc<dyn KioskApi>,
}

impl Kiosk {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let api = ApiClient::new(&config.api)?;
        tracing::info!(base_url = %api.base_url(), "Kiosk API client ready");
        Ok(Self::with_api(config, Arc::new(api)))
    }

    pub fn with_api(config: AppConfig, api: Arc<dyn KioskApi>) -> Self {
        Self {
            config: Arc::new(config),
            api,
        }
    }

    /// Load configuration, set up logging and build the API client
    pub fn bootstrap() -> AppResult<Self> {
        let config = AppConfig::load_with_dotenv()?;
        logging::init(&config.logging);
        tracing::info!("Starting Gatehouse Kiosk v{}", env!("CARGO_PKG_VERSION"));
        Self::new(config)
    }

    /// Check-in form with employees loaded for host suggestions
    pub async fn check_in_form(&self, today: NaiveDate) -> CheckInForm {
        let mut form = CheckInForm::new(&self.config, today);
        form.load_employees(self.api.as_ref()).await;
        form
    }

    /// Delivery list reconciled against today's check-ins
    pub async fn delivery_check_in(&self, today: NaiveDate) -> DeliveryCheckIn {
        let mut deliveries = DeliveryCheckIn::new(&self.config.kiosk);
        if let Err(e) = deliveries.load(self.api.as_ref(), today).await {
            tracing::debug!(error = %e, "Delivery list opened with a load error");
        }
        deliveries
    }

    pub async fn check_out_table(&self, today: NaiveDate) -> CheckOutTable {
        let mut table = CheckOutTable::new(&self.config.kiosk);
        table.load(self.api.as_ref(), today).await;
        table
    }

    pub async fn receipt(&self, visitor_id: &str) -> ReceiptView {
        ReceiptView::load(self.api.as_ref(), visitor_id).await
    }
}
