//! Printable receipt for a freshly checked-in visitor

use crate::{api::KioskApi, error::AppError, models::Visitor};

#[derive(Debug, Clone, PartialEq)]
pub enum ReceiptView {
    Ready(Visitor),
    /// The lookup failed; holds the message to show
    Failed(String),
}

impl ReceiptView {
    pub async fn load<A: KioskApi + ?Sized>(api: &A, visitor_id: &str) -> Self {
        match api.fetch_print_data(visitor_id).await {
            Ok(visitor) => ReceiptView::Ready(visitor),
            Err(e) => ReceiptView::Failed(AppError::from(e).user_message()),
        }
    }

    pub fn visitor(&self) -> Option<&Visitor> {
        match self {
            ReceiptView::Ready(visitor) => Some(visitor),
            _ => None,
        }
    }

    /// Time of arrival as printed, `HH:MM`
    pub fn check_in_time(&self) -> Option<&str> {
        let checkin = self.visitor()?.visitor_checkin.as_deref()?;
        let time = checkin.rsplit(' ').next().unwrap_or(checkin);
        Some(time.get(..5).unwrap_or(time))
    }
}
