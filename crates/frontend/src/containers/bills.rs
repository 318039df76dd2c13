use shared::domain::Bill;
use tracing::{debug, info, warn};

use super::{ContainerConfig, ContainerError};
use crate::{
    dom::{Element, BILL_URL_ATTRIBUTE},
    format::{format_date, format_status},
    routes::Route,
    views::escape,
};

pub use crate::views::bills::BillRow;

/// Bills list page: fetch, new bill button, receipt preview.
pub struct Bills {
    config: ContainerConfig,
}

impl Bills {
    pub fn new(config: ContainerConfig) -> Self {
        let user = config.session.current_user();
        debug!(
            has_store = config.store.is_some(),
            email = user.as_ref().and_then(|u| u.email.as_deref()).unwrap_or("<none>"),
            "bills: container bound"
        );
        Self { config }
    }

    /// Rows in store order; an empty list without a store.
    pub async fn get_bills(&self) -> Result<Vec<BillRow>, ContainerError> {
        let Some(store) = &self.config.store else {
            return Ok(Vec::new());
        };

        let bills = store.bills().list().await.map_err(|err| {
            warn!(error = %err, "bills: list failed");
            ContainerError::ListFailed(err.to_string())
        })?;
        info!(count = bills.len(), "bills: fetched");

        Ok(bills.into_iter().map(format_row).collect())
    }

    pub fn handle_click_new_bill(&self) {
        (self.config.navigate)(Route::NewBill);
    }

    pub fn handle_click_icon_eye(&self, icon: &Element) {
        let modal = self.config.document.modal();
        let content = match icon.attribute(BILL_URL_ATTRIBUTE) {
            Some(url) if !url.trim().is_empty() => {
                let width = modal.width() / 2;
                format!(
                    r#"<div style="text-align: center;" class="bill-proof-container"><img width="{width}" src="{}" alt="Bill" /></div>"#,
                    escape(url)
                )
            }
            _ => {
                debug!("bills: preview requested for a bill without receipt");
                r#"<div style="text-align: center;" class="bill-proof-container"><p>Aucun justificatif</p></div>"#
                    .to_string()
            }
        };
        modal.show(&content);
    }
}

/// Formats display fields, keeping the stored value of any field that fails.
pub fn format_row(bill: Bill) -> BillRow {
    let mut row = BillRow::raw(bill);

    match format_date(&row.bill.date) {
        Ok(date) => row.date = date,
        Err(err) => warn!(error = %err, id = ?row.bill.id, "bills: keeping unformatted date"),
    }
    match format_status(&row.bill.status) {
        Ok(status) => row.status = status,
        Err(err) => warn!(error = %err, id = ?row.bill.id, "bills: keeping raw status"),
    }

    row
}

#[cfg(test)]
#[path = "tests/bills_tests.rs"]
mod tests;
