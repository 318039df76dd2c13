use chrono::NaiveDate;
use shared::domain::Bill;

use super::{
    escape,
    layout::{vertical_layout, Layout},
};
use crate::{
    dom::{test_ids, Element, BILL_URL_ATTRIBUTE},
    routes::Route,
};

/// A bill prepared for the list: display labels plus the date used for ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct BillRow {
    pub bill: Bill,
    pub date: String,
    pub status: String,
    pub sort_date: Option<NaiveDate>,
}

impl BillRow {
    /// Row showing the fields exactly as stored.
    pub fn raw(bill: Bill) -> Self {
        Self {
            date: bill.date.clone(),
            status: bill.status.clone(),
            sort_date: bill.parsed_date(),
            bill,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BillsPage {
    pub layout: Layout,
    pub new_bill_button: Element,
    /// One icon per row, in display order.
    pub eye_icons: Vec<Element>,
    /// Rows in display order.
    pub rows: Vec<BillRow>,
    pub markup: String,
}

/// Most recent first. Undated rows go last; ties keep their fetch order.
pub fn sort_for_display(rows: &mut [BillRow]) {
    rows.sort_by(|a, b| b.sort_date.cmp(&a.sort_date));
}

fn eye_icon(bill: &Bill) -> Element {
    let icon = Element::new(test_ids::ICON_EYE);
    match &bill.file_url {
        Some(url) => icon.with_attribute(BILL_URL_ATTRIBUTE, url.clone()),
        None => icon,
    }
}

fn row_markup(row: &BillRow, icon: &Element) -> String {
    let url_attribute = icon
        .attribute(BILL_URL_ATTRIBUTE)
        .map(|url| format!(r#" {BILL_URL_ATTRIBUTE}="{}""#, escape(url)))
        .unwrap_or_default();
    format!(
        r#"    <tr>
      <td>{}</td>
      <td>{}</td>
      <td>{}</td>
      <td>{} €</td>
      <td>{}</td>
      <td><div class="icon-actions"><div id="eye" data-testid="{}"{url_attribute}>eye</div></div></td>
    </tr>"#,
        escape(&row.bill.expense_type),
        escape(&row.bill.name),
        escape(&row.date),
        row.bill.amount,
        escape(&row.status),
        icon.test_id(),
    )
}

fn modal_markup() -> &'static str {
    r#"<div class="modal fade" id="modaleFile" tabindex="-1" role="dialog">
  <div class="modal-dialog modal-dialog-centered modal-lg" role="document">
    <div class="modal-content">
      <div class="modal-header"><h5 class="modal-title">Justificatif</h5></div>
      <div class="modal-body"></div>
    </div>
  </div>
</div>"#
}

pub fn bills_ui(rows: &[BillRow]) -> BillsPage {
    let mut rows = rows.to_vec();
    sort_for_display(&mut rows);

    let layout = vertical_layout(Route::Bills);
    let new_bill_button = Element::new(test_ids::BTN_NEW_BILL);
    let eye_icons: Vec<Element> = rows.iter().map(|row| eye_icon(&row.bill)).collect();
    let table_rows = rows
        .iter()
        .zip(&eye_icons)
        .map(|(row, icon)| row_markup(row, icon))
        .collect::<Vec<_>>()
        .join("\n");

    let markup = format!(
        r#"<div class="layout">
{}
<div class="content">
  <div class="content-header">
    <div class="content-title">Mes notes de frais</div>
    <button type="button" data-testid="{}" class="btn btn-primary">Nouvelle note de frais</button>
  </div>
  <div id="data-table">
  <table id="example" class="table table-striped">
    <thead><tr><th>Type</th><th>Nom</th><th>Date</th><th>Montant</th><th>Statut</th><th>Actions</th></tr></thead>
    <tbody data-testid="tbody">
{table_rows}
    </tbody>
  </table>
  </div>
</div>
{}
</div>"#,
        layout.markup,
        new_bill_button.test_id(),
        modal_markup(),
    );

    BillsPage {
        layout,
        new_bill_button,
        eye_icons,
        rows,
        markup,
    }
}
