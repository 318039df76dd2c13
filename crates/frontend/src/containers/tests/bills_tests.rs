use std::sync::{atomic::Ordering, Arc};

use client_core::Store;

use super::*;
use crate::{
    dom::test_ids,
    test_support::{bills, harness, TestBills, TestStore},
    views::bills::bills_ui,
};

#[test]
fn bills_are_displayed_most_recent_first() {
    let rows: Vec<BillRow> = bills().into_iter().map(BillRow::raw).collect();
    let page = bills_ui(&rows);

    let dates: Vec<&str> = page.rows.iter().map(|row| row.date.as_str()).collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);
    assert_eq!(dates, ["2004-04-04", "2003-03-03", "2002-02-02", "2001-01-01"]);

    let positions: Vec<usize> = dates
        .iter()
        .map(|date| page.markup.find(date).expect("date rendered"))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn undated_rows_follow_dated_rows_in_fetch_order() {
    let mut fixtures = bills();
    fixtures[0].date = "bad".into();
    fixtures[2].date = "".into();
    let rows: Vec<BillRow> = fixtures.into_iter().map(BillRow::raw).collect();

    let page = bills_ui(&rows);
    let names: Vec<&str> = page.rows.iter().map(|row| row.bill.name.as_str()).collect();
    assert_eq!(names, ["test2", "test1", "encore", "test3"]);
}

#[test]
fn equal_dates_keep_fetch_order() {
    let mut fixtures = bills();
    for bill in &mut fixtures {
        bill.date = "2020-05-05".into();
    }
    let rows: Vec<BillRow> = fixtures.into_iter().map(BillRow::raw).collect();

    let page = bills_ui(&rows);
    let names: Vec<&str> = page.rows.iter().map(|row| row.bill.name.as_str()).collect();
    assert_eq!(names, ["encore", "test1", "test3", "test2"]);
}

#[test]
fn eye_icons_carry_receipt_urls_in_display_order() {
    let rows: Vec<BillRow> = bills().into_iter().map(BillRow::raw).collect();
    let page = bills_ui(&rows);

    assert_eq!(page.eye_icons.len(), 4);
    assert!(page
        .eye_icons
        .iter()
        .all(|icon| icon.test_id() == test_ids::ICON_EYE));
    assert_eq!(
        page.eye_icons[0].attribute(BILL_URL_ATTRIBUTE),
        Some("https://test.storage.tld/v0/b/billable/47qAXb6fIm2zOKkLzMro.jpg")
    );
    assert!(page.markup.contains(r#"data-testid="btn-new-bill""#));
}

#[tokio::test]
async fn get_bills_fetches_every_bill_from_the_store() {
    let store = TestStore::new(TestBills::ok(bills()));
    let dyn_store: Arc<dyn Store> = store.clone();
    let container = Bills::new(harness(Some(dyn_store)).config);

    let rows = container.get_bills().await.expect("bills");

    assert_eq!(store.bills_calls.load(Ordering::SeqCst), 1);
    assert_eq!(*store.bills.list_calls.lock().await, 1);
    assert_eq!(rows.len(), bills().len());
    let names: Vec<&str> = rows.iter().map(|row| row.bill.name.as_str()).collect();
    assert_eq!(names, ["encore", "test1", "test3", "test2"]);
    assert_eq!(rows[0].date, "4 Avr. 04");
    assert_eq!(rows[0].status, "En attente");
    assert_eq!(rows[1].status, "Refusé");
}

#[tokio::test]
async fn get_bills_without_store_is_empty() {
    let container = Bills::new(harness(None).config);

    let rows = container.get_bills().await.expect("no store is not an error");
    assert!(rows.is_empty());
}

#[tokio::test]
async fn malformed_record_keeps_raw_values_without_breaking_the_list() {
    let mut fixtures = bills();
    fixtures[1].date = "2001-13-45".into();
    fixtures[2].status = "archived".into();
    let store: Arc<dyn Store> = TestStore::new(TestBills::ok(fixtures));
    let container = Bills::new(harness(Some(store)).config);

    let rows = container.get_bills().await.expect("bills");

    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1].date, "2001-13-45");
    assert_eq!(rows[1].status, "Refusé");
    assert_eq!(rows[2].date, "3 Mar. 03");
    assert_eq!(rows[2].status, "archived");
}

#[tokio::test]
async fn unknown_category_and_decimal_amount_are_listed() {
    let mut fixtures = bills();
    fixtures[3].expense_type = "Autre".into();
    fixtures[3].amount = 12.5;
    let store: Arc<dyn Store> = TestStore::new(TestBills::ok(fixtures));
    let container = Bills::new(harness(Some(store)).config);

    let rows = container.get_bills().await.expect("bills");
    let page = bills_ui(&rows);

    assert_eq!(page.rows.len(), 4);
    assert!(page.markup.contains("<td>Autre</td>"));
    assert!(page.markup.contains("<td>12.5 €</td>"));
}

#[tokio::test]
async fn formatted_rows_still_render_most_recent_first() {
    let store: Arc<dyn Store> = TestStore::new(TestBills::ok(bills()));
    let container = Bills::new(harness(Some(store)).config);

    let page = bills_ui(&container.get_bills().await.expect("bills"));

    let dates: Vec<&str> = page.rows.iter().map(|row| row.date.as_str()).collect();
    assert_eq!(dates, ["4 Avr. 04", "3 Mar. 03", "2 Fév. 02", "1 Jan. 01"]);
}

#[tokio::test]
async fn list_failure_is_reported_not_raised() {
    let store: Arc<dyn Store> = TestStore::new(TestBills::failing_list("Erreur 404"));
    let container = Bills::new(harness(Some(store)).config);

    let err = container.get_bills().await.expect_err("list fails");
    assert_eq!(err, ContainerError::ListFailed("Erreur 404".into()));
}

#[test]
fn new_bill_button_navigates_once_per_click() {
    let harness = harness(None);
    let navigations = harness.navigations.clone();
    let container = Bills::new(harness.config);

    container.handle_click_new_bill();
    assert_eq!(*navigations.lock().expect("log"), [Route::NewBill]);

    container.handle_click_new_bill();
    assert_eq!(
        *navigations.lock().expect("log"),
        [Route::NewBill, Route::NewBill]
    );
}

#[test]
fn eye_icon_opens_modal_with_receipt_image() {
    let harness = harness(None);
    let modal = harness.modal.clone();
    let container = Bills::new(harness.config);
    let rows: Vec<BillRow> = bills().into_iter().map(BillRow::raw).collect();
    let page = bills_ui(&rows);

    container.handle_click_icon_eye(&page.eye_icons[0]);

    assert_eq!(modal.shown_count(), 1);
    let content = modal.content().expect("modal content");
    assert!(content.contains(r#"width="400""#));
    assert!(content.contains("47qAXb6fIm2zOKkLzMro.jpg"));
}

#[test]
fn eye_icon_without_receipt_still_opens_modal() {
    let harness = harness(None);
    let modal = harness.modal.clone();
    let container = Bills::new(harness.config);

    container.handle_click_icon_eye(&Element::new(test_ids::ICON_EYE));

    assert_eq!(modal.shown_count(), 1);
    assert!(modal
        .content()
        .expect("modal content")
        .contains("Aucun justificatif"));
}
