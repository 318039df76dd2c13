use shared::domain::ExpenseType;

use super::{
    escape,
    layout::{vertical_layout, Layout},
};
use crate::{
    dom::{test_ids, Element},
    routes::Route,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBillPage {
    pub layout: Layout,
    pub form: Element,
    pub file_input: Element,
    /// Field handles in form order.
    pub fields: Vec<Element>,
    pub markup: String,
}

const FIELD_IDS: [&str; 7] = [
    test_ids::EXPENSE_TYPE,
    test_ids::EXPENSE_NAME,
    test_ids::DATEPICKER,
    test_ids::AMOUNT,
    test_ids::VAT,
    test_ids::PCT,
    test_ids::COMMENTARY,
];

pub fn new_bill_ui() -> NewBillPage {
    let layout = vertical_layout(Route::NewBill);
    let form = Element::new(test_ids::FORM_NEW_BILL);
    let file_input = Element::new(test_ids::FILE).with_attribute("accept", ".jpg,.jpeg,.png");
    let fields = FIELD_IDS.iter().map(|id| Element::new(*id)).collect();

    let options = ExpenseType::ALL
        .iter()
        .map(|kind| format!("          <option>{}</option>", escape(kind.label())))
        .collect::<Vec<_>>()
        .join("\n");

    let markup = format!(
        r#"<div class="layout">
{}
<div class="content">
  <div class="content-header"><div class="content-title">Envoyer une note de frais</div></div>
  <div class="form-newbill-container content-inner">
    <form data-testid="{}">
      <div class="row">
        <label for="expense-type" class="bold-label">Type de dépense</label>
        <select required class="form-control blue-border" data-testid="{}">
{options}
        </select>
        <label for="expense-name" class="bold-label">Nom de la dépense</label>
        <input type="text" class="form-control blue-border" data-testid="{}" placeholder="Vol Paris Londres" />
        <label for="datepicker" class="bold-label">Date</label>
        <input required type="date" class="form-control blue-border" data-testid="{}" />
        <label for="amount" class="bold-label">Montant TTC </label>
        <input required type="number" class="form-control blue-border input-icon input-icon-right" data-testid="{}" placeholder="348"/>
        <label for="vat" class="bold-label">TVA</label>
        <input type="number" class="form-control blue-border" data-testid="{}" placeholder="70" />
        <input required type="number" class="form-control blue-border" data-testid="{}" placeholder="20" />
        <label for="commentary" class="bold-label">Commentaire</label>
        <textarea class="form-control blue-border" data-testid="{}" rows="3"></textarea>
        <label for="file" class="bold-label">Justificatif</label>
        <input required type="file" accept="{}" class="form-control blue-border" data-testid="{}" />
      </div>
      <button type="submit" id="btn-send-bill" class="btn btn-primary">Envoyer</button>
    </form>
  </div>
</div>
</div>"#,
        layout.markup,
        form.test_id(),
        test_ids::EXPENSE_TYPE,
        test_ids::EXPENSE_NAME,
        test_ids::DATEPICKER,
        test_ids::AMOUNT,
        test_ids::VAT,
        test_ids::PCT,
        test_ids::COMMENTARY,
        file_input.attribute("accept").unwrap_or_default(),
        file_input.test_id(),
    );

    NewBillPage {
        layout,
        form,
        file_input,
        fields,
        markup,
    }
}
