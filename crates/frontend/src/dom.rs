//! Typed view model standing in for DOM queries by `data-testid`.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};

use shared::protocol::ReceiptFile;

use crate::routes::Route;

pub mod test_ids {
    pub const ICON_WINDOW: &str = "icon-window";
    pub const ICON_MAIL: &str = "icon-mail";
    pub const BTN_NEW_BILL: &str = "btn-new-bill";
    pub const ICON_EYE: &str = "icon-eye";
    pub const FORM_NEW_BILL: &str = "form-new-bill";
    pub const EXPENSE_TYPE: &str = "expense-type";
    pub const EXPENSE_NAME: &str = "expense-name";
    pub const DATEPICKER: &str = "datepicker";
    pub const AMOUNT: &str = "amount";
    pub const VAT: &str = "vat";
    pub const PCT: &str = "pct";
    pub const COMMENTARY: &str = "commentary";
    pub const FILE: &str = "file";
}

pub const ACTIVE_ICON_CLASS: &str = "active-icon";
pub const BILL_URL_ATTRIBUTE: &str = "data-bill-url";

/// A rendered element addressed by its test id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    test_id: String,
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
}

impl Element {
    pub fn new(test_id: impl Into<String>) -> Self {
        Self {
            test_id: test_id.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn test_id(&self) -> &str {
        &self.test_id
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn add_class(&mut self, class: impl Into<String>) {
        self.classes.insert(class.into());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    /// `class="..."` attribute text, classes in sorted order.
    pub fn class_list(&self) -> String {
        self.classes.iter().cloned().collect::<Vec<_>>().join(" ")
    }
}

/// A file picked through the receipt input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content,
        }
    }

    /// Browsers report the bare file name, never the directory.
    pub fn display_name(&self) -> &str {
        Path::new(&self.name)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.name)
    }

    pub fn into_receipt(self) -> ReceiptFile {
        let file_name = self.display_name().to_string();
        ReceiptFile {
            file_name,
            mime_type: self.mime_type,
            content: self.content,
        }
    }
}

/// State of the `file` input on the new bill form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInput {
    files: Vec<SelectedFile>,
    error: Option<String>,
}

impl FileInput {
    pub fn with_file(file: SelectedFile) -> Self {
        Self {
            files: vec![file],
            error: None,
        }
    }

    pub fn select(&mut self, file: SelectedFile) {
        self.files = vec![file];
        self.error = None;
    }

    pub fn first(&self) -> Option<&SelectedFile> {
        self.files.first()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Inline message shown under the input.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}

/// Raw values of the new bill form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBillForm {
    pub expense_type: String,
    pub name: String,
    pub date: String,
    pub amount: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
}

impl NewBillForm {
    /// Field value by test id, as a form query would return it.
    pub fn field(&self, test_id: &str) -> Option<&str> {
        let value = match test_id {
            test_ids::EXPENSE_TYPE => &self.expense_type,
            test_ids::EXPENSE_NAME => &self.name,
            test_ids::DATEPICKER => &self.date,
            test_ids::AMOUNT => &self.amount,
            test_ids::VAT => &self.vat,
            test_ids::PCT => &self.pct,
            test_ids::COMMENTARY => &self.commentary,
            _ => return None,
        };
        Some(value.as_str())
    }

    pub fn set_field(&mut self, test_id: &str, value: impl Into<String>) -> bool {
        let slot = match test_id {
            test_ids::EXPENSE_TYPE => &mut self.expense_type,
            test_ids::EXPENSE_NAME => &mut self.name,
            test_ids::DATEPICKER => &mut self.date,
            test_ids::AMOUNT => &mut self.amount,
            test_ids::VAT => &mut self.vat,
            test_ids::PCT => &mut self.pct,
            test_ids::COMMENTARY => &mut self.commentary,
            _ => return false,
        };
        *slot = value.into();
        true
    }
}

/// The receipt preview dialog.
pub trait Modal: Send + Sync {
    fn width(&self) -> u32;
    /// Replaces the dialog body and displays it.
    fn show(&self, content: &str);
}

/// Modal without a screen: remembers what it was asked to display.
pub struct HeadlessModal {
    width: u32,
    state: RwLock<(usize, Option<String>)>,
}

impl HeadlessModal {
    pub fn new(width: u32) -> Self {
        Self {
            width,
            state: RwLock::new((0, None)),
        }
    }

    pub fn shown_count(&self) -> usize {
        self.state.read().unwrap_or_else(PoisonError::into_inner).0
    }

    pub fn content(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .1
            .clone()
    }
}

impl Modal for HeadlessModal {
    fn width(&self) -> u32 {
        self.width
    }

    fn show(&self, content: &str) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.0 += 1;
        state.1 = Some(content.to_string());
    }
}

/// Root document shared by the router and the containers.
pub struct Document {
    body: RwLock<String>,
    location: RwLock<Option<Route>>,
    modal: Arc<dyn Modal>,
}

impl Document {
    pub fn new(modal: Arc<dyn Modal>) -> Self {
        Self {
            body: RwLock::new(String::new()),
            location: RwLock::new(None),
            modal,
        }
    }

    pub fn body(&self) -> String {
        self.body
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_body(&self, markup: impl Into<String>) {
        *self.body.write().unwrap_or_else(PoisonError::into_inner) = markup.into();
    }

    pub fn location(&self) -> Option<Route> {
        *self.location.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_location(&self, route: Route) {
        *self.location.write().unwrap_or_else(PoisonError::into_inner) = Some(route);
    }

    pub fn modal(&self) -> &Arc<dyn Modal> {
        &self.modal
    }
}
