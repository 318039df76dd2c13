use serde::{Deserialize, Serialize};

use crate::domain::{Bill, BillId};

/// Receipt file attached to a bill creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptFile {
    pub file_name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

/// Multipart body of `create`: the receipt and its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUploadForm {
    pub file: ReceiptFile,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBillRequest {
    pub data: FileUploadForm,
    /// Let the transport pick the multipart content type and boundary.
    pub no_content_type: bool,
}

impl CreateBillRequest {
    pub fn new(data: FileUploadForm) -> Self {
        Self {
            data,
            no_content_type: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBill {
    pub file_url: String,
    pub key: BillId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBillRequest {
    /// JSON encoded bill.
    pub data: String,
    pub selector: Option<BillId>,
}

impl UpdateBillRequest {
    pub fn for_bill(bill: &Bill, selector: Option<BillId>) -> serde_json::Result<Self> {
        Ok(Self {
            data: serde_json::to_string(bill)?,
            selector,
        })
    }
}
