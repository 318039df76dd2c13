use std::sync::atomic::{AtomicU64, Ordering};

use shared::{
    domain::{Bill, BillId, BillStatus, ExpenseType, User},
    protocol::{CreateBillRequest, FileUploadForm, UpdateBillRequest},
};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::{ContainerConfig, ContainerError};
use crate::{
    config::UploadPolicy,
    dom::{FileInput, NewBillForm},
    format::parse_date,
    routes::Route,
};

/// Receipt accepted by the store, ready to be attached to the bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedReceipt {
    pub file_url: String,
    pub key: BillId,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewBillState {
    Idle,
    FileSelected { file_name: String },
    FileUploading { file_name: String },
    FileReady(UploadedReceipt),
    Submitting,
    Done,
    Error(ContainerError),
}

struct NewBillInner {
    state: NewBillState,
    receipt: Option<UploadedReceipt>,
    submitted: Option<Bill>,
}

/// New bill form: receipt upload and fire-and-forget submission.
pub struct NewBill {
    config: ContainerConfig,
    policy: UploadPolicy,
    user: Option<User>,
    upload_generation: AtomicU64,
    inner: Mutex<NewBillInner>,
}

impl NewBill {
    pub fn new(config: ContainerConfig, policy: UploadPolicy) -> Self {
        let user = config.session.current_user();
        if user.as_ref().and_then(|u| u.email.as_ref()).is_none() {
            warn!("new bill: session has no email; bills will be sent without owner");
        }
        Self {
            config,
            policy,
            user,
            upload_generation: AtomicU64::new(0),
            inner: Mutex::new(NewBillInner {
                state: NewBillState::Idle,
                receipt: None,
                submitted: None,
            }),
        }
    }

    pub async fn state(&self) -> NewBillState {
        self.inner.lock().await.state.clone()
    }

    /// Receipt of the latest successful upload, if it is still current.
    pub async fn receipt(&self) -> Option<UploadedReceipt> {
        self.inner.lock().await.receipt.clone()
    }

    /// Bill handed to the store by the last submission.
    pub async fn submitted(&self) -> Option<Bill> {
        self.inner.lock().await.submitted.clone()
    }

    fn email(&self) -> String {
        self.user
            .as_ref()
            .and_then(|user| user.email.clone())
            .unwrap_or_default()
    }

    async fn set_state(&self, state: NewBillState) {
        self.inner.lock().await.state = state;
    }

    pub async fn handle_change_file(
        &self,
        input: &mut FileInput,
    ) -> Result<UploadedReceipt, ContainerError> {
        let generation = self.upload_generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut inner = self.inner.lock().await;
            inner.receipt = None;
        }

        let Some(file) = input.first().cloned() else {
            self.set_state(NewBillState::Idle).await;
            return Err(ContainerError::UploadFailed("no file selected".into()));
        };
        let file_name = file.display_name().to_string();
        self.set_state(NewBillState::FileSelected {
            file_name: file_name.clone(),
        })
        .await;

        if !self.policy.allows(&file_name) {
            let err = ContainerError::FileRejected {
                file_name: file_name.clone(),
            };
            warn!(file = %file_name, "new bill: rejected receipt extension");
            input.clear();
            input.set_error(err.to_string());
            self.set_state(NewBillState::Error(err.clone())).await;
            return Err(err);
        }

        let Some(store) = self.config.store.clone() else {
            input.clear();
            self.set_state(NewBillState::Error(ContainerError::MissingStore))
                .await;
            return Err(ContainerError::MissingStore);
        };

        self.set_state(NewBillState::FileUploading {
            file_name: file_name.clone(),
        })
        .await;
        let request = CreateBillRequest::new(FileUploadForm {
            file: file.into_receipt(),
            email: self.email(),
        });

        let outcome = store.bills().create(request).await;

        if self.upload_generation.load(Ordering::SeqCst) != generation {
            info!(file = %file_name, "new bill: discarding superseded upload result");
            return Err(ContainerError::UploadFailed(
                "superseded by a newer file selection".into(),
            ));
        }

        match outcome {
            Ok(created) => {
                let receipt = UploadedReceipt {
                    file_url: created.file_url,
                    key: created.key,
                    file_name,
                };
                info!(key = %receipt.key, file = %receipt.file_name, "new bill: receipt uploaded");
                let mut inner = self.inner.lock().await;
                inner.receipt = Some(receipt.clone());
                inner.state = NewBillState::FileReady(receipt.clone());
                Ok(receipt)
            }
            Err(err) => {
                error!(error = %err, file = %file_name, "new bill: receipt upload failed");
                let err = ContainerError::UploadFailed(err.to_string());
                input.clear();
                self.set_state(NewBillState::Error(err.clone())).await;
                Err(err)
            }
        }
    }

    /// Issues the update and navigates to the list without waiting for it.
    pub async fn handle_submit(&self, form: &NewBillForm) -> Result<(), ContainerError> {
        let receipt = {
            let mut inner = self.inner.lock().await;
            inner.state = NewBillState::Submitting;
            inner.receipt.clone()
        };

        let prepared = self.build_bill(form, receipt.as_ref()).and_then(|bill| {
            UpdateBillRequest::for_bill(&bill, receipt.map(|r| r.key))
                .map(|request| (bill, request))
                .map_err(|err| ContainerError::SubmitFailed(err.to_string()))
        });
        let (bill, request) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => {
                warn!(error = %err, "new bill: form rejected");
                self.set_state(NewBillState::Error(err.clone())).await;
                return Err(err);
            }
        };

        match self.config.store.clone() {
            Some(store) => {
                let bills = store.bills();
                tokio::spawn(async move {
                    match bills.update(request).await {
                        Ok(stored) => info!(id = ?stored.id, "new bill: bill stored"),
                        Err(err) => error!(
                            error = %ContainerError::SubmitFailed(err.to_string()),
                            "new bill: late submission failure"
                        ),
                    }
                });
            }
            None => warn!("new bill: no store configured; bill was not sent"),
        }

        {
            let mut inner = self.inner.lock().await;
            inner.submitted = Some(bill);
            inner.state = NewBillState::Done;
        }
        (self.config.navigate)(Route::Bills);
        Ok(())
    }

    fn build_bill(
        &self,
        form: &NewBillForm,
        receipt: Option<&UploadedReceipt>,
    ) -> Result<Bill, ContainerError> {
        let expense_type: ExpenseType =
            form.expense_type
                .parse()
                .map_err(|_| ContainerError::InvalidField {
                    field: "type",
                    value: form.expense_type.clone(),
                })?;
        let amount = form
            .amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite())
            .ok_or_else(|| ContainerError::InvalidField {
                field: "amount",
                value: form.amount.clone(),
            })?;
        parse_date(&form.date).map_err(|_| ContainerError::InvalidField {
            field: "date",
            value: form.date.clone(),
        })?;
        let pct = form
            .pct
            .trim()
            .parse::<i64>()
            .unwrap_or(self.policy.default_vat_pct);

        Ok(Bill {
            id: None,
            email: Some(self.email()),
            expense_type: expense_type.label().to_string(),
            name: form.name.clone(),
            amount,
            date: form.date.trim().to_string(),
            vat: form.vat.trim().to_string(),
            pct,
            commentary: form.commentary.clone(),
            file_url: receipt.map(|r| r.file_url.clone()),
            file_name: receipt.map(|r| r.file_name.clone()),
            status: BillStatus::Pending.as_str().to_string(),
        })
    }
}

#[cfg(test)]
#[path = "tests/new_bill_tests.rs"]
mod tests;
