//! Containers bind page events to the store and the navigator.

use std::sync::Arc;

use client_core::{SessionReader, Store};
use thiserror::Error;

use crate::{dom::Document, routes::Route};

pub mod bills;
pub mod new_bill;

pub use bills::Bills;
pub use new_bill::NewBill;

/// Navigation callback handed to containers.
pub type Navigate = Arc<dyn Fn(Route) + Send + Sync>;

/// Everything a container is bound to when constructed.
#[derive(Clone)]
pub struct ContainerConfig {
    pub document: Arc<Document>,
    pub navigate: Navigate,
    pub store: Option<Arc<dyn Store>>,
    pub session: Arc<dyn SessionReader>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    #[error("failed to list bills: {0}")]
    ListFailed(String),
    #[error("file '{file_name}' rejected: extension not allowed for receipts")]
    FileRejected { file_name: String },
    #[error("receipt upload failed: {0}")]
    UploadFailed(String),
    #[error("bill submission failed: {0}")]
    SubmitFailed(String),
    #[error("invalid value for field '{field}': '{value}'")]
    InvalidField { field: &'static str, value: String },
    #[error("no store configured")]
    MissingStore,
}
