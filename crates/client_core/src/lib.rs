use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, RequestBuilder, Response,
};
use shared::{
    domain::Bill,
    error::{ApiError, ApiException, ErrorCode},
    protocol::{CreateBillRequest, CreatedBill, UpdateBillRequest},
};
use tracing::{debug, warn};
use url::Url;

pub mod session;

pub use session::{
    save_user, FileStorage, KeyValueStorage, MemoryStorage, SessionReader, StorageSession,
};

pub const DEFAULT_API_URL: &str = "http://localhost:5678";

/// Remote operations on the bills resource.
#[async_trait]
pub trait BillsResource: Send + Sync {
    async fn list(&self) -> Result<Vec<Bill>>;
    /// Uploads a receipt and reserves a bill record for it.
    async fn create(&self, request: CreateBillRequest) -> Result<CreatedBill>;
    async fn update(&self, request: UpdateBillRequest) -> Result<Bill>;
}

pub trait Store: Send + Sync {
    fn bills(&self) -> Arc<dyn BillsResource>;
}

/// Bills API reached over HTTP.
#[derive(Clone)]
pub struct HttpStore {
    bills: Arc<HttpBills>,
}

struct HttpBills {
    http: Client,
    base_url: String,
    token_storage: Option<Arc<dyn KeyValueStorage>>,
}

impl HttpStore {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_token_storage(base_url, None)
    }

    /// Attaches `Authorization: Bearer` from the `jwt` entry of `storage` when present.
    pub fn with_token_storage(
        base_url: &str,
        token_storage: Option<Arc<dyn KeyValueStorage>>,
    ) -> Result<Self> {
        let parsed = Url::parse(base_url).with_context(|| format!("invalid api url '{base_url}'"))?;
        if parsed.cannot_be_a_base() {
            return Err(anyhow!("api url '{base_url}' cannot be used as a base"));
        }

        Ok(Self {
            bills: Arc::new(HttpBills {
                http: Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
                token_storage,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.bills.base_url
    }
}

impl Store for HttpStore {
    fn bills(&self) -> Arc<dyn BillsResource> {
        self.bills.clone()
    }
}

impl HttpBills {
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self
            .token_storage
            .as_ref()
            .and_then(|storage| storage.get_item(session::JWT_KEY));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let api_error = serde_json::from_str::<ApiError>(&body).unwrap_or_else(|_| {
        let message = if body.trim().is_empty() {
            status.to_string()
        } else {
            body
        };
        ApiError::new(ErrorCode::from_status(status.as_u16()), message)
    });
    Err(ApiException::from(api_error).into())
}

#[async_trait]
impl BillsResource for HttpBills {
    async fn list(&self) -> Result<Vec<Bill>> {
        let response = self
            .authorized(self.http.get(format!("{}/bills", self.base_url)))
            .send()
            .await
            .context("failed to reach bills api")?;
        let records: Vec<serde_json::Value> = ensure_success(response)
            .await?
            .json()
            .await
            .context("invalid bills payload")?;
        let received = records.len();
        let bills: Vec<Bill> = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value(record) {
                Ok(bill) => Some(bill),
                Err(err) => {
                    warn!(index, error = %err, "store: skipping unreadable bill record");
                    None
                }
            })
            .collect();
        debug!(count = bills.len(), received, "store: listed bills");
        Ok(bills)
    }

    async fn create(&self, request: CreateBillRequest) -> Result<CreatedBill> {
        if !request.no_content_type {
            warn!("store: multipart upload always sets its own content type");
        }

        let file = request.data.file;
        let part = Part::bytes(file.content)
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)
            .with_context(|| format!("invalid mime type '{}'", file.mime_type))?;
        let form = Form::new()
            .part("file", part)
            .text("email", request.data.email);

        let response = self
            .authorized(self.http.post(format!("{}/bills", self.base_url)))
            .multipart(form)
            .send()
            .await
            .context("failed to reach bills api")?;
        let created: CreatedBill = ensure_success(response)
            .await?
            .json()
            .await
            .context("invalid upload response")?;
        debug!(key = %created.key, file = %file.file_name, "store: uploaded receipt");
        Ok(created)
    }

    async fn update(&self, request: UpdateBillRequest) -> Result<Bill> {
        let selector = request
            .selector
            .ok_or_else(|| anyhow!("bill update requires a selector"))?;
        let response = self
            .authorized(
                self.http
                    .patch(format!("{}/bills/{}", self.base_url, selector.0)),
            )
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(request.data)
            .send()
            .await
            .context("failed to reach bills api")?;
        let bill: Bill = ensure_success(response)
            .await?
            .json()
            .await
            .context("invalid bill payload")?;
        debug!(selector = %selector, "store: updated bill");
        Ok(bill)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
