//! Store doubles, fixtures and recorders shared by the crate's tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use client_core::{
    save_user, BillsResource, KeyValueStorage, MemoryStorage, SessionReader, StorageSession, Store,
};
use shared::{
    domain::{Bill, BillId, ExpenseType, User, UserType},
    protocol::{CreateBillRequest, CreatedBill, UpdateBillRequest},
};
use tokio::sync::{Mutex, Notify};

use crate::{
    containers::{ContainerConfig, Navigate},
    dom::{Document, HeadlessModal},
    routes::Route,
};

pub(crate) enum UpdateBehavior {
    Succeed,
    Fail(String),
    Never,
}

pub(crate) struct TestBills {
    list_result: std::result::Result<Vec<Bill>, String>,
    create_result: std::result::Result<CreatedBill, String>,
    update_behavior: UpdateBehavior,
    first_create_gate: Option<Arc<Notify>>,
    pub(crate) list_calls: Mutex<u32>,
    pub(crate) creates: Mutex<Vec<CreateBillRequest>>,
    pub(crate) updates: Mutex<Vec<UpdateBillRequest>>,
}

impl TestBills {
    pub(crate) fn ok(bills: Vec<Bill>) -> Self {
        Self {
            list_result: Ok(bills),
            create_result: Ok(CreatedBill {
                file_url: "https://localhost:3456/images/test.jpg".into(),
                key: BillId("1234".into()),
            }),
            update_behavior: UpdateBehavior::Succeed,
            first_create_gate: None,
            list_calls: Mutex::new(0),
            creates: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing_list(err: impl Into<String>) -> Self {
        let mut bills = Self::ok(Vec::new());
        bills.list_result = Err(err.into());
        bills
    }

    pub(crate) fn with_failing_create(mut self, err: impl Into<String>) -> Self {
        self.create_result = Err(err.into());
        self
    }

    /// Holds the first `create` until `gate` is notified.
    pub(crate) fn with_first_create_gate(mut self, gate: Arc<Notify>) -> Self {
        self.first_create_gate = Some(gate);
        self
    }

    pub(crate) fn with_update(mut self, behavior: UpdateBehavior) -> Self {
        self.update_behavior = behavior;
        self
    }
}

#[async_trait]
impl BillsResource for TestBills {
    async fn list(&self) -> Result<Vec<Bill>> {
        *self.list_calls.lock().await += 1;
        self.list_result.clone().map_err(|err| anyhow!(err))
    }

    async fn create(&self, request: CreateBillRequest) -> Result<CreatedBill> {
        let call = {
            let mut creates = self.creates.lock().await;
            creates.push(request);
            creates.len()
        };
        if let (1, Some(gate)) = (call, &self.first_create_gate) {
            gate.notified().await;
        }
        self.create_result.clone().map_err(|err| anyhow!(err))
    }

    async fn update(&self, request: UpdateBillRequest) -> Result<Bill> {
        let data = request.data.clone();
        self.updates.lock().await.push(request);
        match &self.update_behavior {
            UpdateBehavior::Succeed => Ok(serde_json::from_str(&data)?),
            UpdateBehavior::Fail(err) => Err(anyhow!(err.clone())),
            UpdateBehavior::Never => futures::future::pending().await,
        }
    }
}

pub(crate) struct TestStore {
    pub(crate) bills: Arc<TestBills>,
    pub(crate) bills_calls: AtomicUsize,
}

impl TestStore {
    pub(crate) fn new(bills: TestBills) -> Arc<Self> {
        Arc::new(Self {
            bills: Arc::new(bills),
            bills_calls: AtomicUsize::new(0),
        })
    }
}

impl Store for TestStore {
    fn bills(&self) -> Arc<dyn BillsResource> {
        self.bills_calls.fetch_add(1, Ordering::SeqCst);
        self.bills.clone()
    }
}

/// Navigation callback that records every requested route.
pub(crate) fn recording_navigator() -> (Navigate, Arc<std::sync::Mutex<Vec<Route>>>) {
    let routes = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = routes.clone();
    let navigate: Navigate = Arc::new(move |route| {
        sink.lock().expect("navigation log").push(route);
    });
    (navigate, routes)
}

pub(crate) fn session_for(user: Option<User>) -> Arc<dyn SessionReader> {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
    if let Some(user) = user {
        save_user(storage.as_ref(), &user).expect("save user");
    }
    Arc::new(StorageSession::new(storage))
}

pub(crate) fn employee_session() -> Arc<dyn SessionReader> {
    session_for(Some(User::employee("employee@test.com")))
}

pub(crate) fn admin_session() -> Arc<dyn SessionReader> {
    session_for(Some(User {
        user_type: UserType::Admin,
        email: Some("admin@test.com".into()),
        status: None,
    }))
}

pub(crate) struct Harness {
    pub(crate) config: ContainerConfig,
    pub(crate) modal: Arc<HeadlessModal>,
    pub(crate) navigations: Arc<std::sync::Mutex<Vec<Route>>>,
}

pub(crate) fn harness(store: Option<Arc<dyn Store>>) -> Harness {
    let modal = Arc::new(HeadlessModal::new(800));
    let (navigate, navigations) = recording_navigator();
    Harness {
        config: ContainerConfig {
            document: Arc::new(Document::new(modal.clone())),
            navigate,
            store,
            session: employee_session(),
        },
        modal,
        navigations,
    }
}

fn bill(id: &str, expense_type: ExpenseType, name: &str, amount: f64, date: &str, status: &str) -> Bill {
    Bill {
        id: Some(BillId(id.into())),
        email: Some("a@a".into()),
        expense_type: expense_type.label().into(),
        name: name.into(),
        amount,
        date: date.into(),
        vat: "70".into(),
        pct: 20,
        commentary: "séminaire billed".into(),
        file_url: Some(format!("https://test.storage.tld/v0/b/billable/{id}.jpg")),
        file_name: Some(format!("{id}.jpg")),
        status: status.into(),
    }
}

/// Four bills in store order, deliberately not sorted by date.
pub(crate) fn bills() -> Vec<Bill> {
    vec![
        bill("47qAXb6fIm2zOKkLzMro", ExpenseType::Lodging, "encore", 400.0, "2004-04-04", "pending"),
        bill("BeKy5Mo4jkmdfPGYpTxZ", ExpenseType::Transports, "test1", 100.0, "2001-01-01", "refused"),
        bill("UIUZtnPQvnbFnB0ozvJh", ExpenseType::OnlineServices, "test3", 300.0, "2003-03-03", "accepted"),
        bill("qcCK3SzECmaZAGRrHjaC", ExpenseType::Restaurants, "test2", 200.0, "2002-02-02", "refused"),
    ]
}
