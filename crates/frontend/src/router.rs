//! Route rendering and the navigation queue.

use std::sync::Arc;

use client_core::{SessionReader, Store};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::{
    config::UploadPolicy,
    containers::{Bills, ContainerConfig, Navigate, NewBill},
    dom::Document,
    routes::Route,
    views::{
        bills::{bills_ui, BillsPage},
        error_page, loading_page, login_ui,
        new_bill::{new_bill_ui, NewBillPage},
    },
};

/// What the document currently shows.
#[derive(Clone)]
pub enum Screen {
    Blank,
    Login,
    Loading,
    Bills {
        page: BillsPage,
        container: Arc<Bills>,
    },
    NewBill {
        page: NewBillPage,
        container: Arc<NewBill>,
    },
    Error {
        message: String,
    },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::Login => "login",
            Self::Loading => "loading",
            Self::Bills { .. } => "bills",
            Self::NewBill { .. } => "new_bill",
            Self::Error { .. } => "error",
        }
    }
}

pub struct Router {
    document: Arc<Document>,
    store: Option<Arc<dyn Store>>,
    session: Arc<dyn SessionReader>,
    policy: UploadPolicy,
    queue_tx: mpsc::UnboundedSender<Route>,
    queue_rx: Mutex<mpsc::UnboundedReceiver<Route>>,
    screen: Mutex<Screen>,
}

impl Router {
    pub fn new(
        document: Arc<Document>,
        store: Option<Arc<dyn Store>>,
        session: Arc<dyn SessionReader>,
        policy: UploadPolicy,
    ) -> Self {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        Self {
            document,
            store,
            session,
            policy,
            queue_tx,
            queue_rx: Mutex::new(queue_rx),
            screen: Mutex::new(Screen::Blank),
        }
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    /// Navigation callback that queues the route for [`Router::process_pending`].
    pub fn navigator(&self) -> Navigate {
        let queue_tx = self.queue_tx.clone();
        Arc::new(move |route: Route| match queue_tx.send(route) {
            Ok(()) => debug!(route = %route, "queued navigation"),
            Err(_) => warn!(route = %route, "router dropped; navigation ignored"),
        })
    }

    pub async fn screen(&self) -> Screen {
        self.screen.lock().await.clone()
    }

    /// Renders every queued navigation in order. Returns how many were handled.
    pub async fn process_pending(&self) -> usize {
        let mut handled = 0;
        loop {
            let next = self.queue_rx.lock().await.try_recv().ok();
            let Some(route) = next else {
                return handled;
            };
            self.on_navigate(route).await;
            handled += 1;
        }
    }

    fn container_config(&self) -> ContainerConfig {
        ContainerConfig {
            document: self.document.clone(),
            navigate: self.navigator(),
            store: self.store.clone(),
            session: self.session.clone(),
        }
    }

    async fn show(&self, route: Route, markup: String, screen: Screen) {
        self.document.set_location(route);
        self.document.set_body(markup);
        *self.screen.lock().await = screen;
    }

    pub async fn on_navigate(&self, route: Route) {
        let is_employee = self
            .session
            .current_user()
            .map(|user| user.is_employee())
            .unwrap_or(false);
        if route.requires_employee() && !is_employee {
            info!(route = %route, "no employee session; showing login");
            self.show(Route::Login, login_ui(), Screen::Login).await;
            return;
        }

        info!(route = %route, "navigating");
        match route {
            Route::Login => self.show(route, login_ui(), Screen::Login).await,
            Route::Bills => {
                self.show(route, loading_page(), Screen::Loading).await;
                let container = Arc::new(Bills::new(self.container_config()));
                match container.get_bills().await {
                    Ok(rows) => {
                        let page = bills_ui(&rows);
                        let markup = page.markup.clone();
                        self.show(route, markup, Screen::Bills { page, container })
                            .await;
                    }
                    Err(err) => {
                        let message = err.to_string();
                        self.show(route, error_page(&message), Screen::Error { message })
                            .await;
                    }
                }
            }
            Route::NewBill => {
                let page = new_bill_ui();
                let container = Arc::new(NewBill::new(
                    self.container_config(),
                    self.policy.clone(),
                ));
                let markup = page.markup.clone();
                self.show(route, markup, Screen::NewBill { page, container })
                    .await;
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/router_tests.rs"]
mod tests;
