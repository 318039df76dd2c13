//! Employee pages of the Billed expense front end: views, containers and routing.

pub mod config;
pub mod containers;
pub mod dom;
pub mod format;
pub mod router;
pub mod routes;
pub mod views;

pub use config::{load_settings, Settings, UploadPolicy};
pub use containers::{Bills, ContainerConfig, ContainerError, Navigate, NewBill};
pub use router::{Router, Screen};
pub use routes::Route;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
