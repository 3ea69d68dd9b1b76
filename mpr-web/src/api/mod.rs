//! HTTP API handlers for mpr-web

pub mod health;
pub mod records;
pub mod registration;
pub mod ui;

pub use health::health_routes;
pub use records::{list_records, mark_found, record_routes};
pub use registration::{registration_routes, submit_registration, RegistrationForm};
pub use ui::page_routes;
