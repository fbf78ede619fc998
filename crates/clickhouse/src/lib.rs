//! ClickHouse persistence for the enrolment engine.

pub mod client;
pub mod config;
pub mod health;
pub mod schema;
pub mod store;

pub use client::*;
pub use config::*;
pub use health::{check_connection, init_schema};
pub use store::{ClickHouseStore, EnrolmentRow};
