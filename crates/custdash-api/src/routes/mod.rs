//! Route modules for the API server
//!
//! - customers: dashboard page, customer table, charts and customer JSON API
//! - status: loading/error overlay, reload, health and stats

pub mod customers;
pub mod status;
