//! Customer routes - filtered table, chart modal, JSON API
//!
//! Structure:
//! - api.rs: JSON API endpoints
//! - page.rs: Page and HTMX fragment rendering

pub mod api;
pub mod page;

pub use api::{api_customer_daily, api_customer_detail, api_customers};

pub use page::{htmx_customer_chart, htmx_customers_table, page_dashboard};
