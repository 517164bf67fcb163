//! Core dashboard data and business logic
//!
//! - models: customer/transaction records and the joined view
//! - aggregate: join-and-sum and per-date bucketing
//! - filter: name/amount filters and per-view selection
//! - source: where records are fetched from

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod models;
pub mod source;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

pub use aggregate::{aggregate_by_date, grand_total, organize_transactions};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use filter::{parse_leading_decimal, CustomerFilter, ViewState};
pub use models::{Customer, CustomerSummary, DailyTotal, RecordId, Transaction};
pub use source::{source_from_config, DataSource, FileDataSource, HttpDataSource, SourceRef, StaticDataSource};

use error::{DefaultErrorLogger, ErrorContext, ErrorLogger};

/// Dashboard shared between request handlers
pub type SharedDashboard = Arc<RwLock<Dashboard>>;

/// Loading/error state as shown to the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStatus {
    pub loading: bool,
    pub error: Option<String>,
    /// The transactions fetch of the current load has not settled yet
    pub transactions_pending: bool,
    pub customer_count: usize,
    pub transaction_count: usize,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl DashboardStatus {
    /// Both fetches of the current load have settled
    pub fn is_settled(&self) -> bool {
        !self.loading && !self.transactions_pending
    }
}

/// Totals across every loaded record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub customer_count: usize,
    pub transaction_count: usize,
    pub grand_total: Decimal,
}

/// Chart data for one customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerChart {
    pub customer: CustomerSummary,
    pub daily: Vec<DailyTotal>,
}

/// In-memory dashboard state
///
/// `loading` stays set until the customers fetch settles. A failed customers
/// fetch sets `error`; a failed transactions fetch is only logged.
/// `transactions_pending` tracks the transactions fetch separately.
#[derive(Debug)]
pub struct Dashboard {
    loading: bool,
    transactions_pending: bool,
    error: Option<String>,
    customers: Vec<Customer>,
    transactions: Vec<Transaction>,
    loaded_at: Option<DateTime<Utc>>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    /// Create an empty dashboard in loading state
    pub fn new() -> Self {
        Self {
            loading: true,
            transactions_pending: true,
            error: None,
            customers: Vec::new(),
            transactions: Vec::new(),
            loaded_at: None,
        }
    }

    /// Create a dashboard that already holds records
    pub fn with_records(customers: Vec<Customer>, transactions: Vec<Transaction>) -> Self {
        Self {
            loading: false,
            transactions_pending: false,
            error: None,
            customers,
            transactions,
            loaded_at: Some(Utc::now()),
        }
    }

    /// Wrap in the shared handle used by the web layer
    pub fn into_shared(self) -> SharedDashboard {
        Arc::new(RwLock::new(self))
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Enter loading state ahead of a (re)load
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.transactions_pending = true;
        self.error = None;
    }

    /// Record the outcome of the customers fetch
    pub fn apply_customers(&mut self, result: CoreResult<Vec<Customer>>, source: &str) {
        match result {
            Ok(customers) => {
                log::info!("Loaded {} customers from {}", customers.len(), source);
                self.customers = customers;
                self.error = None;
                self.loaded_at = Some(Utc::now());
            }
            Err(e) => {
                DefaultErrorLogger.log_error(&e, &ErrorContext::new("fetch customers").with_source(source));
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    /// Record the outcome of the transactions fetch
    pub fn apply_transactions(&mut self, result: CoreResult<Vec<Transaction>>, source: &str) {
        match result {
            Ok(transactions) => {
                log::info!("Loaded {} transactions from {}", transactions.len(), source);
                self.transactions = transactions;
            }
            Err(e) => {
                DefaultErrorLogger.log_error(&e, &ErrorContext::new("fetch transactions").with_source(source));
            }
        }
        self.transactions_pending = false;
    }

    /// Fetch both record sets concurrently and apply the results
    pub async fn load(&mut self, source: &dyn DataSource) {
        let name = source.describe();
        let (customers, transactions) = tokio::join!(source.fetch_customers(), source.fetch_transactions());
        self.apply_customers(customers, &name);
        self.apply_transactions(transactions, &name);
    }

    /// Re-enter loading state and load again
    ///
    /// Records from the previous load stay in place for any fetch that fails.
    pub async fn reload(&mut self, source: &dyn DataSource) {
        log::info!("Reloading records from {}", source.describe());
        self.begin_load();
        self.load(source).await;
    }

    /// Every customer joined with its transactions
    pub fn summaries(&self) -> Vec<CustomerSummary> {
        organize_transactions(&self.customers, &self.transactions)
    }

    /// Joined customers passing `filter`
    pub fn filtered(&self, filter: &CustomerFilter) -> Vec<CustomerSummary> {
        filter.apply(self.summaries())
    }

    /// One joined customer
    pub fn customer(&self, id: &RecordId) -> CoreResult<CustomerSummary> {
        let customer = self
            .customers
            .iter()
            .find(|c| &c.id == id)
            .ok_or_else(|| CoreError::CustomerNotFound { id: id.to_string() })?;
        organize_transactions(std::slice::from_ref(customer), &self.transactions)
            .pop()
            .ok_or_else(|| CoreError::CustomerNotFound { id: id.to_string() })
    }

    /// Daily totals for one customer's chart
    pub fn customer_chart(&self, id: &RecordId) -> CoreResult<CustomerChart> {
        let customer = self.customer(id)?;
        let daily = aggregate_by_date(&customer.transactions);
        Ok(CustomerChart { customer, daily })
    }

    /// Select a customer in `view` and return its chart; unknown ids leave nothing selected
    pub fn select(&self, view: &mut ViewState, id: &RecordId) -> Option<CustomerChart> {
        match self.customer_chart(id) {
            Ok(chart) => {
                view.select(id.clone());
                Some(chart)
            }
            Err(_) => {
                view.deselect();
                None
            }
        }
    }

    pub fn status(&self) -> DashboardStatus {
        DashboardStatus {
            loading: self.loading,
            error: self.error.clone(),
            transactions_pending: self.transactions_pending,
            customer_count: self.customers.len(),
            transaction_count: self.transactions.len(),
            loaded_at: self.loaded_at,
        }
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats {
            customer_count: self.customers.len(),
            transaction_count: self.transactions.len(),
            grand_total: grand_total(&self.transactions),
        }
    }
}

/// Reload a shared dashboard from `source`
///
/// The two fetches run concurrently and each result is applied as soon as it
/// arrives, so the loading state ends with the customers fetch even while
/// transactions are still in flight. No lock is held across a fetch.
pub async fn refresh(dashboard: &SharedDashboard, source: &dyn DataSource) {
    dashboard.write().await.begin_load();
    let name = source.describe();

    let customers = async {
        let result = source.fetch_customers().await;
        dashboard.write().await.apply_customers(result, &name);
    };
    let transactions = async {
        let result = source.fetch_transactions().await;
        dashboard.write().await.apply_transactions(result, &name);
    };

    tokio::join!(customers, transactions);
}
