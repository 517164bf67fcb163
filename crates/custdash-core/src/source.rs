//! Data sources for customer and transaction records
//!
//! The dashboard only ever reads two JSON arrays. Where they come from is
//! behind the `DataSource` trait:
//! - `HttpDataSource`: the remote endpoint
//! - `FileDataSource`: a local directory with the same two documents
//! - `StaticDataSource`: in-memory records

use async_trait::async_trait;
use custdash_config::{SourceConfig, SourceKind};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::models::{Customer, Transaction};

/// Shared data source reference
pub type SourceRef = Arc<dyn DataSource>;

/// Trait for record sources
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch the customers array
    async fn fetch_customers(&self) -> CoreResult<Vec<Customer>>;

    /// Fetch the transactions array
    async fn fetch_transactions(&self) -> CoreResult<Vec<Transaction>>;

    /// Short description for logs and the status API
    fn describe(&self) -> String;
}

/// Build the data source selected in the configuration
pub fn source_from_config(config: &SourceConfig) -> CoreResult<SourceRef> {
    match config.kind {
        SourceKind::Http => Ok(Arc::new(HttpDataSource::new(config)?)),
        SourceKind::File => {
            let dir = config.data_dir.clone().ok_or_else(|| CoreError::ConfigError {
                message: "source.data_dir is required for the file source".to_string(),
            })?;
            Ok(Arc::new(FileDataSource::new(dir)))
        }
    }
}

fn decode<T: DeserializeOwned>(resource: &str, body: &str) -> CoreResult<Vec<T>> {
    serde_json::from_str(body).map_err(|e| CoreError::DecodeError {
        resource: resource.to_string(),
        message: e.to_string(),
    })
}

// ==================== HTTP ====================

/// Remote JSON endpoint
pub struct HttpDataSource {
    client: reqwest::Client,
    customers_url: String,
    transactions_url: String,
}

impl HttpDataSource {
    pub fn new(config: &SourceConfig) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("custdash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CoreError::ConfigError {
                message: format!("could not build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            customers_url: config.customers_url(),
            transactions_url: config.transactions_url(),
        })
    }

    pub fn customers_url(&self) -> &str {
        &self.customers_url
    }

    pub fn transactions_url(&self) -> &str {
        &self.transactions_url
    }

    async fn get_array<T: DeserializeOwned>(&self, resource: &str, url: &str) -> CoreResult<Vec<T>> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(|e| CoreError::FetchFailed {
            resource: resource.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::BadStatus {
                resource: resource.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| CoreError::FetchFailed {
            resource: resource.to_string(),
            message: e.to_string(),
        })?;
        decode(resource, &body)
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch_customers(&self) -> CoreResult<Vec<Customer>> {
        self.get_array("customers", &self.customers_url).await
    }

    async fn fetch_transactions(&self) -> CoreResult<Vec<Transaction>> {
        self.get_array("transactions", &self.transactions_url).await
    }

    fn describe(&self) -> String {
        format!("http:{}", self.customers_url.rsplit_once('/').map(|(base, _)| base).unwrap_or(&self.customers_url))
    }
}

// ==================== Files ====================

/// Directory holding `customers.json` and `transactions.json`
pub struct FileDataSource {
    dir: PathBuf,
}

impl FileDataSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn read_array<T: DeserializeOwned>(&self, resource: &str) -> CoreResult<Vec<T>> {
        let path = self.dir.join(format!("{}.json", resource));
        log::debug!("Reading {}", path.display());
        let body = tokio::fs::read_to_string(&path).await.map_err(|e| CoreError::FetchFailed {
            resource: resource.to_string(),
            message: format!("{}: {}", path.display(), e),
        })?;
        decode(resource, &body)
    }
}

#[async_trait]
impl DataSource for FileDataSource {
    async fn fetch_customers(&self) -> CoreResult<Vec<Customer>> {
        self.read_array("customers").await
    }

    async fn fetch_transactions(&self) -> CoreResult<Vec<Transaction>> {
        self.read_array("transactions").await
    }

    fn describe(&self) -> String {
        format!("file:{}", self.dir.display())
    }
}

// ==================== In-memory ====================

/// In-memory records; each fetch can be made to fail
#[derive(Debug, Clone, Default)]
pub struct StaticDataSource {
    customers: Vec<Customer>,
    transactions: Vec<Transaction>,
    customers_error: Option<String>,
    transactions_error: Option<String>,
}

impl StaticDataSource {
    pub fn new(customers: Vec<Customer>, transactions: Vec<Transaction>) -> Self {
        Self {
            customers,
            transactions,
            customers_error: None,
            transactions_error: None,
        }
    }

    /// Make the customers fetch fail with `message`
    pub fn with_customers_error(mut self, message: impl Into<String>) -> Self {
        self.customers_error = Some(message.into());
        self
    }

    /// Make the transactions fetch fail with `message`
    pub fn with_transactions_error(mut self, message: impl Into<String>) -> Self {
        self.transactions_error = Some(message.into());
        self
    }
}

#[async_trait]
impl DataSource for StaticDataSource {
    async fn fetch_customers(&self) -> CoreResult<Vec<Customer>> {
        match &self.customers_error {
            Some(message) => Err(CoreError::FetchFailed {
                resource: "customers".to_string(),
                message: message.clone(),
            }),
            None => Ok(self.customers.clone()),
        }
    }

    async fn fetch_transactions(&self) -> CoreResult<Vec<Transaction>> {
        match &self.transactions_error {
            Some(message) => Err(CoreError::FetchFailed {
                resource: "transactions".to_string(),
                message: message.clone(),
            }),
            None => Ok(self.transactions.clone()),
        }
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response on a local port
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}", addr)
    }

    fn http_config(base_url: String) -> SourceConfig {
        SourceConfig {
            base_url,
            timeout_secs: 5,
            ..SourceConfig::default()
        }
    }

    #[tokio::test]
    async fn test_http_source_decodes_customers() {
        let base = serve_once("200 OK", r#"[{"id": 1, "name": "Ahmed Ali"}]"#).await;
        let source = HttpDataSource::new(&http_config(base)).unwrap();
        let customers = source.fetch_customers().await.unwrap();
        assert_eq!(customers, vec![Customer::new(1, "Ahmed Ali")]);
    }

    #[tokio::test]
    async fn test_http_source_reports_bad_status() {
        let base = serve_once("503 Service Unavailable", "[]").await;
        let source = HttpDataSource::new(&http_config(base)).unwrap();
        let err = source.fetch_transactions().await.unwrap_err();
        assert!(matches!(err, CoreError::BadStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_http_source_reports_decode_error() {
        let base = serve_once("200 OK", r#"{"not": "an array"}"#).await;
        let source = HttpDataSource::new(&http_config(base)).unwrap();
        let err = source.fetch_customers().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DecodeError);
    }

    #[tokio::test]
    async fn test_http_source_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = HttpDataSource::new(&http_config(format!("http://{}", addr))).unwrap();
        let err = source.fetch_customers().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::FetchFailed);
    }

    #[test]
    fn test_http_source_urls() {
        let source = HttpDataSource::new(&SourceConfig::default()).unwrap();
        assert_eq!(source.customers_url(), "https://route-json.vercel.app/customers");
        assert_eq!(source.transactions_url(), "https://route-json.vercel.app/transactions");
        assert_eq!(source.describe(), "http:https://route-json.vercel.app");
    }

    #[tokio::test]
    async fn test_file_source_reads_both_documents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("customers.json"), r#"[{"id": 1, "name": "Ahmed Ali"}]"#).unwrap();
        std::fs::write(
            dir.path().join("transactions.json"),
            r#"[{"id": 1, "customer_id": 1, "amount": 1000, "date": "2022-01-01"}]"#,
        )
        .unwrap();

        let source = FileDataSource::new(dir.path());
        assert_eq!(source.fetch_customers().await.unwrap().len(), 1);
        let transactions = source.fetch_transactions().await.unwrap();
        assert_eq!(transactions[0].date, "2022-01-01");
        assert!(source.describe().starts_with("file:"));
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileDataSource::new(dir.path());
        let err = source.fetch_customers().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::FetchFailed);
    }

    #[tokio::test]
    async fn test_static_source_failures() {
        let source = StaticDataSource::new(vec![Customer::new(1, "A")], vec![])
            .with_transactions_error("boom");
        assert_eq!(source.fetch_customers().await.unwrap().len(), 1);
        let err = source.fetch_transactions().await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_source_from_config() {
        let http = source_from_config(&SourceConfig::default()).unwrap();
        assert!(http.describe().starts_with("http:"));

        let file_config = SourceConfig {
            kind: SourceKind::File,
            data_dir: Some(PathBuf::from("./data")),
            ..SourceConfig::default()
        };
        assert_eq!(source_from_config(&file_config).unwrap().describe(), "file:./data");

        let missing_dir = SourceConfig {
            kind: SourceKind::File,
            ..SourceConfig::default()
        };
        assert!(source_from_config(&missing_dir).is_err());
    }
}
