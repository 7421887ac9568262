//! The client for the expense service that persists expenses.
//!
//! Each call is a single request with no retries. Failures are returned as
//! [Error::FetchError] or [Error::SubmissionError] for the caller to report.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};

use crate::{Error, endpoints};

use super::core::{Expense, NewExpense};

/// The operations the app needs from the expense service.
#[async_trait]
pub trait ExpenseClient: std::fmt::Debug + Send + Sync {
    /// Fetch every expense the service knows about.
    async fn fetch_expenses(&self) -> Result<Vec<Expense>, Error>;

    /// Create `expense` and return the stored record.
    async fn create_expense(&self, expense: &NewExpense) -> Result<Expense, Error>;
}

/// Settings for [HttpExpenseClient].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiClientConfig {
    /// The scheme, host and port of the expense service, e.g. "http://localhost:5000".
    pub base_url: String,
    /// The request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            timeout: None,
        }
    }
}

/// An [ExpenseClient] that talks JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpExpenseClient {
    client: Client,
    expenses_url: String,
}

impl HttpExpenseClient {
    /// Create a client for the service described by `config`.
    ///
    /// # Errors
    /// Returns an error if the base URL is not an absolute HTTP(S) URL or the
    /// HTTP client cannot be built.
    pub fn new(config: &ApiClientConfig) -> Result<Self, Error> {
        let base_url = config.base_url.trim_end_matches('/');

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::InvalidApiUrl(config.base_url.clone()));
        }

        let expenses_url = format!("{base_url}{}", endpoints::EXPENSES_API);
        reqwest::Url::parse(&expenses_url)
            .map_err(|_| Error::InvalidApiUrl(config.base_url.clone()))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|error| Error::HttpClientError(error.to_string()))?;

        Ok(Self {
            client,
            expenses_url,
        })
    }

    /// The URL of the expense collection.
    pub fn expenses_url(&self) -> &str {
        &self.expenses_url
    }
}

#[async_trait]
impl ExpenseClient for HttpExpenseClient {
    async fn fetch_expenses(&self) -> Result<Vec<Expense>, Error> {
        tracing::debug!("GET {}", self.expenses_url);

        let response = self
            .client
            .get(&self.expenses_url)
            .send()
            .await
            .map_err(|error| Error::FetchError(error.to_string()))?;
        let response = check_status(response).await.map_err(Error::FetchError)?;

        let records = response
            .json::<Vec<serde_json::Value>>()
            .await
            .map_err(|error| Error::FetchError(format!("invalid response body: {error}")))?;
        let expenses = decode_expenses(records);

        tracing::debug!("fetched {} expenses", expenses.len());

        Ok(expenses)
    }

    async fn create_expense(&self, expense: &NewExpense) -> Result<Expense, Error> {
        tracing::debug!("POST {}", self.expenses_url);

        let response = self
            .client
            .post(&self.expenses_url)
            .json(expense)
            .send()
            .await
            .map_err(|error| Error::SubmissionError(error.to_string()))?;
        let response = check_status(response)
            .await
            .map_err(Error::SubmissionError)?;

        let created = response
            .json::<Expense>()
            .await
            .map_err(|error| Error::SubmissionError(format!("invalid response body: {error}")))?;

        tracing::debug!("expense service stored expense {}", created.id);

        Ok(created)
    }
}

/// Decode each record on its own, skipping the ones that are not valid expenses.
fn decode_expenses(records: Vec<serde_json::Value>) -> Vec<Expense> {
    records
        .into_iter()
        .filter_map(|record| {
            serde_json::from_value::<Expense>(record)
                .inspect_err(|error| tracing::warn!("skipping undecodable expense record: {error}"))
                .ok()
        })
        .collect()
}

/// Pass through successful responses, otherwise describe the failure with the
/// status and the start of the body.
async fn check_status(response: Response) -> Result<Response, String> {
    const BODY_EXCERPT_LIMIT: usize = 200;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let excerpt = body.chars().take(BODY_EXCERPT_LIMIT).collect::<String>();

    Err(format!("expense service responded with {status}: {excerpt}"))
}
