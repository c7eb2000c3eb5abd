//! Overpass API client with retry and exponential backoff.

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::query::build_query;
use super::retry::{FailureKind, RetryPolicy, RetryState, Sleeper, TokioSleeper};
use crate::config::{CategoryConfig, OverpassConfig, RegionConfig};

const USER_AGENT: &str = "poi-harvest/0.1 (overpass points-of-interest export)";

#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-retryable status; the body is kept for the log
    #[error("client error {status}: {body}")]
    Client { status: StatusCode, body: String },

    #[error("max retries exceeded after {attempts} attempts (last error: {last_error})")]
    RetriesExhausted { attempts: u32, last_error: String },
}

/// Status and body of one HTTP exchange
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Sends one query and returns the raw response. `Err` means the exchange
/// itself failed (connection, timeout, truncated body).
#[allow(async_fn_in_trait)]
pub trait QueryTransport {
    async fn post(&self, query: &str) -> Result<TransportResponse>;
}

/// reqwest-backed transport posting to a fixed endpoint
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &OverpassConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

impl QueryTransport for HttpTransport {
    async fn post(&self, query: &str) -> Result<TransportResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .body(query.to_string())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}

/// Overpass client
pub struct OverpassClient<T = HttpTransport, S = TokioSleeper> {
    transport: T,
    sleeper: S,
    policy: RetryPolicy,
}

impl OverpassClient {
    pub fn from_config(config: &OverpassConfig) -> Result<Self> {
        Ok(Self::new(
            HttpTransport::new(config)?,
            TokioSleeper,
            RetryPolicy::from_config(config),
        ))
    }
}

impl<T: QueryTransport, S: Sleeper> OverpassClient<T, S> {
    pub fn new(transport: T, sleeper: S, policy: RetryPolicy) -> Self {
        Self {
            transport,
            sleeper,
            policy,
        }
    }

    /// Fetch every element in `region` matching any of `category`'s tags
    pub async fn fetch(
        &self,
        region: &RegionConfig,
        category: &CategoryConfig,
    ) -> Result<Value, FetchError> {
        let query = build_query(region.area_id, &category.tags);
        debug!("Query has {} tag conditions", category.tags.len());
        self.execute(&query).await
    }

    /// Run a query, retrying 5xx/429 and transport failures.
    pub async fn execute(&self, query: &str) -> Result<Value, FetchError> {
        let mut state = RetryState::new(self.policy);
        let mut last_error = String::from("no attempt made");

        while state.has_attempts_left() {
            info!(
                "Making request (attempt {}/{})...",
                state.attempt_number(),
                state.max_attempts()
            );

            // A 200 with an unparseable body is retried like a dropped connection
            let failure = match self.transport.post(query).await {
                Ok(response) if response.status == StatusCode::OK => {
                    match serde_json::from_str::<Value>(&response.body) {
                        Ok(document) => return Ok(document),
                        Err(e) => format!("invalid JSON in response: {}", e),
                    }
                }
                Ok(response) if is_retryable(response.status) => {
                    last_error = format!("status {}", response.status);
                    if let Some(delay) = state.record_failure(FailureKind::Server) {
                        warn!(
                            "Server/rate limit error {}, retrying in {}s...",
                            response.status,
                            delay.as_secs_f64()
                        );
                        self.sleeper.sleep(delay).await;
                    }
                    continue;
                }
                Ok(response) => {
                    warn!("Client error {}: {}", response.status, response.body);
                    return Err(FetchError::Client {
                        status: response.status,
                        body: response.body,
                    });
                }
                Err(e) => e.to_string(),
            };

            warn!("Request failed: {}", failure);
            last_error = failure;
            match state.record_failure(FailureKind::Transport) {
                Some(delay) => {
                    warn!("Retrying in {}s...", delay.as_secs_f64());
                    self.sleeper.sleep(delay).await;
                }
                None => break,
            }
        }

        Err(FetchError::RetriesExhausted {
            attempts: state.attempts_made(),
            last_error,
        })
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}
