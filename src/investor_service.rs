use crate::investor::Investor;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://kaia.loophole.site";
pub const DEFAULT_TIMEOUT: u64 = 15_000;

const LIST_FAILED: &str = "Falha ao carregar investidores";
const GET_FAILED: &str = "Falha ao carregar investidor";

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{message}")]
    Api { status: StatusCode, message: String },
}

/// Remote source of investor records.
#[async_trait]
pub trait InvestorFetcher: Send + Sync {
    async fn fetch_investors(&self, token: &str) -> Result<Vec<Investor>>;
}

pub struct InvestorService {
    base_url: Url,
    client: Client,
}

impl InvestorService {
    pub fn new(base_url: &str, timeout: u64) -> Result<InvestorService> {
        let base_url = Url::parse(base_url).with_context(|| {
            format!(
                "`--base-url` is not a correct absolute URL. Provided value: {}",
                base_url
            )
        })?;

        let client = Client::builder()
            .timeout(Duration::from_millis(timeout))
            .build()
            .context("Failed to create an HTTP client")?;

        Ok(InvestorService { base_url, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    async fn get_json(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        let uri = self.endpoint(path);
        log::debug!("GET {}", uri);

        let response = self
            .client
            .get(&uri)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(token)
            .send()
            .await
            .with_context(|| format!("Couldn't reach out to {}", uri))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read the response of {}", uri))?;

        log::debug!("{} answered with {}", uri, status);

        Ok((status, safe_json(&text)))
    }

    pub async fn get_by_id(&self, token: &str, id: i64) -> Result<Investor> {
        let (status, body) = self.get_json(&format!("investors/{}", id), token).await?;

        if !status.is_success() {
            return Err(api_error(status, &body, GET_FAILED).into());
        }

        let record = match body.get("data") {
            Some(data) if !data.is_null() => data,
            _ => &body,
        };

        Ok(Investor::from_api(record))
    }
}

#[async_trait]
impl InvestorFetcher for InvestorService {
    async fn fetch_investors(&self, token: &str) -> Result<Vec<Investor>> {
        let (status, body) = self.get_json("investors", token).await?;

        if !status.is_success() {
            return Err(api_error(status, &body, LIST_FAILED).into());
        }

        let records = match &body {
            Value::Array(records) => records.as_slice(),
            _ => body
                .get("data")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default(),
        };

        Ok(records.iter().map(Investor::from_api).collect())
    }
}

// Anything that isn't a JSON object or array is treated as an empty object.
fn safe_json(text: &str) -> Value {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => value,
        _ => Value::Object(Map::new()),
    }
}

fn api_error(status: StatusCode, body: &Value, fallback: &str) -> ServiceError {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_owned();

    ServiceError::Api { status, message }
}
