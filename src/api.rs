//! Results API client.
//!
//! Two endpoints under the configured base URL:
//! `GET {base}/results/results/` lists recent draws and
//! `POST {base}/results/get-by-unique-id/` returns one full result.
//! Both answer `{"status": "success", ...}`; anything else is a malformed
//! response. There are no retries.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

use crate::model::{Amount, DrawDate, LotteryResult};
use crate::normalize::{self, check_status, non_blank_str, parse_amount};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_ms: 30_000,
            user_agent: format!("klbulletin/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// One entry of the result list.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSummary {
    pub unique_id: String,
    pub lottery_name: Option<String>,
    pub draw_number: Option<String>,
    pub date: DrawDate,
    pub first_prize_amount: Option<Amount>,
}

pub struct ResultsClient {
    client: Client,
    config: ApiConfig,
    list_url: Url,
    detail_url: Url,
}

impl ResultsClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let base = config.base_url.trim_end_matches('/');
        let endpoint = |path: &str| {
            Url::parse(&format!("{}/{}", base, path)).map_err(|e| {
                Error::ConfigError(format!("invalid API base URL `{}`: {}", config.base_url, e))
            })
        };
        let list_url = endpoint("results/results/")?;
        let detail_url = endpoint("results/get-by-unique-id/")?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::NetworkError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            list_url,
            detail_url,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn fetch_list(&self) -> Result<Vec<ResultSummary>> {
        log::debug!("GET {}", self.list_url);
        let res = self.client.get(self.list_url.clone()).send()?;
        let body = Self::json_body(res)?;
        parse_list(&body)
    }

    pub fn fetch_result(&self, unique_id: &str) -> Result<LotteryResult> {
        log::debug!("POST {} unique_id={}", self.detail_url, unique_id);
        let res = self
            .client
            .post(self.detail_url.clone())
            .json(&json!({ "unique_id": unique_id }))
            .send()?;
        let body = Self::json_body(res)?;
        normalize::normalize_envelope(&body)
    }

    fn json_body(res: reqwest::blocking::Response) -> Result<Value> {
        let status = res.status();
        if !status.is_success() {
            return Err(Error::NetworkError(format!(
                "{} answered HTTP {}",
                res.url(),
                status
            )));
        }
        let text = res.text()?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Parse a list-endpoint body. Entries without a `unique_id` are skipped.
pub fn parse_list(body: &Value) -> Result<Vec<ResultSummary>> {
    check_status(body)?;
    let results = body
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::MalformedResult("missing `results`".into()))?;

    Ok(results
        .iter()
        .filter_map(|entry| {
            let unique_id = match entry.get("unique_id") {
                Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
                Some(Value::Number(n)) => n.to_string(),
                _ => return None,
            };
            Some(ResultSummary {
                unique_id,
                lottery_name: non_blank_str(entry.get("lottery_name")),
                draw_number: non_blank_str(entry.get("draw_number")),
                date: entry
                    .get("date")
                    .and_then(Value::as_str)
                    .map(DrawDate::parse)
                    .unwrap_or(DrawDate::Missing),
                first_prize_amount: entry
                    .get("first_prize")
                    .and_then(|p| p.get("amount"))
                    .map(|v| parse_amount(Some(v))),
            })
        })
        .collect())
}
