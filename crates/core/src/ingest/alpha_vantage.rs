use crate::config::Settings;
use crate::ingest::extract;
use crate::ingest::provider::{MarketDataClient, MovingAverageKind};
use anyhow::{Context, Result};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Query-string HTTP client for an Alpha-Vantage-shaped market-data API.
/// Every indicator is one GET against `/query`; the credential only ever
/// enters through `Settings`.
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    req_delay: Duration,
}

impl AlphaVantageClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.require_market_data_api_key()?.to_string();
        let base_url = settings
            .market_data_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("MARKET_DATA_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        // Free-tier keys are heavily rate limited; spacing requests out is
        // the only concession, there is no retry.
        let req_delay_ms = std::env::var("MARKET_DATA_REQ_DELAY_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0);

        Self::new(base_url, api_key, timeout_secs, req_delay_ms)
    }

    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
        req_delay_ms: u64,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build market data http client")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            req_delay: Duration::from_millis(req_delay_ms),
        })
    }

    fn url(&self) -> String {
        format!("{}/query", self.base_url.trim_end_matches('/'))
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<Value> {
        if !self.req_delay.is_zero() {
            tokio::time::sleep(self.req_delay).await;
        }

        let res = self
            .http
            .get(self.url())
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .context("market data request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read market data response")?;
        let body = serde_json::from_str::<Value>(&text)
            .with_context(|| format!("market data response is not valid JSON: {text}"))?;

        if !status.is_success() {
            anyhow::bail!("market data HTTP {status}: {body}");
        }

        Ok(body)
    }
}

#[async_trait::async_trait]
impl MarketDataClient for AlphaVantageClient {
    fn provider_name(&self) -> &'static str {
        "alpha_vantage"
    }

    async fn moving_average(
        &self,
        ticker: &str,
        kind: MovingAverageKind,
        period: u32,
        interval: &str,
    ) -> Result<f64> {
        let function = kind.function();
        let period = period.to_string();
        let body = self
            .query(&[
                ("function", function),
                ("symbol", ticker),
                ("interval", interval),
                ("time_period", period.as_str()),
                ("series_type", "close"),
            ])
            .await?;
        Ok(extract::latest_indicator_value(&body, function)?)
    }

    async fn rsi(&self, ticker: &str, period: u32, interval: &str) -> Result<f64> {
        let period = period.to_string();
        let body = self
            .query(&[
                ("function", "RSI"),
                ("symbol", ticker),
                ("interval", interval),
                ("time_period", period.as_str()),
                ("series_type", "close"),
            ])
            .await?;
        Ok(extract::latest_indicator_value(&body, "RSI")?)
    }

    async fn daily_volumes(&self, ticker: &str, window: usize) -> Result<Vec<f64>> {
        let body = self
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", ticker),
                ("outputsize", "compact"),
            ])
            .await?;
        Ok(extract::recent_daily_volumes(&body, window)?)
    }
}
