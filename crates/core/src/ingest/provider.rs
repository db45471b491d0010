use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovingAverageKind {
    Ema,
    Sma,
}

impl MovingAverageKind {
    /// Remote function name, also the field key inside each series entry.
    pub fn function(&self) -> &'static str {
        match self {
            MovingAverageKind::Ema => "EMA",
            MovingAverageKind::Sma => "SMA",
        }
    }
}

/// Seam for the remote market-data source. One method per indicator query;
/// each call is a single HTTP round trip with no retry.
#[async_trait::async_trait]
pub trait MarketDataClient: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn moving_average(
        &self,
        ticker: &str,
        kind: MovingAverageKind,
        period: u32,
        interval: &str,
    ) -> Result<f64>;

    async fn rsi(&self, ticker: &str, period: u32, interval: &str) -> Result<f64>;

    /// Daily volumes, most recent first, at most `window` entries.
    async fn daily_volumes(&self, ticker: &str, window: usize) -> Result<Vec<f64>>;
}
