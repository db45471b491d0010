use crate::domain::snapshot::IndicatorSnapshot;
use crate::ingest::provider::{MarketDataClient, MovingAverageKind};
use crate::rules::RuleConfig;

/// Fetch the full indicator bundle for one ticker: three sequential queries,
/// no overlap. A failed query degrades that indicator to unavailable so the
/// ticker is disqualified instead of the scan aborting.
pub async fn fetch_snapshot<C>(client: &C, ticker: &str, config: &RuleConfig) -> IndicatorSnapshot
where
    C: MarketDataClient + ?Sized,
{
    let ema = match client
        .moving_average(ticker, MovingAverageKind::Ema, config.ema_period, &config.interval)
        .await
    {
        Ok(v) => Some(v),
        Err(err) => {
            tracing::warn!(ticker, indicator = "ema", error = %err, "indicator unavailable");
            None
        }
    };

    let sma = match client
        .moving_average(ticker, MovingAverageKind::Sma, config.sma_period, &config.interval)
        .await
    {
        Ok(v) => Some(v),
        Err(err) => {
            tracing::warn!(ticker, indicator = "sma", error = %err, "indicator unavailable");
            None
        }
    };

    let rsi = match client.rsi(ticker, config.rsi_period, &config.interval).await {
        Ok(v) => Some(v),
        Err(err) => {
            tracing::warn!(ticker, indicator = "rsi", error = %err, "indicator unavailable");
            None
        }
    };

    let recent_volumes = match client.daily_volumes(ticker, config.volume_window).await {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!(ticker, indicator = "volume", error = %err, "indicator unavailable");
            Vec::new()
        }
    };

    IndicatorSnapshot {
        ticker: ticker.to_string(),
        ema,
        sma,
        rsi,
        recent_volumes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};

    // Serves fixed values but refuses the volume query.
    struct NoVolumesClient;

    #[async_trait::async_trait]
    impl MarketDataClient for NoVolumesClient {
        fn provider_name(&self) -> &'static str {
            "no_volumes"
        }

        async fn moving_average(
            &self,
            _ticker: &str,
            kind: MovingAverageKind,
            _period: u32,
            _interval: &str,
        ) -> Result<f64> {
            Ok(match kind {
                MovingAverageKind::Ema => 105.0,
                MovingAverageKind::Sma => 100.0,
            })
        }

        async fn rsi(&self, _ticker: &str, _period: u32, _interval: &str) -> Result<f64> {
            Ok(35.0)
        }

        async fn daily_volumes(&self, _ticker: &str, _window: usize) -> Result<Vec<f64>> {
            bail!("volume endpoint down")
        }
    }

    #[tokio::test]
    async fn failed_indicator_degrades_to_unavailable() {
        let snapshot = fetch_snapshot(&NoVolumesClient, "TSLA", &RuleConfig::default()).await;
        assert_eq!(snapshot.ema, Some(105.0));
        assert_eq!(snapshot.sma, Some(100.0));
        assert_eq!(snapshot.rsi, Some(35.0));
        assert!(snapshot.recent_volumes.is_empty());
        assert_eq!(snapshot.latest_volume(), None);
    }
}
