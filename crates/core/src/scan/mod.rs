use crate::domain::recommendation::Recommendation;
use crate::ingest::fetch::fetch_snapshot;
use crate::ingest::provider::MarketDataClient;
use crate::rules::{self, RuleConfig};

/// Walk the ticker universe in list order and return the first ticker that
/// passes every rule. The scan stops at the first hit; later qualifiers are
/// not reported. An empty universe yields `NoOpportunity` without touching
/// the provider.
pub async fn run<C>(client: &C, tickers: &[String], config: &RuleConfig) -> Recommendation
where
    C: MarketDataClient + ?Sized,
{
    if tickers.is_empty() {
        tracing::warn!("ticker universe is empty; nothing to scan");
        return Recommendation::NoOpportunity;
    }

    let total = tickers.len();
    for (idx, ticker) in tickers.iter().enumerate() {
        let snapshot = fetch_snapshot(client, ticker, config).await;
        let verdict = rules::evaluate(&snapshot, config);

        tracing::info!(
            ticker = %ticker,
            scanned = idx + 1,
            total,
            provider = client.provider_name(),
            rsi_ok = verdict.rsi_ok,
            golden_cross = verdict.golden_cross,
            volume_spike = verdict.volume_spike,
            "ticker evaluated"
        );

        if verdict.is_buy() {
            return Recommendation::Buy {
                ticker: ticker.clone(),
            };
        }
    }

    Recommendation::NoOpportunity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::provider::MovingAverageKind;
    use anyhow::{bail, Result};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Canned per-ticker indicator data; `None` simulates a payload whose
    // expected field is missing.
    #[derive(Debug, Clone, Default)]
    struct Quotes {
        ema: Option<f64>,
        sma: Option<f64>,
        rsi: Option<f64>,
        volumes: Option<Vec<f64>>,
    }

    fn passing() -> Quotes {
        Quotes {
            ema: Some(105.0),
            sma: Some(100.0),
            rsi: Some(35.0),
            volumes: Some(vec![400.0, 100.0, 100.0, 100.0]),
        }
    }

    #[derive(Default)]
    struct FakeClient {
        quotes: HashMap<String, Quotes>,
        requests: AtomicUsize,
    }

    impl FakeClient {
        fn with(tickers: &[(&str, Quotes)]) -> Self {
            Self {
                quotes: tickers
                    .iter()
                    .map(|(t, q)| (t.to_string(), q.clone()))
                    .collect(),
                requests: AtomicUsize::new(0),
            }
        }

        fn quotes_for(&self, ticker: &str) -> Result<&Quotes> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            match self.quotes.get(ticker) {
                Some(q) => Ok(q),
                None => bail!("no canned quotes for {ticker}"),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl MarketDataClient for FakeClient {
        fn provider_name(&self) -> &'static str {
            "fake"
        }

        async fn moving_average(
            &self,
            ticker: &str,
            kind: MovingAverageKind,
            _period: u32,
            _interval: &str,
        ) -> Result<f64> {
            let q = self.quotes_for(ticker)?;
            let value = match kind {
                MovingAverageKind::Ema => q.ema,
                MovingAverageKind::Sma => q.sma,
            };
            match value {
                Some(v) => Ok(v),
                None => bail!("missing field"),
            }
        }

        async fn rsi(&self, ticker: &str, _period: u32, _interval: &str) -> Result<f64> {
            match self.quotes_for(ticker)?.rsi {
                Some(v) => Ok(v),
                None => bail!("missing field"),
            }
        }

        async fn daily_volumes(&self, ticker: &str, _window: usize) -> Result<Vec<f64>> {
            match self.quotes_for(ticker)?.volumes.clone() {
                Some(v) => Ok(v),
                None => bail!("missing series"),
            }
        }
    }

    fn tickers(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn empty_universe_makes_no_requests() {
        let client = FakeClient::default();
        let result = run(&client, &[], &RuleConfig::default()).await;
        assert_eq!(result, Recommendation::NoOpportunity);
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn qualifying_ticker_is_recommended() {
        let client = FakeClient::with(&[("TSLA", passing())]);
        let result = run(&client, &tickers(&["TSLA"]), &RuleConfig::default()).await;
        assert_eq!(
            result,
            Recommendation::Buy {
                ticker: "TSLA".to_string()
            }
        );
    }

    #[tokio::test]
    async fn first_qualifier_wins_and_the_scan_stops() {
        let client = FakeClient::with(&[("AAPL", passing()), ("TSLA", passing())]);
        let result = run(
            &client,
            &tickers(&["AAPL", "TSLA"]),
            &RuleConfig::default(),
        )
        .await;

        assert_eq!(
            result,
            Recommendation::Buy {
                ticker: "AAPL".to_string()
            }
        );
        // Four indicator queries for AAPL, none for TSLA.
        assert_eq!(client.request_count(), 4);
    }

    #[tokio::test]
    async fn later_ticker_passes_when_an_earlier_one_fails_rsi() {
        let overbought = Quotes {
            rsi: Some(80.0),
            ..passing()
        };
        let client = FakeClient::with(&[("A", overbought), ("B", passing())]);
        let result = run(&client, &tickers(&["A", "B"]), &RuleConfig::default()).await;
        assert_eq!(
            result,
            Recommendation::Buy {
                ticker: "B".to_string()
            }
        );
    }

    #[tokio::test]
    async fn missing_field_disqualifies_instead_of_crashing() {
        let broken = Quotes {
            rsi: None,
            ..passing()
        };
        let client = FakeClient::with(&[("TSLA", broken)]);
        let result = run(&client, &tickers(&["TSLA"]), &RuleConfig::default()).await;
        assert_eq!(result, Recommendation::NoOpportunity);
    }

    #[tokio::test]
    async fn unknown_ticker_is_skipped_not_fatal() {
        let client = FakeClient::with(&[("B", passing())]);
        let result = run(
            &client,
            &tickers(&["UNKNOWN", "B"]),
            &RuleConfig::default(),
        )
        .await;
        assert_eq!(
            result,
            Recommendation::Buy {
                ticker: "B".to_string()
            }
        );
    }
}
