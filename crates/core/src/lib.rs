pub mod domain;
pub mod ingest;
pub mod rules;
pub mod scan;
pub mod time;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub market_data_base_url: Option<String>,
        pub market_data_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                market_data_base_url: std::env::var("MARKET_DATA_BASE_URL").ok(),
                market_data_api_key: std::env::var("MARKET_DATA_API_KEY").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_market_data_api_key(&self) -> anyhow::Result<&str> {
            self.market_data_api_key
                .as_deref()
                .context("MARKET_DATA_API_KEY is required")
        }
    }
}
