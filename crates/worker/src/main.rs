use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod universe;

#[derive(Debug, Parser)]
#[command(name = "marketscan_worker")]
struct Args {
    /// Market as-of date (YYYY-MM-DD). Defaults to the latest completed US
    /// trading day.
    #[arg(long)]
    as_of_date: Option<String>,

    /// Comma-separated ticker list. Overrides --tickers-file and SCAN_TICKERS.
    #[arg(long)]
    tickers: Option<String>,

    /// Newline-delimited ticker file ('#' lines and blanks are skipped).
    #[arg(long)]
    tickers_file: Option<std::path::PathBuf>,

    /// Highest RSI still considered a buy setup. Overrides SCAN_RSI_MAX.
    #[arg(long)]
    rsi_max: Option<f64>,

    /// Resolve configuration and the ticker universe, then exit without
    /// touching the market-data API.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = marketscan_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let as_of_date = marketscan_core::time::us_market::resolve_as_of_date(
        args.as_of_date.as_deref(),
        chrono::Utc::now(),
    )?;

    let mut config = marketscan_core::rules::RuleConfig::from_env();
    if let Some(rsi_max) = args.rsi_max {
        config.rsi_max = rsi_max;
    }

    let tickers = universe::load_tickers(args.tickers.as_deref(), args.tickers_file.as_deref())?;

    if args.dry_run {
        tracing::info!(
            %as_of_date,
            dry_run = true,
            tickers_len = tickers.len(),
            rsi_max = config.rsi_max,
            "dry-run: skipping market data fetch"
        );
        return Ok(());
    }

    let client =
        match marketscan_core::ingest::alpha_vantage::AlphaVantageClient::from_settings(&settings)
        {
            Ok(client) => client,
            Err(err) => {
                sentry_anyhow::capture_anyhow(&err);
                return Err(err);
            }
        };

    let recommendation = marketscan_core::scan::run(&client, &tickers, &config).await;

    tracing::info!(
        %as_of_date,
        tickers_len = tickers.len(),
        recommendation = ?recommendation,
        "scan finished"
    );
    println!("{}", recommendation.summary(as_of_date));

    Ok(())
}

fn init_sentry(settings: &marketscan_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
