use anyhow::Context;
use std::path::Path;

// Watchlist used when nothing else is configured. Single digits by design;
// the scan is sequential and rate-limited upstream.
const DEFAULT_TICKERS: &[&str] = &["AAPL", "MSFT", "NVDA", "AMZN", "GOOGL", "META", "TSLA"];

/// Resolve the ticker universe. Precedence: --tickers arg, then a
/// newline-delimited file, then SCAN_TICKERS, then the built-in watchlist.
pub fn load_tickers(arg: Option<&str>, file: Option<&Path>) -> anyhow::Result<Vec<String>> {
    if let Some(arg) = arg {
        let tickers = parse_ticker_list(arg, ',');
        anyhow::ensure!(
            !tickers.is_empty(),
            "--tickers was supplied but contained no symbols"
        );
        return Ok(tickers);
    }

    if let Some(path) = file {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read tickers file {}", path.display()))?;
        let tickers = parse_ticker_list(&raw, '\n');
        anyhow::ensure!(
            !tickers.is_empty(),
            "tickers file {} contained no symbols",
            path.display()
        );
        return Ok(tickers);
    }

    if let Ok(s) = std::env::var("SCAN_TICKERS") {
        let tickers = parse_ticker_list(&s, ',');
        if !tickers.is_empty() {
            return Ok(tickers);
        }
    }

    Ok(DEFAULT_TICKERS.iter().map(|s| s.to_string()).collect())
}

fn parse_ticker_list(raw: &str, sep: char) -> Vec<String> {
    raw.split(sep)
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.starts_with('#'))
        .map(str::to_ascii_uppercase)
        .collect()
}
