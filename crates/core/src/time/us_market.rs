use anyhow::Context;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use std::collections::HashSet;

const ET_OFFSET_SECS: i32 = -5 * 3600;

// If the job runs before this time (ET), treat it as "yesterday's" market date.
// NYSE close is 16:00 ET; the extra hour covers indicator publication lag.
const CLOSE_CUTOFF_HOUR_ET: u32 = 17;
const CLOSE_CUTOFF_MINUTE_ET: u32 = 0;

/// Date the scan results are labeled with. An explicit `YYYY-MM-DD` argument
/// wins; otherwise the latest completed US trading day relative to `now_utc`.
pub fn resolve_as_of_date(
    as_of_date_arg: Option<&str>,
    now_utc: DateTime<Utc>,
) -> anyhow::Result<NaiveDate> {
    if let Some(s) = as_of_date_arg {
        return Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?);
    }

    let et = chrono::FixedOffset::east_opt(ET_OFFSET_SECS).context("invalid ET offset")?;
    let now_et = now_utc.with_timezone(&et);

    let cutoff_reached =
        (now_et.hour(), now_et.minute()) >= (CLOSE_CUTOFF_HOUR_ET, CLOSE_CUTOFF_MINUTE_ET);
    let mut date = now_et.date_naive();
    if !cutoff_reached {
        date = date - Duration::days(1);
    }

    // Roll back to the previous trading day.
    let holidays = configured_holidays();
    while is_weekend(date) || holidays.contains(&date) {
        date = date - Duration::days(1);
    }

    Ok(date)
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun)
}

fn configured_holidays() -> HashSet<NaiveDate> {
    // Minimal set of fixed-date full closures.
    // Extend via US_MARKET_HOLIDAYS="YYYY-MM-DD,YYYY-MM-DD".
    let mut out = HashSet::new();
    let years = [2024, 2025, 2026, 2027, 2028, 2029, 2030];
    for y in years {
        for (m, d) in [(1, 1), (7, 4), (12, 25)] {
            if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                out.insert(date);
            }
        }
    }

    if let Ok(s) = std::env::var("US_MARKET_HOLIDAYS") {
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Ok(d) = NaiveDate::parse_from_str(part, "%Y-%m-%d") {
                out.insert(d);
            }
        }
    }

    out
}
