use serde_json::Value;
use std::fmt;

const DAILY_SERIES_KEY: &str = "Time Series (Daily)";
const DAILY_VOLUME_FIELD: &str = "5. volume";

/// Typed failure for pulling one indicator value out of a provider payload.
/// Callers downgrade these to "indicator unavailable" per ticker; they never
/// abort a scan.
#[derive(Debug, Clone)]
pub enum ExtractError {
    MissingSeries {
        series: String,
        provider_note: Option<String>,
    },
    EmptySeries {
        series: String,
    },
    MissingField {
        series: String,
        date: String,
        field: String,
    },
    BadNumber {
        field: String,
        raw: String,
    },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::MissingSeries {
                series,
                provider_note,
            } => match provider_note {
                Some(note) => write!(f, "missing series {series:?} (provider says: {note})"),
                None => write!(f, "missing series {series:?}"),
            },
            ExtractError::EmptySeries { series } => {
                write!(f, "series {series:?} has no entries")
            }
            ExtractError::MissingField {
                series,
                date,
                field,
            } => write!(f, "series {series:?} entry {date} has no field {field:?}"),
            ExtractError::BadNumber { field, raw } => {
                write!(f, "field {field:?} is not a number: {raw:?}")
            }
        }
    }
}

impl std::error::Error for ExtractError {}

/// Latest value of a technical-indicator series (`"Technical Analysis: SMA"`
/// and friends). "Latest" is the greatest date key; the provider keys entries
/// by ISO date, so lexicographic order is chronological order.
pub fn latest_indicator_value(body: &Value, function: &str) -> Result<f64, ExtractError> {
    let series_key = format!("Technical Analysis: {function}");
    let series = body
        .get(&series_key)
        .and_then(Value::as_object)
        .ok_or_else(|| ExtractError::MissingSeries {
            series: series_key.clone(),
            provider_note: provider_note(body),
        })?;

    let (date, entry) = series
        .iter()
        .max_by(|a, b| a.0.cmp(b.0))
        .ok_or_else(|| ExtractError::EmptySeries {
            series: series_key.clone(),
        })?;

    let raw = scalar_field(entry, function).ok_or_else(|| ExtractError::MissingField {
        series: series_key.clone(),
        date: date.clone(),
        field: function.to_string(),
    })?;

    parse_decimal(function, &raw)
}

/// Recent daily volumes from a `"Time Series (Daily)"` payload, most recent
/// first, truncated to `window` entries. A single malformed entry fails the
/// whole series: a partial window would silently shift the spike threshold.
pub fn recent_daily_volumes(body: &Value, window: usize) -> Result<Vec<f64>, ExtractError> {
    let series = body
        .get(DAILY_SERIES_KEY)
        .and_then(Value::as_object)
        .ok_or_else(|| ExtractError::MissingSeries {
            series: DAILY_SERIES_KEY.to_string(),
            provider_note: provider_note(body),
        })?;

    if series.is_empty() {
        return Err(ExtractError::EmptySeries {
            series: DAILY_SERIES_KEY.to_string(),
        });
    }

    let mut dates: Vec<&String> = series.keys().collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));

    let mut out = Vec::with_capacity(window.min(dates.len()));
    for date in dates.into_iter().take(window) {
        let raw = scalar_field(&series[date], DAILY_VOLUME_FIELD).ok_or_else(|| {
            ExtractError::MissingField {
                series: DAILY_SERIES_KEY.to_string(),
                date: date.clone(),
                field: DAILY_VOLUME_FIELD.to_string(),
            }
        })?;
        out.push(parse_decimal(DAILY_VOLUME_FIELD, &raw)?);
    }

    Ok(out)
}

/// Parse a numeric field after stripping thousands separators and locale
/// punctuation (commas, plain/narrow/no-break spaces, apostrophes,
/// underscores). The provider serializes numbers as strings.
pub fn parse_decimal(field: &str, raw: &str) -> Result<f64, ExtractError> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '\'' | '_' | ' ' | '\u{00A0}' | '\u{202F}'))
        .collect();

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ExtractError::BadNumber {
            field: field.to_string(),
            raw: raw.to_string(),
        })
}

fn scalar_field(entry: &Value, field: &str) -> Option<String> {
    match entry.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// Rate-limit and error payloads arrive as HTTP 200 with a single message
// field instead of the requested series; surface that text in diagnostics.
fn provider_note(body: &Value) -> Option<String> {
    for key in ["Note", "Information", "Error Message"] {
        if let Some(note) = body.get(key).and_then(Value::as_str) {
            return Some(note.to_string());
        }
    }
    None
}
