use crate::domain::snapshot::IndicatorSnapshot;

// Defaults only; observed deployments disagree on the RSI cutoff and the SMA
// period, so every knob stays externally configurable.
const DEFAULT_RSI_MAX: f64 = 40.0;
const DEFAULT_EMA_PERIOD: u32 = 50;
const DEFAULT_SMA_PERIOD: u32 = 200;
const DEFAULT_RSI_PERIOD: u32 = 14;
const DEFAULT_VOLUME_WINDOW: usize = 10;
const DEFAULT_INTERVAL: &str = "daily";

#[derive(Debug, Clone)]
pub struct RuleConfig {
    /// Highest RSI still considered a buy setup.
    pub rsi_max: f64,
    pub ema_period: u32,
    pub sma_period: u32,
    pub rsi_period: u32,
    /// Trailing daily-volume window for the spike check, latest day included.
    pub volume_window: usize,
    pub interval: String,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            rsi_max: DEFAULT_RSI_MAX,
            ema_period: DEFAULT_EMA_PERIOD,
            sma_period: DEFAULT_SMA_PERIOD,
            rsi_period: DEFAULT_RSI_PERIOD,
            volume_window: DEFAULT_VOLUME_WINDOW,
            interval: DEFAULT_INTERVAL.to_string(),
        }
    }
}

impl RuleConfig {
    pub fn from_env() -> Self {
        let mut out = Self::default();

        if let Ok(s) = std::env::var("SCAN_RSI_MAX") {
            if let Ok(n) = s.parse::<f64>() {
                out.rsi_max = n;
            }
        }

        if let Ok(s) = std::env::var("SCAN_EMA_PERIOD") {
            if let Ok(n) = s.parse::<u32>() {
                out.ema_period = n;
            }
        }

        if let Ok(s) = std::env::var("SCAN_SMA_PERIOD") {
            if let Ok(n) = s.parse::<u32>() {
                out.sma_period = n;
            }
        }

        if let Ok(s) = std::env::var("SCAN_RSI_PERIOD") {
            if let Ok(n) = s.parse::<u32>() {
                out.rsi_period = n;
            }
        }

        if let Ok(s) = std::env::var("SCAN_VOLUME_WINDOW") {
            if let Ok(n) = s.parse::<usize>() {
                out.volume_window = n;
            }
        }

        if let Ok(s) = std::env::var("SCAN_INTERVAL") {
            if !s.trim().is_empty() {
                out.interval = s.trim().to_string();
            }
        }

        out
    }
}

/// Outcome of the three independent checks for one ticker. A buy needs all
/// three; there is no partial credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub rsi_ok: bool,
    pub golden_cross: bool,
    pub volume_spike: bool,
}

impl Verdict {
    pub fn is_buy(&self) -> bool {
        self.rsi_ok && self.golden_cross && self.volume_spike
    }
}

pub fn evaluate(snapshot: &IndicatorSnapshot, config: &RuleConfig) -> Verdict {
    Verdict {
        rsi_ok: rsi_below(snapshot.rsi, config.rsi_max),
        golden_cross: golden_cross(snapshot.ema, snapshot.sma),
        volume_spike: volume_spike(&snapshot.recent_volumes),
    }
}

fn rsi_below(rsi: Option<f64>, max: f64) -> bool {
    matches!(rsi, Some(v) if v <= max)
}

// Boundary counts as a cross so a tape sitting exactly on its long average
// is not excluded by rounding alone.
fn golden_cross(ema: Option<f64>, sma: Option<f64>) -> bool {
    matches!((ema, sma), (Some(e), Some(s)) if e >= s)
}

/// Latest volume strictly above the mean of the window, latest day included.
/// A single sample can never exceed its own mean, and an empty series means
/// the indicator was unavailable; both fail.
fn volume_spike(volumes: &[f64]) -> bool {
    let Some(latest) = volumes.first().copied() else {
        return false;
    };
    let mean = volumes.iter().sum::<f64>() / volumes.len() as f64;
    latest > mean
}
