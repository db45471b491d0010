/// Per-ticker indicator bundle, fetched fresh for every evaluation and never
/// cached. `None` (or an empty volume series) means the indicator could not
/// be retrieved; every rule treats an unavailable input as failing.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSnapshot {
    pub ticker: String,
    pub ema: Option<f64>,
    pub sma: Option<f64>,
    pub rsi: Option<f64>,
    /// Daily volumes, most recent first.
    pub recent_volumes: Vec<f64>,
}

impl IndicatorSnapshot {
    pub fn latest_volume(&self) -> Option<f64> {
        self.recent_volumes.first().copied()
    }
}
