use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome of one full pass over the ticker universe. Exactly one of these
/// is produced per scan; nothing is ranked or stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Buy { ticker: String },
    NoOpportunity,
}

impl Recommendation {
    /// Single human-readable line for stdout.
    pub fn summary(&self, as_of_date: NaiveDate) -> String {
        match self {
            Recommendation::Buy { ticker } => {
                format!("{as_of_date}: buy signal on {ticker}")
            }
            Recommendation::NoOpportunity => {
                format!("{as_of_date}: nothing to buy today")
            }
        }
    }
}
