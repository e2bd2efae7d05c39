use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::models::{Mindset, Outcome};

/// One logged trade. Written once, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub timestamp: DateTime<FixedOffset>,
    pub outcome: Outcome,
    /// Index points moved. Stop hits carry the loss size as a positive number.
    pub points: f64,
    pub net_pnl: f64,
    pub mindset: Mindset,
    pub followed_rules: bool,
}

impl TradeRecord {
    pub fn is_win(&self) -> bool {
        self.outcome.is_win()
    }
}

/// What the trader submits from the entry form.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeEntry {
    pub outcome: Outcome,
    pub mindset: Mindset,
    pub followed_rules: bool,
    /// Overrides the plan's target/stop distance when the fill differed.
    pub points: Option<f64>,
}

impl TradeEntry {
    pub fn new(outcome: Outcome, mindset: Mindset, followed_rules: bool) -> Self {
        Self {
            outcome,
            mindset,
            followed_rules,
            points: None,
        }
    }

    pub fn with_points(mut self, points: f64) -> Self {
        self.points = Some(points);
        self
    }
}
