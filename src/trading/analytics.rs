use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Mindset, Outcome};
use crate::trading::trade_record::TradeRecord;

/// Average stop-out size, in points, above which fills are flagged.
pub const DEFAULT_SLIPPAGE_THRESHOLD: f64 = 12.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlippageAlert {
    pub triggered: bool,
    /// `None` when no stop hits have been logged.
    pub mean_loss_points: Option<f64>,
    pub sample: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MindsetBucket {
    pub trades: usize,
    pub total_pnl: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<FixedOffset>,
    pub cumulative_pnl: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawdown {
    pub amount: f64,
    pub peak: f64,
}

/// Share of target hits, in percent. Zero when nothing is logged.
pub fn win_rate(records: &[TradeRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let wins = records.iter().filter(|r| r.is_win()).count();
    wins as f64 / records.len() as f64 * 100.0
}

/// Flags when the average stop-hit loss runs past `threshold` points.
pub fn slippage_alert(records: &[TradeRecord], threshold: f64) -> SlippageAlert {
    let losses: Vec<f64> = records
        .iter()
        .filter(|r| r.outcome == Outcome::StopHit)
        .map(|r| r.points.abs())
        .collect();

    if losses.is_empty() {
        return SlippageAlert {
            triggered: false,
            mean_loss_points: None,
            sample: 0,
        };
    }

    let mean = losses.iter().sum::<f64>() / losses.len() as f64;
    SlippageAlert {
        triggered: mean > threshold,
        mean_loss_points: Some(mean),
        sample: losses.len(),
    }
}

/// Net P&L grouped by how the trader felt and how the trade ended.
pub fn mindset_profitability(
    records: &[TradeRecord],
) -> BTreeMap<(Mindset, Outcome), MindsetBucket> {
    let mut buckets: BTreeMap<(Mindset, Outcome), MindsetBucket> = BTreeMap::new();
    for r in records {
        let bucket = buckets.entry((r.mindset, r.outcome)).or_default();
        bucket.trades += 1;
        bucket.total_pnl += r.net_pnl;
    }
    buckets
}

/// Running total of net P&L in timestamp order.
///
/// Rows are sorted first (stable, so equal timestamps keep file order) in
/// case the journal was edited or merged out of order.
pub fn equity_curve(records: &[TradeRecord]) -> Vec<EquityPoint> {
    let mut ordered: Vec<&TradeRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.timestamp);

    let mut running = 0.0;
    ordered
        .into_iter()
        .map(|r| {
            running += r.net_pnl;
            EquityPoint {
                timestamp: r.timestamp,
                cumulative_pnl: running,
            }
        })
        .collect()
}

/// Largest peak-to-trough fall of the equity curve, starting from flat.
pub fn max_drawdown(curve: &[EquityPoint]) -> Drawdown {
    let mut peak = 0.0_f64;
    let mut worst = Drawdown::default();
    for point in curve {
        peak = peak.max(point.cumulative_pnl);
        let dd = peak - point.cumulative_pnl;
        if dd > worst.amount {
            worst = Drawdown { amount: dd, peak };
        }
    }
    worst
}

/// Percent of trades logged with the checklist confirmed.
pub fn rule_adherence(records: &[TradeRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let followed = records.iter().filter(|r| r.followed_rules).count();
    followed as f64 / records.len() as f64 * 100.0
}
