use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::models::{Mindset, Outcome};
use crate::trading::analytics::{self, Drawdown, EquityPoint, SlippageAlert};
use crate::trading::trade_record::TradeRecord;

const CURVE_BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MindsetRow {
    pub mindset: Mindset,
    pub outcome: Outcome,
    pub trades: usize,
    pub total_pnl: f64,
}

/// Everything the weekly review screen shows, computed once from the journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewReport {
    pub window_days: Option<i64>,

    // Trades
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
    pub total_pnl: f64,
    /// `None` when no trade lost money.
    pub profit_factor: Option<f64>,

    // Discipline
    pub rule_adherence: f64,
    pub slippage: SlippageAlert,

    // Risk
    pub max_drawdown: Drawdown,

    pub by_mindset: Vec<MindsetRow>,
    pub equity_curve: Vec<EquityPoint>,
}

/// Trades logged within `days` days before `now`. A window reaching past the
/// representable calendar keeps every trade.
pub fn recent(records: &[TradeRecord], now: DateTime<FixedOffset>, days: i64) -> Vec<TradeRecord> {
    let cutoff = Duration::try_days(days).and_then(|window| now.checked_sub_signed(window));
    records
        .iter()
        .filter(|r| cutoff.map_or(true, |c| r.timestamp >= c))
        .cloned()
        .collect()
}

impl ReviewReport {
    pub fn from_records(
        records: &[TradeRecord],
        slippage_threshold: f64,
        window_days: Option<i64>,
    ) -> Self {
        let total_trades = records.len();
        let wins: Vec<f64> = records
            .iter()
            .filter(|r| r.is_win())
            .map(|r| r.net_pnl)
            .collect();
        let losses: Vec<f64> = records
            .iter()
            .filter(|r| !r.is_win())
            .map(|r| r.net_pnl)
            .collect();

        let avg_win = if !wins.is_empty() {
            wins.iter().sum::<f64>() / wins.len() as f64
        } else {
            0.0
        };
        let avg_loss = if !losses.is_empty() {
            losses.iter().sum::<f64>() / losses.len() as f64
        } else {
            0.0
        };

        let gross_win: f64 = wins.iter().filter(|p| **p > 0.0).sum();
        let gross_loss: f64 = records
            .iter()
            .map(|r| r.net_pnl)
            .filter(|p| *p < 0.0)
            .sum::<f64>()
            .abs();
        let profit_factor = (gross_loss > 0.0).then(|| gross_win / gross_loss);

        let best_trade = records
            .iter()
            .map(|r| r.net_pnl)
            .fold(f64::NEG_INFINITY, f64::max);
        let worst_trade = records
            .iter()
            .map(|r| r.net_pnl)
            .fold(f64::INFINITY, f64::min);

        let by_mindset = analytics::mindset_profitability(records)
            .into_iter()
            .map(|((mindset, outcome), bucket)| MindsetRow {
                mindset,
                outcome,
                trades: bucket.trades,
                total_pnl: bucket.total_pnl,
            })
            .collect();

        let equity_curve = analytics::equity_curve(records);
        let max_drawdown = analytics::max_drawdown(&equity_curve);

        Self {
            window_days,
            total_trades,
            winning_trades: wins.len(),
            losing_trades: losses.len(),
            win_rate: analytics::win_rate(records),
            avg_win,
            avg_loss,
            best_trade: if total_trades > 0 { best_trade } else { 0.0 },
            worst_trade: if total_trades > 0 { worst_trade } else { 0.0 },
            total_pnl: records.iter().map(|r| r.net_pnl).sum(),
            profit_factor,
            rule_adherence: analytics::rule_adherence(records),
            slippage: analytics::slippage_alert(records, slippage_threshold),
            max_drawdown,
            by_mindset,
            equity_curve,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_trades == 0
    }

    pub fn print_summary(&self) {
        println!("\n{}", "=".repeat(70));
        match self.window_days {
            Some(days) => println!("  PERFORMANCE REVIEW (last {} days)", days),
            None => println!("  PERFORMANCE REVIEW"),
        }
        println!("{}", "=".repeat(70));

        if self.is_empty() {
            println!("  Log some trades to see your performance data here!");
            println!("{}", "=".repeat(70));
            return;
        }

        println!();
        println!("  TRADES");
        println!("  ───────────────────────────────────");
        println!("  Total:       {}", self.total_trades);
        println!(
            "  Win/Loss:    {} / {}",
            self.winning_trades, self.losing_trades
        );
        println!("  Win Rate:    {:.1}%", self.win_rate);
        println!("  Avg Win:     ₹{:+.2}", self.avg_win);
        println!("  Avg Loss:    ₹{:+.2}", self.avg_loss);
        println!("  Best:        ₹{:+.2}", self.best_trade);
        println!("  Worst:       ₹{:+.2}", self.worst_trade);
        println!("  Net PnL:     ₹{:+.2}", self.total_pnl);
        match self.profit_factor {
            Some(pf) => println!("  Profit Factor: {:.2}", pf),
            None => println!("  Profit Factor: n/a (no losing trades)"),
        }
        println!();
        println!("  DISCIPLINE");
        println!("  ───────────────────────────────────");
        println!("  Rules followed: {:.0}%", self.rule_adherence);
        match self.slippage.mean_loss_points {
            Some(mean) if self.slippage.triggered => {
                println!("  ⚠️  SLIPPAGE ALERT: average loss is {:.1} pts!", mean)
            }
            Some(mean) => println!("  Avg SL:      {:.1} pts over {} stops", mean, self.slippage.sample),
            None => println!("  Avg SL:      no stop-outs logged"),
        }
        println!();
        println!("  RISK");
        println!("  ───────────────────────────────────");
        println!(
            "  Max DD:      ₹{:.2} (from peak ₹{:.2})",
            self.max_drawdown.amount, self.max_drawdown.peak
        );

        println!();
        println!("  MINDSET VS. PROFITABILITY");
        println!("  ───────────────────────────────────");
        for row in &self.by_mindset {
            println!(
                "  {:>9} | {:<10} | {} trades | PnL ₹{:+.2}",
                row.mindset.as_str(),
                row.outcome.as_str(),
                row.trades,
                row.total_pnl
            );
        }

        println!();
        println!("  EQUITY CURVE");
        println!("  ───────────────────────────────────");
        let scale = self
            .equity_curve
            .iter()
            .map(|p| p.cumulative_pnl.abs())
            .fold(0.0_f64, f64::max);
        for point in &self.equity_curve {
            println!(
                "  {}  {:>12.2}  {}",
                point.timestamp.format("%Y-%m-%d %H:%M"),
                point.cumulative_pnl,
                curve_bar(point.cumulative_pnl, scale)
            );
        }

        println!("{}", "=".repeat(70));
    }
}

fn curve_bar(value: f64, scale: f64) -> String {
    if scale <= 0.0 {
        return String::new();
    }
    let len = ((value.abs() / scale) * CURVE_BAR_WIDTH as f64).round() as usize;
    let glyph = if value >= 0.0 { "█" } else { "░" };
    glyph.repeat(len)
}
