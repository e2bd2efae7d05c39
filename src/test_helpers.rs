use chrono::{DateTime, Duration, FixedOffset};
use std::path::PathBuf;

use crate::config::Config;
use crate::models::{Mindset, Outcome};
use crate::trading::trade_record::TradeRecord;

/// Config with the stock NIFTY plan and no dependence on the environment.
pub fn default_test_config() -> Config {
    Config {
        symbol: "^NSEI".to_string(),
        market_tz: "Asia/Kolkata".to_string(),
        fallback_price: 21500.0,
        price_timeout_secs: 10,
        refresh_secs: 30,
        lot_size: 65,
        stop_points: 10.0,
        target_points: 20.0,
        fixed_costs: 45.0,
        capital: 100_000.0,
        risk_pct: 2.0,
        support: 21400.0,
        resistance: 21600.0,
        zone_width: 10.0,
        slippage_threshold: 12.0,
        data_dir: "data".to_string(),
        lock_file: "trade_lock.txt".to_string(),
        journal_file: "nifty_journal.csv".to_string(),
        log_level: "info".to_string(),
    }
}

/// Fresh, empty directory unique to one test.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "nifty_journal_test_{}_{}",
        std::process::id(),
        name
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Config whose journal and lock live in a scratch directory.
pub fn scratch_config(name: &str) -> Config {
    let mut cfg = default_test_config();
    cfg.data_dir = scratch_dir(name).to_string_lossy().to_string();
    cfg
}

/// Trade logged `day` days after Monday 2026-01-05 09:30 IST.
pub fn make_record(
    day: i64,
    outcome: Outcome,
    points: f64,
    net_pnl: f64,
    mindset: Mindset,
) -> TradeRecord {
    let base: DateTime<FixedOffset> =
        DateTime::parse_from_rfc3339("2026-01-05T09:30:00+05:30").unwrap();
    TradeRecord {
        timestamp: base + Duration::days(day),
        outcome,
        points,
        net_pnl,
        mindset,
        followed_rules: true,
    }
}
