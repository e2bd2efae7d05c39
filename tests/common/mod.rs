use chrono::{DateTime, Duration, FixedOffset, Utc};
use std::path::PathBuf;

use nifty_journal::config::Config;
use nifty_journal::models::{Mindset, Outcome};
use nifty_journal::trading::trade_record::TradeRecord;

/// Stock NIFTY config with journal and lock in a fresh temp directory.
pub fn scratch_config(name: &str) -> Config {
    let dir: PathBuf = std::env::temp_dir().join(format!(
        "nifty_journal_integ_{}_{}",
        std::process::id(),
        name
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

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
        data_dir: dir.to_string_lossy().to_string(),
        lock_file: "trade_lock.txt".to_string(),
        journal_file: "nifty_journal.csv".to_string(),
        log_level: "info".to_string(),
    }
}

pub fn ist(rfc3339_local: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339_local)
        .unwrap()
        .with_timezone(&Utc)
}

/// Trade at `hour` o'clock IST on 2026-01-05 plus `day` days.
pub fn record_at(day: i64, hour: i64, outcome: Outcome, net_pnl: f64) -> TradeRecord {
    let base: DateTime<FixedOffset> =
        DateTime::parse_from_rfc3339("2026-01-05T00:00:00+05:30").unwrap();
    TradeRecord {
        timestamp: base + Duration::days(day) + Duration::hours(hour),
        outcome,
        points: if outcome == Outcome::TargetHit { 20.0 } else { 10.0 },
        net_pnl,
        mindset: Mindset::Neutral,
        followed_rules: true,
    }
}
