mod common;

use anyhow::Result;
use async_trait::async_trait;

use nifty_journal::core::position_sizer::recommended_lots;
use nifty_journal::error::DeskError;
use nifty_journal::exchange::{fetch_quote, PriceFeed, QuoteSource};
use nifty_journal::models::{Mindset, Outcome};
use nifty_journal::trading::analytics;
use nifty_journal::trading::desk::TradingDesk;
use nifty_journal::trading::journal::TradeJournal;
use nifty_journal::trading::session::{RiskConfig, Session};
use nifty_journal::trading::trade_record::TradeEntry;

use common::{ist, record_at, scratch_config};

/// A feed that answers from a script instead of the network.
struct MockFeed {
    prices: Vec<Result<f64, String>>,
    calls: usize,
}

impl MockFeed {
    fn new(prices: Vec<Result<f64, String>>) -> Self {
        Self { prices, calls: 0 }
    }
}

#[async_trait]
impl PriceFeed for MockFeed {
    async fn latest_price(&mut self, symbol: &str) -> Result<f64> {
        assert_eq!(symbol, "^NSEI");
        let next = self
            .prices
            .get(self.calls)
            .cloned()
            .unwrap_or_else(|| Err("script exhausted".to_string()));
        self.calls += 1;
        next.map_err(anyhow::Error::msg)
    }
}

#[tokio::test]
async fn trading_day_from_quote_to_review() {
    let cfg = scratch_config("trading_day");
    let mut feed = MockFeed::new(vec![Ok(21_592.4), Err("timed out".to_string())]);

    // Live execution view
    let quote = fetch_quote(&mut feed, &cfg.symbol, cfg.fallback_price).await;
    assert_eq!(quote.source, QuoteSource::Live);

    let mut desk = TradingDesk::new(&cfg).unwrap();
    desk.sim_time = Some(ist("2026-01-05T09:45:00+05:30"));
    let session = Session::open(desk.sizer(), RiskConfig::from_config(&cfg)).unwrap();
    assert_eq!(session.lots(), 3);
    assert!(session.risk.room(quote.price).in_resistance_zone);

    let status = desk.status().unwrap();
    assert!(status.trading_open);
    assert_eq!(status.trades_logged, 0);

    // Enter and log
    let rec = desk
        .log_trade(&session, TradeEntry::new(Outcome::TargetHit, Mindset::Confident, true))
        .unwrap();
    assert_eq!(rec.net_pnl, 20.0 * 3.0 * 65.0 - 45.0);

    // Auto refresh: feed down, still running on the stale price
    let stale = fetch_quote(&mut feed, &cfg.symbol, cfg.fallback_price).await;
    assert!(stale.is_stale());
    assert_eq!(stale.price, 21500.0);

    let status = desk.status().unwrap();
    assert!(!status.trading_open);
    assert_eq!(status.trades_logged, 1);

    // Weekly review
    let report = desk.review(Some(7)).unwrap();
    assert_eq!(report.total_trades, 1);
    assert_eq!(report.win_rate, 100.0);
    assert_eq!(report.equity_curve.len(), 1);
}

#[test]
fn one_trade_per_day_until_admin_reset() {
    let cfg = scratch_config("one_and_done");
    let mut desk = TradingDesk::new(&cfg).unwrap();
    desk.sim_time = Some(ist("2026-01-06T11:00:00+05:30"));
    let session = Session::open(desk.sizer(), RiskConfig::from_config(&cfg)).unwrap();

    desk.log_trade(&session, TradeEntry::new(Outcome::StopHit, Mindset::Anxious, true))
        .unwrap();
    let again = desk.log_trade(&session, TradeEntry::new(Outcome::TargetHit, Mindset::Calm, true));
    assert!(matches!(again, Err(DeskError::AlreadyTraded(_))));

    desk.reset_lock().unwrap();
    desk.log_trade(&session, TradeEntry::new(Outcome::TargetHit, Mindset::Calm, true))
        .unwrap();

    let records = desk.load_journal().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(analytics::win_rate(&records), 50.0);
}

#[test]
fn journal_survives_a_new_process() {
    let cfg = scratch_config("reopen");
    {
        let mut desk = TradingDesk::new(&cfg).unwrap();
        desk.sim_time = Some(ist("2026-01-07T10:00:00+05:30"));
        let session = Session::open(desk.sizer(), RiskConfig::from_config(&cfg)).unwrap();
        desk.log_trade(&session, TradeEntry::new(Outcome::StopHit, Mindset::Stressed, true).with_points(15.0))
            .unwrap();
    }

    // Fresh handles over the same files, as on the next launch
    let mut desk = TradingDesk::new(&cfg).unwrap();
    desk.sim_time = Some(ist("2026-01-07T14:00:00+05:30"));
    assert!(!desk.trading_open().unwrap());

    let journal = TradeJournal::from_config(&cfg).unwrap();
    let records = journal.load_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].points, 15.0);
    assert_eq!(records[0].mindset, Mindset::Stressed);
}

#[test]
fn lots_property_holds_for_valid_inputs() {
    assert_eq!(recommended_lots(100_000.0, 2.0, 10.0, 65).unwrap(), 3);
    for capital in [1.0, 10_000.0, 100_000.0, 1_000_000.0] {
        for risk in [0.5, 1.0, 2.0, 5.0] {
            assert!(recommended_lots(capital, risk, 10.0, 65).unwrap() >= 1);
        }
    }
}

#[test]
fn equity_curve_follows_timestamps_not_file_order() {
    let cfg = scratch_config("curve_order");
    let journal = TradeJournal::from_config(&cfg).unwrap();

    // Appended out of order, as a merged journal might be
    let rows = [
        record_at(2, 10, Outcome::TargetHit, 300.0),
        record_at(0, 10, Outcome::StopHit, -100.0),
        record_at(1, 10, Outcome::TargetHit, 50.0),
    ];
    for r in &rows {
        journal.append(r).unwrap();
    }

    let loaded = journal.load_all().unwrap();
    assert_eq!(loaded, rows.to_vec());

    let curve: Vec<f64> = analytics::equity_curve(&loaded)
        .iter()
        .map(|p| p.cumulative_pnl)
        .collect();
    assert_eq!(curve, vec![-100.0, -50.0, 250.0]);
}

#[test]
fn slippage_alert_from_logged_stops() {
    let cfg = scratch_config("slippage");
    let mut desk = TradingDesk::new(&cfg).unwrap();
    let session = Session::open(desk.sizer(), RiskConfig::from_config(&cfg)).unwrap();

    for (day, pts) in [("05", 15.0), ("06", 14.0), ("07", 13.0)] {
        desk.sim_time = Some(ist(&format!("2026-01-{}T10:30:00+05:30", day)));
        desk.log_trade(
            &session,
            TradeEntry::new(Outcome::StopHit, Mindset::Anxious, true).with_points(pts),
        )
        .unwrap();
    }

    let alert = analytics::slippage_alert(&desk.load_journal().unwrap(), cfg.slippage_threshold);
    assert!(alert.triggered);
    assert_eq!(alert.mean_loss_points, Some(14.0));
}
