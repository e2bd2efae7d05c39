use anyhow::Result;
use std::time::Duration;
use tracing::{error, info};

use nifty_journal::config::Config;
use nifty_journal::exchange::{fetch_quote, PriceFeed, Quote};
use nifty_journal::trading::desk::{DeskStatus, TradingDesk};
use nifty_journal::trading::session::Session;
use nifty_journal::trading::trade_record::TradeEntry;

/// Terminal stand-in for the live-execution and weekly-review screens.
pub struct Dashboard {
    config: Config,
    desk: TradingDesk,
    feed: Box<dyn PriceFeed>,
    session: Session,
}

impl Dashboard {
    pub fn new(config: Config, desk: TradingDesk, feed: Box<dyn PriceFeed>, session: Session) -> Self {
        Self {
            config,
            desk,
            feed,
            session,
        }
    }

    async fn quote(&mut self) -> Quote {
        fetch_quote(
            self.feed.as_mut(),
            &self.config.symbol,
            self.config.fallback_price,
        )
        .await
    }

    /// One pass of the read path: quote, sizing, zones, lock, slippage.
    pub async fn print_status(&mut self) -> Result<()> {
        let quote = self.quote().await;
        let status = self.desk.status()?;
        self.render_status(&quote, &status);
        Ok(())
    }

    fn render_status(&self, quote: &Quote, status: &DeskStatus) {
        let risk = &self.session.risk;
        let sizing = self.session.sizing();
        let room = risk.room(quote.price);

        println!("\n{}", "=".repeat(60));
        if quote.is_stale() {
            println!("  {}  {:.2}  (STALE: live quote unavailable)", self.config.symbol, quote.price);
        } else {
            println!("  {}  {:.2}", self.config.symbol, quote.price);
        }
        println!("  {}", status.date.format("%A %Y-%m-%d"));
        println!("{}", "=".repeat(60));
        println!();
        println!("  RISK");
        println!("  ───────────────────────────────────");
        println!("  Capital:     ₹{:.0}", risk.capital);
        println!("  Risk:        {:.1}% (₹{:.2})", risk.risk_pct, sizing.risk_budget);
        println!("  Recommended Lots: {}", sizing.lots);
        println!(
            "  At stop:     ₹{:.2} ({} pts x {} lots x {})",
            sizing.risk_at_stop,
            self.desk.plan().stop_points,
            sizing.lots,
            self.desk.plan().lot_size
        );
        println!();
        println!("  LEVELS");
        println!("  ───────────────────────────────────");
        println!(
            "  Resistance:  {:.2} ({:+.2} pts room){}",
            risk.resistance,
            room.to_resistance,
            if room.in_resistance_zone { "  IN ZONE" } else { "" }
        );
        println!(
            "  Support:     {:.2} ({:+.2} pts room){}",
            risk.support,
            room.to_support,
            if room.in_support_zone { "  IN ZONE" } else { "" }
        );
        println!("  Zone width:  {:.1}", risk.zone_width);
        if room.has_room() {
            println!("  Clear of both zones: room in both directions.");
        }

        if let Some(mean) = status.slippage.mean_loss_points {
            if status.slippage.triggered {
                println!();
                println!("  ⚠️  SLIPPAGE ALERT: Average loss is {:.1} pts!", mean);
            }
        }

        println!();
        if status.trading_open {
            println!("  Trading open. Check 5-EMA/9-EMA & zone room, then:");
            println!("    nifty-journal log <target|stop> --mindset <m> --rules");
        } else {
            println!("  🚫 ONE & DONE ACTIVE. Trading is closed for today.");
        }
        println!("{}", "=".repeat(60));
    }

    /// Re-run the read path every refresh interval until Ctrl+C.
    pub async fn watch(&mut self) -> Result<()> {
        let every = Duration::from_secs(self.config.refresh_secs.max(1));
        info!("Watching {} every {}s. Press Ctrl+C to stop.", self.config.symbol, every.as_secs());

        loop {
            if let Err(e) = self.print_status().await {
                error!("Status refresh failed: {:#}", e);
            }

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Stopped watching.");
                    return Ok(());
                }
                _ = tokio::time::sleep(every) => {}
            }
        }
    }

    pub fn log_trade(&self, entry: TradeEntry) -> Result<()> {
        let record = self.desk.log_trade(&self.session, entry)?;
        println!(
            "Logged {} at {}: {} pts x {} lots, net ₹{:+.2} ({}).",
            record.outcome,
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.points,
            self.session.lots(),
            record.net_pnl,
            record.mindset
        );
        println!("🚫 ONE & DONE ACTIVE. Trading is closed for today.");
        Ok(())
    }

    pub fn review(&self, days: Option<i64>, json: bool) -> Result<()> {
        let report = self.desk.review(days)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            report.print_summary();
        }
        Ok(())
    }

    pub fn reset_lock(&self) -> Result<()> {
        self.desk.reset_lock()?;
        println!("Daily lock cleared. Trading is open for {}.", self.desk.today());
        Ok(())
    }
}
