use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::core::pnl::net_pnl;
use crate::core::position_sizer::PositionSizer;
use crate::error::{DeskError, JournalError};
use crate::models::Outcome;
use crate::trading::analytics::{self, SlippageAlert};
use crate::trading::daily_lock::DailyLock;
use crate::trading::journal::TradeJournal;
use crate::trading::review::{self, ReviewReport};
use crate::trading::session::Session;
use crate::trading::trade_record::{TradeEntry, TradeRecord};

/// Points booked per outcome when the trader does not enter the actual fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradePlan {
    pub target_points: f64,
    pub stop_points: f64,
    pub fixed_costs: f64,
    pub lot_size: u32,
}

impl TradePlan {
    pub fn new(cfg: &Config) -> Self {
        Self {
            target_points: cfg.target_points,
            stop_points: cfg.stop_points,
            fixed_costs: cfg.fixed_costs,
            lot_size: cfg.lot_size,
        }
    }

    pub fn points_for(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::TargetHit => self.target_points,
            Outcome::StopHit => self.stop_points,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeskStatus {
    pub date: NaiveDate,
    pub trading_open: bool,
    pub locked_on: Option<NaiveDate>,
    pub trades_logged: usize,
    pub slippage: SlippageAlert,
}

/// Ties the journal and the daily lock together behind the trader's actions.
pub struct TradingDesk {
    journal: TradeJournal,
    lock: DailyLock,
    sizer: PositionSizer,
    plan: TradePlan,
    tz: Tz,
    slippage_threshold: f64,
    /// When set, used instead of Utc::now() (tests and replays)
    pub sim_time: Option<DateTime<Utc>>,
}

impl TradingDesk {
    pub fn new(cfg: &Config) -> Result<Self, DeskError> {
        cfg.validate()?;
        Ok(Self {
            journal: TradeJournal::from_config(cfg)?,
            lock: DailyLock::from_config(cfg)?,
            sizer: PositionSizer::new(cfg),
            plan: TradePlan::new(cfg),
            tz: cfg.timezone()?,
            slippage_threshold: cfg.slippage_threshold,
            sim_time: None,
        })
    }

    pub fn sizer(&self) -> &PositionSizer {
        &self.sizer
    }

    pub fn plan(&self) -> &TradePlan {
        &self.plan
    }

    pub fn journal(&self) -> &TradeJournal {
        &self.journal
    }

    pub fn lock(&self) -> &DailyLock {
        &self.lock
    }

    /// Current time on the exchange's clock.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.sim_time
            .unwrap_or_else(Utc::now)
            .with_timezone(&self.tz)
            .fixed_offset()
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    pub fn trading_open(&self) -> Result<bool, JournalError> {
        Ok(!self.lock.is_locked_on(self.today())?)
    }

    /// Read path behind the live view: lock state plus the slippage monitor.
    pub fn status(&self) -> Result<DeskStatus, JournalError> {
        let date = self.today();
        let locked_on = self.lock.locked_date()?;
        let records = self.journal.load_all()?;
        Ok(DeskStatus {
            date,
            trading_open: locked_on != Some(date),
            locked_on,
            trades_logged: records.len(),
            slippage: analytics::slippage_alert(&records, self.slippage_threshold),
        })
    }

    /// Record a finished trade and close trading for the day.
    ///
    /// The lock is written before the journal row. If the row cannot be
    /// written the previous lock state is put back, so a failed log never
    /// leaves the day closed with nothing recorded, and a recorded trade is
    /// never left without the lock.
    pub fn log_trade(
        &self,
        session: &Session,
        entry: TradeEntry,
    ) -> Result<TradeRecord, DeskError> {
        if !entry.followed_rules {
            return Err(DeskError::RulesNotFollowed);
        }

        let now = self.now();
        let today = now.date_naive();
        let previous = self.lock.locked_date()?;
        if previous == Some(today) {
            return Err(DeskError::AlreadyTraded(today));
        }

        let points = entry
            .points
            .unwrap_or_else(|| self.plan.points_for(entry.outcome))
            .abs();
        if !points.is_finite() {
            return Err(DeskError::InvalidPoints(points));
        }

        let record = TradeRecord {
            timestamp: now,
            outcome: entry.outcome,
            points,
            net_pnl: net_pnl(
                entry.outcome,
                points,
                session.lots(),
                self.plan.lot_size,
                self.plan.fixed_costs,
            ),
            mindset: entry.mindset,
            followed_rules: entry.followed_rules,
        };

        self.lock.lock_on(today)?;

        if let Err(write) = self.journal.append(&record) {
            warn!("Journal write failed, restoring daily lock: {}", write);
            return match self.lock.restore(previous) {
                Ok(()) => Err(write.into()),
                Err(restore) => {
                    error!("Daily lock left set without a journal row: {}", restore);
                    Err(DeskError::RollbackFailed { write, restore })
                }
            };
        }

        info!(
            "Logged {} x{} lots: {} pts, net {:+.2}. Trading closed for {}",
            record.outcome,
            session.lots(),
            record.points,
            record.net_pnl,
            today
        );
        Ok(record)
    }

    pub fn reset_lock(&self) -> Result<(), JournalError> {
        warn!("Daily lock reset by admin action");
        self.lock.reset()
    }

    pub fn load_journal(&self) -> Result<Vec<TradeRecord>, JournalError> {
        self.journal.load_all()
    }

    /// Review over the whole journal, or only the last `days` days.
    pub fn review(&self, days: Option<i64>) -> Result<ReviewReport, JournalError> {
        let records = self.journal.load_all()?;
        let records = match days {
            Some(d) => review::recent(&records, self.now(), d),
            None => records,
        };
        Ok(ReviewReport::from_records(
            &records,
            self.slippage_threshold,
            days,
        ))
    }
}
