use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LOT_SIZE must be at least 1")]
    ZeroLotSize,
    #[error("STOP_POINTS must be a positive number, got {0}")]
    InvalidStopPoints(f64),
    #[error("unknown market timezone '{0}'")]
    UnknownTimezone(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Market
    pub symbol: String,
    pub market_tz: String,
    pub fallback_price: f64,
    pub price_timeout_secs: u64,
    pub refresh_secs: u64,

    // Contract
    pub lot_size: u32,

    // Trade plan (points are index points, costs are per round trip)
    pub stop_points: f64,
    pub target_points: f64,
    pub fixed_costs: f64,

    // Risk inputs, overridable per session
    pub capital: f64,
    pub risk_pct: f64,
    pub support: f64,
    pub resistance: f64,
    pub zone_width: f64,

    // Review
    pub slippage_threshold: f64,

    // Storage
    pub data_dir: String,
    pub lock_file: String,
    pub journal_file: String,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        Config {
            symbol: env("SYMBOL", "^NSEI"),
            market_tz: env("MARKET_TZ", "Asia/Kolkata"),
            fallback_price: env("FALLBACK_PRICE", "21500").parse().unwrap_or(21500.0),
            price_timeout_secs: env("PRICE_TIMEOUT_SECS", "10").parse().unwrap_or(10),
            refresh_secs: env("REFRESH_SECS", "30").parse().unwrap_or(30),
            lot_size: env("LOT_SIZE", "65").parse().unwrap_or(65),
            stop_points: env("STOP_POINTS", "10").parse().unwrap_or(10.0),
            target_points: env("TARGET_POINTS", "20").parse().unwrap_or(20.0),
            fixed_costs: env("FIXED_COSTS", "45").parse().unwrap_or(45.0),
            capital: env("CAPITAL", "100000").parse().unwrap_or(100_000.0),
            risk_pct: env("RISK_PCT", "2.0").parse().unwrap_or(2.0),
            support: env("SUPPORT", "21400").parse().unwrap_or(21400.0),
            resistance: env("RESISTANCE", "21600").parse().unwrap_or(21600.0),
            zone_width: env("ZONE_WIDTH", "10").parse().unwrap_or(10.0),
            slippage_threshold: env("SLIPPAGE_THRESHOLD", "12").parse().unwrap_or(12.0),
            data_dir: env("DATA_DIR", "data"),
            lock_file: env("LOCK_FILE", "trade_lock.txt"),
            journal_file: env("JOURNAL_FILE", "nifty_journal.csv"),
            log_level: env("LOG_LEVEL", "info"),
        }
    }

    /// Rejects settings that would make sizing or date keeping meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lot_size == 0 {
            return Err(ConfigError::ZeroLotSize);
        }
        if !(self.stop_points.is_finite() && self.stop_points > 0.0) {
            return Err(ConfigError::InvalidStopPoints(self.stop_points));
        }
        self.timezone()?;
        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.market_tz
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimezone(self.market_tz.clone()))
    }

    pub fn lock_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.lock_file)
    }

    pub fn journal_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.journal_file)
    }
}
