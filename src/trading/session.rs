use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::core::levels::LevelRoom;
use crate::core::position_sizer::{PositionSizer, Sizing, SizingError};

/// Risk inputs entered for one session. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    pub capital: f64,
    pub risk_pct: f64,
    pub support: f64,
    pub resistance: f64,
    pub zone_width: f64,
}

impl RiskConfig {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            capital: cfg.capital,
            risk_pct: cfg.risk_pct,
            support: cfg.support,
            resistance: cfg.resistance,
            zone_width: cfg.zone_width,
        }
    }

    pub fn room(&self, price: f64) -> LevelRoom {
        LevelRoom::measure(price, self.support, self.resistance, self.zone_width)
    }
}

/// State for one trader session: the inputs and the size they produced.
///
/// Created per invocation and handed to the desk explicitly; nothing about
/// it outlives the process.
#[derive(Debug, Clone)]
pub struct Session {
    pub risk: RiskConfig,
    sizing: Sizing,
}

impl Session {
    pub fn open(sizer: &PositionSizer, risk: RiskConfig) -> Result<Self, SizingError> {
        let sizing = sizer.size(risk.capital, risk.risk_pct)?;
        Ok(Self { risk, sizing })
    }

    /// Last recommended lot count; this is what a logged trade is sized at.
    pub fn lots(&self) -> u32 {
        self.sizing.lots
    }

    pub fn sizing(&self) -> &Sizing {
        &self.sizing
    }
}
