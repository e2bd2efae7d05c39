use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

/// The sizer never recommends zero exposure.
const MIN_LOTS: u32 = 1;

#[derive(Debug, Error, PartialEq)]
pub enum SizingError {
    #[error("stop distance must be positive, got {0} points")]
    InvalidStop(f64),
    #[error("lot size must be at least 1")]
    ZeroLotSize,
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),
}

/// Lots whose combined stop-out loss fits inside `capital * risk_pct / 100`.
///
/// Floors to whole lots and never returns less than one, so tiny accounts
/// still get a usable (if oversized) recommendation.
pub fn recommended_lots(
    capital: f64,
    risk_pct: f64,
    stop_points: f64,
    lot_size: u32,
) -> Result<u32, SizingError> {
    if !capital.is_finite() {
        return Err(SizingError::NotFinite("capital"));
    }
    if !risk_pct.is_finite() {
        return Err(SizingError::NotFinite("risk percent"));
    }
    if !stop_points.is_finite() || stop_points <= 0.0 {
        return Err(SizingError::InvalidStop(stop_points));
    }
    if lot_size == 0 {
        return Err(SizingError::ZeroLotSize);
    }

    let budget = capital * risk_pct / 100.0;
    let per_lot = stop_points * lot_size as f64;
    let raw = (budget / per_lot).floor();

    if raw < MIN_LOTS as f64 {
        return Ok(MIN_LOTS);
    }
    Ok(raw.min(u32::MAX as f64) as u32)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sizing {
    pub lots: u32,
    pub risk_budget: f64,
    pub risk_per_lot: f64,
    /// Loss if the recommended size stops out, before costs.
    pub risk_at_stop: f64,
}

#[derive(Debug, Clone)]
pub struct PositionSizer {
    pub stop_points: f64,
    pub lot_size: u32,
}

impl PositionSizer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            stop_points: cfg.stop_points,
            lot_size: cfg.lot_size,
        }
    }

    pub fn size(&self, capital: f64, risk_pct: f64) -> Result<Sizing, SizingError> {
        let lots = recommended_lots(capital, risk_pct, self.stop_points, self.lot_size)?;
        let risk_per_lot = self.stop_points * self.lot_size as f64;
        Ok(Sizing {
            lots,
            risk_budget: round2(capital * risk_pct / 100.0),
            risk_per_lot: round2(risk_per_lot),
            risk_at_stop: round2(risk_per_lot * lots as f64),
        })
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
