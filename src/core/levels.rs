use serde::{Deserialize, Serialize};

/// Where the live price sits relative to the trader's support/resistance zones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelRoom {
    /// Points above support (negative when price is below it).
    pub to_support: f64,
    /// Points below resistance (negative when price is above it).
    pub to_resistance: f64,
    pub in_support_zone: bool,
    pub in_resistance_zone: bool,
}

impl LevelRoom {
    pub fn measure(price: f64, support: f64, resistance: f64, zone_width: f64) -> Self {
        let width = zone_width.abs();
        let to_support = round2(price - support);
        let to_resistance = round2(resistance - price);
        Self {
            to_support,
            to_resistance,
            in_support_zone: to_support.abs() <= width,
            in_resistance_zone: to_resistance.abs() <= width,
        }
    }

    /// Neither zone is touched, so a move has room in both directions.
    pub fn has_room(&self) -> bool {
        !self.in_support_zone && !self.in_resistance_zone
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
