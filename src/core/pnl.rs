use crate::models::Outcome;

/// Net result of one trade in account currency.
///
/// `points` is the distance moved; the outcome decides the sign. Costs are
/// charged on every trade, winners included.
pub fn net_pnl(outcome: Outcome, points: f64, lots: u32, lot_size: u32, costs: f64) -> f64 {
    let gross = points.abs() * lots as f64 * lot_size as f64;
    match outcome {
        Outcome::TargetHit => gross - costs,
        Outcome::StopHit => -gross - costs,
    }
}
