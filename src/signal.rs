//! Lunar-phase trade signal
//!
//! The strategy trades on the lunar cycle: sell WETH into USDC around the new
//! moon, buy WETH back around the full moon, and hold otherwise. The lunar
//! age is derived from the Julian date against a reference new-moon epoch.
//!
//! The two trade windows are numerically disjoint (new moon: age < 1 or
//! age > 28; full moon: 13 < age < 15), so exactly one signal holds for any
//! age value.

use chrono::{DateTime, Utc};

/// Mean length of a synodic month in days
const SYNODIC_MONTH_DAYS: f64 = 29.530_588_853;

/// Julian date of a reference new moon (2000-01-06 18:14 UTC)
const NEW_MOON_EPOCH_JD: f64 = 2_451_550.1;

/// Unix epoch expressed as a Julian date
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Trade direction derived from the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSignal {
    /// New moon: sell the primary reserve asset into the secondary asset
    Sell,
    /// Full moon: buy the primary asset with the secondary asset
    Buy,
    /// Neither window holds: skip this iteration
    Hold,
}

/// Current lunar age in days, in [0, ~29.53)
pub fn lunar_age(now: DateTime<Utc>) -> f64 {
    let julian = now.timestamp() as f64 / 86_400.0 + UNIX_EPOCH_JD;
    let cycles = (julian - NEW_MOON_EPOCH_JD) / SYNODIC_MONTH_DAYS;
    cycles.rem_euclid(1.0) * SYNODIC_MONTH_DAYS
}

/// Classify a lunar age into a trade signal
pub fn evaluate(age: f64) -> TradeSignal {
    if is_new_moon(age) {
        TradeSignal::Sell
    } else if is_full_moon(age) {
        TradeSignal::Buy
    } else {
        TradeSignal::Hold
    }
}

fn is_new_moon(age: f64) -> bool {
    age < 1.0 || age > 28.0
}

fn is_full_moon(age: f64) -> bool {
    age > 13.0 && age < 15.0
}
