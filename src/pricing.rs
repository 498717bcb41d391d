//! Unit-economics arithmetic.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;

use crate::marketplace::BoxTariff;
use crate::utils::error::{AppError, Result};

/// Package volume in litres from centimetre dimensions.
pub fn volume_liters(width: u32, height: u32, length: u32) -> f64 {
    let cubic_cm = f64::from(width) * f64::from(height) * f64::from(length);
    cubic_cm / 1000.0
}

/// Delivery tariff: the base rate covers the first litre, each further litre
/// costs `per_liter`.
///
/// Volumes under one litre are not clamped, so they come out below the base
/// rate.
pub fn delivery_tariff(volume_liters: f64, tariff: BoxTariff) -> f64 {
    (volume_liters - 1.0) * tariff.per_liter + tariff.base
}

/// Supplier price rounded up to a whole unit, times the piece multiplier.
pub fn unit_cost(price: &str, pieces: u32) -> Result<i64> {
    let price = Decimal::from_str(price.trim())
        .map_err(|e| AppError::parse(format!("invalid price '{}': {}", price, e)))?;

    price
        .ceil()
        .to_i64()
        .and_then(|p| p.checked_mul(i64::from(pieces)))
        .ok_or_else(|| AppError::parse(format!("cost overflow for price {} x {}", price, pieces)))
}

/// Commission on the club-discounted price, truncated to a whole unit.
pub fn commission(club_discounted_price: f64, percent: i64) -> i64 {
    (club_discounted_price * percent as f64 / 100.0) as i64
}
