//! Conversion between engine percentages (`f64`) and `NUMERIC(5,2)` columns.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::DbError;

pub(crate) fn to_decimal(value: f64) -> Result<Decimal, DbError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(DbError::InvalidPercentage(value));
    }
    Decimal::from_f64(value)
        .map(|d| d.round_dp(2))
        .ok_or(DbError::InvalidPercentage(value))
}

pub(crate) fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}
