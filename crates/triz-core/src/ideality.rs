//! Ideality calculator - aggregate benefits over aggregate costs and harms
//!
//! `ideality = Σ benefits / (Σ costs + Σ harms)`, rounded to two decimals
//! with exact halves going to the even digit.
//! A zero denominator is not an error: nothing costs anything, so the
//! result is the sentinel [`IDEAL_SENTINEL`].

use std::str::FromStr;

use crate::{Error, IdealityFactor};

/// Returned when costs and harms sum to exactly zero
pub const IDEAL_SENTINEL: f64 = 9999.0;

/// Compute the ideality ratio. Weights are not range-checked.
pub fn calculate_ideality(
    benefits: &[IdealityFactor],
    costs: &[IdealityFactor],
    harms: &[IdealityFactor],
) -> f64 {
    let numerator = total_weight(benefits);
    let denominator = total_weight(costs) + total_weight(harms);
    if denominator == 0.0 {
        return IDEAL_SENTINEL;
    }
    round2(numerator / denominator)
}

fn total_weight(factors: &[IdealityFactor]) -> f64 {
    factors.iter().map(|f| f.weight).sum()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

impl IdealityFactor {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        IdealityFactor {
            name: name.into(),
            weight,
        }
    }
}

/// Parses `name=weight`, e.g. `"noise=3.5"`
impl FromStr for IdealityFactor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidFactor(s.to_string());
        let (name, weight) = s.rsplit_once('=').ok_or_else(invalid)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid());
        }
        let weight: f64 = weight.trim().parse().map_err(|_| invalid())?;
        if !weight.is_finite() {
            return Err(invalid());
        }
        Ok(IdealityFactor::new(name, weight))
    }
}
