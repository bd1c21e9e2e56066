//! Valuation ratios. Everything here is pure arithmetic on already-validated
//! quotes; zero denominators are kept out upstream by the quote source.

use serde::Serialize;

use crate::model::valuation::Valuation;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatioResult {
    /// `current / reference`, not clamped. Text shows this value as-is.
    pub progress: f64,
    pub target_unit_price: f64,
    /// Growth factor still needed to reach the reference. Negative past parity.
    pub upside_multiplier: f64,
}

impl RatioResult {
    /// Bar-only view of the progress, bounded to `[0, 1]`.
    pub fn clamped_progress(&self) -> f64 {
        clamp_unit(self.progress)
    }

    pub fn reached_parity(&self) -> bool {
        self.progress >= 1.0
    }
}

pub fn clamp_unit(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

pub fn compute_ratio(current: &Valuation, reference: &Valuation) -> RatioResult {
    let current_cap = current.cap();
    let reference_cap = reference.cap();
    RatioResult {
        progress: current_cap / reference_cap,
        target_unit_price: reference_cap / current.supply,
        upside_multiplier: reference_cap / current_cap - 1.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PurchasingPower {
    pub total_value: f64,
    pub item_count: f64,
}

/// How many anchor items the holdings buy at the current unit price.
pub fn purchasing_power(holdings: f64, unit_price: f64, anchor_price: f64) -> PurchasingPower {
    let total_value = holdings * unit_price;
    PurchasingPower {
        total_value,
        item_count: total_value / anchor_price,
    }
}
