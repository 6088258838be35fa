//! Per-strategy numeric tolerances — how much "profit" a strategy must see
//! before it emits a candidate opportunity at all, ahead of the Validation
//! Engine's own (stricter) checks.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ThresholdsConfig {
    pub monotonicity_min_gap: Decimal,
    pub implication_min_gap: Decimal,
    pub equivalent_min_gap: Decimal,
    pub exhaustive_min_gap: Decimal,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            monotonicity_min_gap: dec!(0.01),
            implication_min_gap: dec!(0.01),
            equivalent_min_gap: dec!(0.01),
            exhaustive_min_gap: dec!(0.01),
        }
    }
}

/// Enable/disable switches for the six strategies, so a deployment can run
/// a subset without recompiling.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct StrategiesConfig {
    pub monotonicity: bool,
    pub interval: bool,
    pub exhaustive: bool,
    pub implication: bool,
    pub equivalent: bool,
    pub temporal: bool,
}

impl Default for StrategiesConfig {
    fn default() -> Self {
        Self {
            monotonicity: true,
            interval: true,
            exhaustive: true,
            implication: true,
            equivalent: true,
            temporal: true,
        }
    }
}

impl StrategiesConfig {
    #[must_use]
    pub fn is_enabled(&self, strategy: crate::core::domain::Strategy) -> bool {
        use crate::core::domain::Strategy as S;
        match strategy {
            S::Monotonicity => self.monotonicity,
            S::Interval => self.interval,
            S::Exhaustive => self.exhaustive,
            S::Implication => self.implication,
            S::Equivalent => self.equivalent,
            S::Temporal => self.temporal,
        }
    }
}
