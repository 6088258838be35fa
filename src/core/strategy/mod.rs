//! Strategy Engine: the six pluggable detection algorithms, run behind one
//! trait so the orchestrator can compute `required_inputs` once per scan.

mod equivalent;
mod exhaustive;
mod implication;
mod input;
mod interval;
mod monotonicity;
mod temporal;

pub use equivalent::EquivalentStrategy;
pub use exhaustive::ExhaustiveStrategy;
pub use implication::ImplicationStrategy;
pub use input::StrategyInput;
pub use interval::IntervalStrategy;
pub use monotonicity::MonotonicityStrategy;
pub use temporal::TemporalStrategy;

use crate::core::domain::{Opportunity, RequiredInputs};

/// One of the six detection algorithms. Implementations never mutate
/// market state and never call the network — by the time `detect` runs,
/// everything it needs is already in `StrategyInput`.
pub trait Strategy: Send + Sync {
    fn name(&self) -> crate::core::domain::Strategy;

    fn required_inputs(&self) -> RequiredInputs;

    fn detect(&self, input: &StrategyInput) -> Vec<Opportunity>;
}

/// Holds the enabled strategies for one scan and runs them all.
#[derive(Default)]
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn Strategy>>,
}

impl StrategyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, strategy: Box<dyn Strategy>) {
        self.strategies.push(strategy);
    }

    #[must_use]
    pub fn strategies(&self) -> &[Box<dyn Strategy>] {
        &self.strategies
    }

    /// The union of every registered strategy's `required_inputs` — what
    /// the orchestrator must fetch/compute before calling `detect_all`.
    #[must_use]
    pub fn required_inputs(&self) -> RequiredInputs {
        self.strategies
            .iter()
            .fold(RequiredInputs::none(), |acc, s| acc.union(s.required_inputs()))
    }

    #[must_use]
    pub fn detect_all(&self, input: &StrategyInput) -> Vec<Opportunity> {
        self.strategies.iter().flat_map(|s| s.detect(input)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockStrategy;
    impl Strategy for MockStrategy {
        fn name(&self) -> crate::core::domain::Strategy {
            crate::core::domain::Strategy::Monotonicity
        }
        fn required_inputs(&self) -> RequiredInputs {
            RequiredInputs {
                thresholds: true,
                ..RequiredInputs::none()
            }
        }
        fn detect(&self, _input: &StrategyInput) -> Vec<Opportunity> {
            vec![]
        }
    }

    #[test]
    fn required_inputs_unions_across_registered_strategies() {
        let mut registry = StrategyRegistry::new();
        registry.register(Box::new(MockStrategy));
        assert!(registry.required_inputs().thresholds);
        assert!(!registry.required_inputs().llm);
    }
}
