//! Parsed interval/bucket questions, e.g. "BTC ends between $100k and $110k".

use rust_decimal::Decimal;

use super::threshold::Subject;

/// One side of an interval. `None` represents an unbounded side (±∞),
/// e.g. "BTC above $150k" parses to `Bound::unbounded_above(150_000)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Endpoint {
    Value(Decimal),
    NegInfinity,
    PosInfinity,
}

/// A half-open or closed interval bound, carrying its own inclusivity so
/// adjacent buckets can be distinguished ("100-110" vs "110-120", where 110
/// belongs to exactly one of the two).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    endpoint: Endpoint,
    inclusive: bool,
}

impl Bound {
    #[must_use]
    pub const fn new(endpoint: Endpoint, inclusive: bool) -> Self {
        Self { endpoint, inclusive }
    }

    #[must_use]
    pub const fn neg_infinity() -> Self {
        Self {
            endpoint: Endpoint::NegInfinity,
            inclusive: false,
        }
    }

    #[must_use]
    pub const fn pos_infinity() -> Self {
        Self {
            endpoint: Endpoint::PosInfinity,
            inclusive: false,
        }
    }

    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    #[must_use]
    pub const fn inclusive(&self) -> bool {
        self.inclusive
    }
}

/// An extracted interval question over a single subject, e.g.
/// `BTC ∈ [100_000, 110_000)`.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalInfo {
    subject: Subject,
    lower: Bound,
    upper: Bound,
    confidence: f64,
}

impl IntervalInfo {
    #[must_use]
    pub fn new(subject: Subject, lower: Bound, upper: Bound, confidence: f64) -> Self {
        Self {
            subject,
            lower,
            upper,
            confidence,
        }
    }

    #[must_use]
    pub const fn subject(&self) -> &Subject {
        &self.subject
    }

    #[must_use]
    pub const fn lower(&self) -> Bound {
        self.lower
    }

    #[must_use]
    pub const fn upper(&self) -> Bound {
        self.upper
    }

    #[must_use]
    pub const fn confidence(&self) -> f64 {
        self.confidence
    }

    #[must_use]
    pub fn same_subject(&self, other: &Self) -> bool {
        self.subject == other.subject
    }

    /// Whether `self` and `other` share a boundary point without gap or
    /// overlap — the condition the Exhaustive strategy needs to treat a set
    /// of intervals as a true partition of the real line.
    #[must_use]
    pub fn adjoins(&self, other: &Self) -> bool {
        match (self.upper.endpoint, other.lower.endpoint) {
            (Endpoint::Value(a), Endpoint::Value(b)) if a == b => {
                self.upper.inclusive != other.lower.inclusive
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn interval(lo: Decimal, lo_inclusive: bool, hi: Decimal, hi_inclusive: bool) -> IntervalInfo {
        IntervalInfo::new(
            Subject::new("BTC"),
            Bound::new(Endpoint::Value(lo), lo_inclusive),
            Bound::new(Endpoint::Value(hi), hi_inclusive),
            0.9,
        )
    }

    #[test]
    fn adjacent_intervals_with_complementary_inclusivity_adjoin() {
        let a = interval(dec!(100000), true, dec!(110000), true);
        let b = interval(dec!(110000), false, dec!(120000), true);
        assert!(a.adjoins(&b));
    }

    #[test]
    fn intervals_sharing_inclusivity_at_the_boundary_do_not_adjoin() {
        // both include 110000 -> overlap, not a clean partition edge
        let a = interval(dec!(100000), true, dec!(110000), true);
        let b = interval(dec!(110000), true, dec!(120000), true);
        assert!(!a.adjoins(&b));
    }

    #[test]
    fn unbounded_endpoints_never_adjoin() {
        let a = IntervalInfo::new(Subject::new("BTC"), Bound::neg_infinity(), Bound::new(Endpoint::Value(dec!(100000)), true), 0.9);
        let b = interval(dec!(100000), false, dec!(110000), true);
        assert!(!a.adjoins(&b));
    }
}
