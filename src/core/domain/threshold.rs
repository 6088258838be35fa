//! Parsed numeric thresholds extracted from market questions.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Which way a market resolves YES relative to its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Resolves YES if the observed value is ≥ (or >) the threshold.
    Above,
    /// Resolves YES if the observed value is ≤ (or <) the threshold.
    Below,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Above => "ABOVE",
            Self::Below => "BELOW",
        })
    }
}

/// Whether the threshold value itself resolves YES (`Inclusive`) or
/// requires strictly crossing it (`Exclusive`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Inclusive,
    Exclusive,
}

/// The asset or metric a threshold question is about, e.g. `"BTC"`.
/// A plain string rather than a closed enum: the registry in
/// `core::parser::threshold` is configuration, not a type-level constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subject(String);

impl Subject {
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single extracted threshold, e.g. "BTC exceeds $110,000 by 2026-01-01".
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdInfo {
    subject: Subject,
    value: Decimal,
    direction: Direction,
    boundary: Boundary,
    /// The market's resolution deadline. `SPEC_FULL.md` §3 defines
    /// `ThresholdInfo` as `(asset, direction, level, deadline)` — the
    /// monotonicity argument between two thresholds only holds when both
    /// resolve at (approximately) the same instant, so this travels with
    /// every parsed threshold rather than being looked up separately.
    deadline: DateTime<Utc>,
    /// Confidence the rule-based parser assigns its own extraction, used by
    /// the Monotonicity and Interval strategies to gate on ambiguous parses.
    confidence: f64,
}

impl ThresholdInfo {
    #[must_use]
    pub fn new(subject: Subject, value: Decimal, direction: Direction, boundary: Boundary, deadline: DateTime<Utc>, confidence: f64) -> Self {
        Self {
            subject,
            value,
            direction,
            boundary,
            deadline,
            confidence,
        }
    }

    #[must_use]
    pub const fn subject(&self) -> &Subject {
        &self.subject
    }

    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.value
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub const fn boundary(&self) -> Boundary {
        self.boundary
    }

    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    #[must_use]
    pub const fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Two thresholds are comparable by the Monotonicity strategy only when
    /// they share a subject — "BTC > $100k" says nothing about "ETH > $3k".
    #[must_use]
    pub fn same_subject(&self, other: &Self) -> bool {
        self.subject == other.subject
    }

    /// Whether `self` and `other` resolve close enough in time to be
    /// grouped as the same `(asset, direction, deadline)` ladder —
    /// `SPEC_FULL.md` §4.5.1's `δ_deadline` grouping tolerance.
    #[must_use]
    pub fn same_deadline(&self, other: &Self, tolerance: chrono::Duration) -> bool {
        let diff = self.deadline - other.deadline;
        -tolerance <= diff && diff <= tolerance
    }
}
