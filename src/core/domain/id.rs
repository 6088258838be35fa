//! Newtype identifiers threaded through the pipeline.
//!
//! Every stage after the Market Source addresses markets, tokens, events and
//! clusters by these identifiers rather than by reference — this is what lets
//! a [`super::graph::MarketGraph`] be built once and shared read-only across
//! concurrent strategies (see `SPEC_FULL.md` §9, "cyclic references in
//! market-event graphs → identifier-indexed tables").

use std::fmt;
use std::sync::Arc;

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(Arc<str>);

        impl $name {
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(Arc::from(s))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(Arc::from(s.as_str()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(MarketId);
string_id!(TokenId);
string_id!(EventId);
string_id!(ClusterId);

/// Identifier for a single accepted/rejected opportunity, assigned at
/// discovery time. Not stable across scans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct OpportunityId(Arc<str>);

impl OpportunityId {
    #[must_use]
    pub fn new(strategy: &str, ordinal: u64) -> Self {
        Self(Arc::from(format!("{strategy}-{ordinal:08x}").as_str()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OpportunityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
