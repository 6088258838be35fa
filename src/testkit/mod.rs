//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] — Builders for domain primitives: markets, events, tokens.
//! - [`source`] — [`ScriptedSource`](source::ScriptedSource), a
//!   [`MarketSource`](crate::core::exchange::MarketSource) backed by a fixed
//!   catalog and order-book table, no network access.

pub mod domain;
pub mod source;
