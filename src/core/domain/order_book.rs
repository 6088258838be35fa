//! Order book snapshot and VWAP/depth calculations used by Validation Layer 3
//! and the Pre-flight Auditor (Layer 6).

use rust_decimal::Decimal;

use super::id::TokenId;

/// One `(price, size)` level on one side of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceLevel {
    price: Decimal,
    size: Decimal,
}

impl PriceLevel {
    #[must_use]
    pub const fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }

    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    #[must_use]
    pub const fn size(&self) -> Decimal {
        self.size
    }
}

/// Sorted bid/ask levels for a single token. Bids are sorted best (highest)
/// first; asks are sorted best (lowest) first.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    token_id: Option<TokenId>,
    bids: Vec<PriceLevel>,
    asks: Vec<PriceLevel>,
}

impl OrderBook {
    #[must_use]
    pub fn with_levels(token_id: TokenId, mut bids: Vec<PriceLevel>, mut asks: Vec<PriceLevel>) -> Self {
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));
        Self {
            token_id: Some(token_id),
            bids,
            asks,
        }
    }

    /// An empty book, returned by the Market Source when order-book fetch is
    /// exhausted rather than failing the caller.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn token_id(&self) -> Option<&TokenId> {
        self.token_id.as_ref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    #[must_use]
    pub fn best_bid(&self) -> Option<PriceLevel> {
        self.bids.first().copied()
    }

    #[must_use]
    pub fn best_ask(&self) -> Option<PriceLevel> {
        self.asks.first().copied()
    }

    #[must_use]
    pub fn bids(&self) -> &[PriceLevel] {
        &self.bids
    }

    #[must_use]
    pub fn asks(&self) -> &[PriceLevel] {
        &self.asks
    }

    /// Volume-weighted average price paid to acquire `target_notional`
    /// dollars of shares by walking the ask side. Returns `None` if the book
    /// cannot fill the full notional (insufficient depth).
    #[must_use]
    pub fn vwap_buy(&self, target_notional: Decimal) -> Option<Decimal> {
        if target_notional <= Decimal::ZERO {
            return self.best_ask().map(|l| l.price);
        }
        let mut remaining = target_notional;
        let mut cost = Decimal::ZERO;
        let mut shares = Decimal::ZERO;

        for level in &self.asks {
            let level_notional = level.price * level.size;
            if level_notional >= remaining {
                let take_shares = remaining / level.price;
                cost += take_shares * level.price;
                shares += take_shares;
                remaining = Decimal::ZERO;
                break;
            }
            cost += level_notional;
            shares += level.size;
            remaining -= level_notional;
        }

        if remaining > Decimal::ZERO || shares == Decimal::ZERO {
            return None;
        }
        Some(cost / shares)
    }

    /// Total notional (price × size) available on the ask side at or below
    /// `best_ask * (1 + band)` — the depth Validation Layer 3 checks against
    /// `L_min`.
    #[must_use]
    pub fn ask_depth_usd(&self, band: Decimal) -> Decimal {
        let Some(best) = self.best_ask() else {
            return Decimal::ZERO;
        };
        let ceiling = best.price * (Decimal::ONE + band);
        self.asks
            .iter()
            .take_while(|l| l.price <= ceiling)
            .map(|l| l.price * l.size)
            .sum()
    }
}
