//! A [`MarketSource`] backed by a fixed catalog and order-book table.
//!
//! Best for: driving [`App::run_scan`](crate::app::App::run_scan) end to end
//! in tests without any network access.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::domain::{Market, OrderBook, TokenId};
use crate::core::exchange::MarketSource;
use crate::error::Result;

pub struct ScriptedSource {
    markets: Vec<Market>,
    books: HashMap<TokenId, OrderBook>,
    list_calls: Mutex<u32>,
}

impl ScriptedSource {
    #[must_use]
    pub fn new(markets: Vec<Market>) -> Self {
        Self {
            markets,
            books: HashMap::new(),
            list_calls: Mutex::new(0),
        }
    }

    #[must_use]
    pub fn with_book(mut self, token_id: TokenId, book: OrderBook) -> Self {
        self.books.insert(token_id, book);
        self
    }

    /// Number of times `list_markets` has been called so far.
    #[must_use]
    pub fn list_calls(&self) -> u32 {
        *self.list_calls.lock().expect("lock poisoned")
    }
}

#[async_trait]
impl MarketSource for ScriptedSource {
    async fn list_markets(&self, tags: &[String], limit: usize) -> Result<Vec<Market>> {
        *self.list_calls.lock().expect("lock poisoned") += 1;
        let filtered: Vec<Market> = self
            .markets
            .iter()
            .filter(|m| tags.is_empty() || tags.iter().any(|t| m.tags().contains(t)))
            .take(limit)
            .cloned()
            .collect();
        Ok(filtered)
    }

    async fn fetch_order_book(&self, token_id: &TokenId) -> Result<OrderBook> {
        Ok(self.books.get(token_id).cloned().unwrap_or_else(|| OrderBook::empty()))
    }
}
