use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::data::PriceQuote;

#[derive(Debug, Error)]
pub enum PriceError {
    #[error("no price quote available")]
    Unavailable,

    #[error("price must be a finite non-negative number, got {0}")]
    Invalid(f64),
}

/// Whether a resolved quote was still inside the freshness window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

/// Last known quote plus the window in which it may be served without a refetch.
///
/// Owned by the caller and passed around explicitly.
#[derive(Debug, Clone)]
pub struct PriceCache {
    quote: Option<PriceQuote>,
    max_age: Duration,
}

impl PriceCache {
    pub fn new(max_age: Duration) -> Self {
        Self {
            quote: None,
            max_age,
        }
    }

    pub fn store(&mut self, quote: PriceQuote) -> Result<(), PriceError> {
        validate_price(quote.price_usd)?;
        self.quote = Some(quote);
        Ok(())
    }

    /// Quote younger than `max_age` at `now`, if any. Quotes stamped in the
    /// future never count as fresh.
    pub fn fresh(&self, now: DateTime<Utc>) -> Option<&PriceQuote> {
        self.quote.as_ref().filter(|quote| {
            let age = now - quote.fetched_at;
            age >= Duration::zero() && age < self.max_age
        })
    }

    /// Best available quote: fresh if possible, otherwise the stale one.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<(&PriceQuote, Freshness), PriceError> {
        if let Some(quote) = self.fresh(now) {
            return Ok((quote, Freshness::Fresh));
        }
        self.quote
            .as_ref()
            .map(|quote| (quote, Freshness::Stale))
            .ok_or(PriceError::Unavailable)
    }
}

pub fn validate_price(price: f64) -> Result<f64, PriceError> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(PriceError::Invalid(price))
    }
}
