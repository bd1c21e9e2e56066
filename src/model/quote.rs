use serde::Serialize;
use std::collections::HashMap;

use crate::error::QuoteError;

pub const FALLBACK_SOURCE: &str = "fallback";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuoteOrigin {
    Live,
    Fallback {
        #[serde(serialize_with = "serialize_reason")]
        reason: QuoteError,
    },
}

fn serialize_reason<S>(reason: &QuoteError, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(reason)
}

/// A single numeric reading. Always finite and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub value: f64,
    pub source: String,
}

impl Quote {
    pub fn live(value: f64, source: impl Into<String>) -> Self {
        Self {
            value,
            source: source.into(),
        }
    }

    pub fn fallback(value: f64) -> Self {
        Self {
            value,
            source: FALLBACK_SOURCE.to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == FALLBACK_SOURCE
    }
}

/// Result of one fetch round: every configured key is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteBatch {
    pub quotes: HashMap<String, Quote>,
    pub origin: QuoteOrigin,
}

impl QuoteBatch {
    pub fn get(&self, key: &str) -> Option<&Quote> {
        self.quotes.get(key)
    }

    pub fn value(&self, key: &str) -> Option<f64> {
        self.quotes.get(key).map(|q| q.value)
    }

    pub fn is_live(&self) -> bool {
        matches!(self.origin, QuoteOrigin::Live)
    }
}
