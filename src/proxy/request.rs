//! Inbound relay payload and its validation.
//!
//! A caller posts `{"symbol": "...", "endpoint": "overview" | "quote"}`.
//! [`parse_query`] turns the raw body into a [`QuoteQuery`], checking in
//! order: JSON shape, symbol presence, endpoint name.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::RelayError;

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub symbol: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Overview,
    Quote,
}

impl Endpoint {
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "overview" => Some(Self::Overview),
            "quote" => Some(Self::Quote),
            _ => None,
        }
    }

    /// Upstream `function` query parameter.
    #[must_use]
    pub const fn function(self) -> &'static str {
        match self {
            Self::Overview => "OVERVIEW",
            Self::Quote => "GLOBAL_QUOTE",
        }
    }
}

/// A validated relay request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteQuery {
    pub symbol: String,
    pub endpoint: Endpoint,
}

pub fn parse_query(body: &[u8]) -> Result<QuoteQuery, RelayError> {
    // Only a JSON object is a request; serde would also accept a positional array.
    let fields: Map<String, Value> =
        serde_json::from_slice(body).map_err(RelayError::MalformedBody)?;
    let request =
        QuoteRequest::deserialize(Value::Object(fields)).map_err(RelayError::MalformedBody)?;

    let symbol = match request.symbol {
        Some(symbol) if !symbol.is_empty() => symbol,
        _ => return Err(RelayError::MissingSymbol),
    };

    let endpoint = request
        .endpoint
        .as_deref()
        .and_then(Endpoint::parse)
        .ok_or(RelayError::InvalidEndpoint)?;

    Ok(QuoteQuery { symbol, endpoint })
}
