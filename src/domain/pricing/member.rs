//! Members and products, reduced to what discount resolution needs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{MemberId, ProductId, ValidationError};

use super::{MetadataKey, PriceLevel};

/// A member record as stored by the membership system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,

    /// Raw price level column value.
    pub price_level: String,
}

impl Member {
    pub fn new(id: MemberId, price_level: PriceLevel) -> Self {
        Self {
            id,
            price_level: price_level.as_str().to_string(),
        }
    }

    /// Parses the stored price level.
    pub fn price_level(&self) -> Result<PriceLevel, ValidationError> {
        self.price_level.parse()
    }
}

/// A shop product with its JSON metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,

    pub name: String,

    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            metadata: Map::new(),
        }
    }

    /// Sets the price levels that may buy this product at a discount.
    pub fn with_allowed_price_levels(mut self, levels: &[PriceLevel]) -> Self {
        let values = levels
            .iter()
            .map(|level| Value::String(level.as_str().to_string()))
            .collect();
        self.metadata.insert(
            MetadataKey::AllowedPriceLevels.as_str().to_string(),
            Value::Array(values),
        );
        self
    }

    pub fn get_metadata(&self, key: MetadataKey) -> Option<&Value> {
        self.metadata.get(key.as_str())
    }

    /// Price levels allowed a discount on this product.
    ///
    /// A missing entry means no level is allowed.
    pub fn allowed_price_levels(&self) -> Result<Vec<PriceLevel>, ValidationError> {
        let Some(value) = self.get_metadata(MetadataKey::AllowedPriceLevels) else {
            return Ok(Vec::new());
        };

        let entries = value.as_array().ok_or_else(|| {
            ValidationError::invalid_format(
                MetadataKey::AllowedPriceLevels.as_str(),
                "expected a list of price levels",
            )
        })?;

        entries
            .iter()
            .map(|entry| match entry.as_str() {
                Some(s) => s.parse(),
                None => Err(ValidationError::invalid_format(
                    MetadataKey::AllowedPriceLevels.as_str(),
                    format!("expected a string, got {}", entry),
                )),
            })
            .collect()
    }
}
