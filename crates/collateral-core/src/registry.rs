use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::CollateralError;
use crate::types::CollateralAsset;
use crate::CollateralResult;

/// An ordered collection of candidate collateral assets.
///
/// The registry preserves insertion order; the engine reports allocations in
/// the same order. How the registry was populated (market feed, file, sampled
/// fixture) is outside the engine's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRegistry {
    pub assets: Vec<CollateralAsset>,
    /// Valuation date of the market values, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
}

impl AssetRegistry {
    pub fn new(assets: Vec<CollateralAsset>) -> Self {
        Self {
            assets,
            as_of: None,
        }
    }

    pub fn with_as_of(assets: Vec<CollateralAsset>, as_of: NaiveDate) -> Self {
        Self {
            assets,
            as_of: Some(as_of),
        }
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CollateralAsset> {
        self.assets.iter()
    }

    /// Number of assets permitted to be pledged.
    pub fn eligible_count(&self) -> usize {
        self.assets.iter().filter(|a| a.eligibility).count()
    }

    /// Check the registry against the input taxonomy: non-empty, unique
    /// names, non-negative market values, haircuts in [0, 1].
    pub fn validate(&self) -> CollateralResult<()> {
        if self.assets.is_empty() {
            return Err(CollateralError::InvalidInput {
                field: "assets".into(),
                reason: "registry must contain at least one asset".into(),
            });
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for asset in &self.assets {
            if asset.name.trim().is_empty() {
                return Err(CollateralError::InvalidInput {
                    field: "name".into(),
                    reason: "asset name must not be empty".into(),
                });
            }
            if !seen.insert(asset.name.as_str()) {
                return Err(CollateralError::InvalidInput {
                    field: "name".into(),
                    reason: format!("duplicate asset name '{}'", asset.name),
                });
            }
            if asset.market_value < Decimal::ZERO {
                return Err(CollateralError::InvalidInput {
                    field: "market_value".into(),
                    reason: format!(
                        "market value of '{}' must be non-negative, got {}",
                        asset.name, asset.market_value
                    ),
                });
            }
            if asset.haircut < Decimal::ZERO || asset.haircut > Decimal::ONE {
                return Err(CollateralError::InvalidInput {
                    field: "haircut".into(),
                    reason: format!(
                        "haircut of '{}' must be in [0, 1], got {}",
                        asset.name, asset.haircut
                    ),
                });
            }
        }

        Ok(())
    }
}
