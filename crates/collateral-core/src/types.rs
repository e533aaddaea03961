use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates and fractions expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Category of a collateral asset.
///
/// The category determines the reference haircut band applied when a
/// registry is generated upstream; the engine itself only reads the
/// per-asset haircut value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    Cash,
    GovernmentBond,
    CorporateBond,
    Equity,
}

impl AssetType {
    /// Reference haircut band (inclusive low, inclusive high) for the category.
    pub fn haircut_band(&self) -> (Rate, Rate) {
        match self {
            AssetType::Cash => (Decimal::ZERO, Decimal::ZERO),
            AssetType::GovernmentBond => (dec!(0.01), dec!(0.05)),
            AssetType::CorporateBond => (dec!(0.05), dec!(0.15)),
            AssetType::Equity => (dec!(0.15), dec!(0.25)),
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetType::Cash => write!(f, "Cash"),
            AssetType::GovernmentBond => write!(f, "Government Bond"),
            AssetType::CorporateBond => write!(f, "Corporate Bond"),
            AssetType::Equity => write!(f, "Equity"),
        }
    }
}

/// A single candidate piece of collateral.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollateralAsset {
    /// Unique identifier, e.g. a ticker symbol.
    pub name: String,
    pub asset_type: AssetType,
    /// Current mark-to-market value of one full unit of the asset.
    pub market_value: Money,
    /// Fraction of value discounted for risk, in [0, 1].
    pub haircut: Rate,
    /// Whether the asset may be pledged at all.
    pub eligibility: bool,
}

/// Per-asset outcome of an optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetAllocation {
    pub name: String,
    pub asset_type: AssetType,
    pub market_value: Money,
    pub haircut: Rate,
    pub eligibility: bool,
    /// Fraction of market value committed, in [0, 1]. Zero for ineligible assets.
    pub allocation: Rate,
    /// `allocation * market_value`.
    pub allocated_value: Money,
    /// `allocated_value * (1 - haircut)`.
    pub post_haircut_value: Money,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haircut_bands_are_ordered_by_risk() {
        let cash = AssetType::Cash.haircut_band();
        let govt = AssetType::GovernmentBond.haircut_band();
        let corp = AssetType::CorporateBond.haircut_band();
        let equity = AssetType::Equity.haircut_band();

        assert_eq!(cash, (Decimal::ZERO, Decimal::ZERO));
        assert!(govt.1 <= corp.0 + dec!(0.001));
        assert!(corp.1 <= equity.0 + dec!(0.001));
        assert!(equity.1 <= Decimal::ONE);
    }

    #[test]
    fn asset_round_trips_through_json() {
        let asset = CollateralAsset {
            name: "TLT".into(),
            asset_type: AssetType::GovernmentBond,
            market_value: dec!(95000),
            haircut: dec!(0.03),
            eligibility: true,
        };
        let json = serde_json::to_string(&asset).unwrap();
        let back: CollateralAsset = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "TLT");
        assert_eq!(back.market_value, dec!(95000));
        assert!(back.eligibility);
    }
}
