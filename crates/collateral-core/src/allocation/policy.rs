use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CollateralError;
use crate::types::Rate;
use crate::CollateralResult;

/// Diversification rules applied to every allocation.
///
/// Shares are fractions of the margin call. Breadth is a lower bound on the
/// sum of allocation fractions, not a count of funded assets; see
/// [`crate::allocation::problem`] for the feasibility consequences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiversificationPolicy {
    /// No single asset's allocated value may exceed this share of the margin call.
    pub max_share: Rate,
    /// Every eligible asset must contribute at least this share of the margin call.
    pub min_share: Rate,
    /// Lower bound on the sum of allocation fractions.
    pub min_breadth: Rate,
}

impl Default for DiversificationPolicy {
    fn default() -> Self {
        Self {
            max_share: dec!(0.25),
            min_share: dec!(0.05),
            min_breadth: dec!(5),
        }
    }
}

impl DiversificationPolicy {
    pub fn validate(&self) -> CollateralResult<()> {
        if self.min_share < Decimal::ZERO || self.max_share <= Decimal::ZERO {
            return Err(CollateralError::InvalidInput {
                field: "policy".into(),
                reason: "shares must be positive".into(),
            });
        }
        if self.min_share > self.max_share {
            return Err(CollateralError::InvalidInput {
                field: "policy".into(),
                reason: format!(
                    "min_share {} exceeds max_share {}",
                    self.min_share, self.max_share
                ),
            });
        }
        if self.min_breadth < Decimal::ZERO {
            return Err(CollateralError::InvalidInput {
                field: "policy".into(),
                reason: "min_breadth must be non-negative".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_reference_rules() {
        let policy = DiversificationPolicy::default();
        assert_eq!(policy.max_share, dec!(0.25));
        assert_eq!(policy.min_share, dec!(0.05));
        assert_eq!(policy.min_breadth, dec!(5));
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn inverted_band_is_rejected() {
        let policy = DiversificationPolicy {
            min_share: dec!(0.5),
            max_share: dec!(0.25),
            min_breadth: dec!(5),
        };
        assert!(policy.validate().is_err());
    }
}
