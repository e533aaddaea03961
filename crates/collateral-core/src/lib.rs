pub mod error;
pub mod registry;
pub mod types;

#[cfg(feature = "allocation")]
pub mod allocation;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use error::CollateralError;
pub use registry::AssetRegistry;
pub use types::*;

/// Standard result type for all collateral operations
pub type CollateralResult<T> = Result<T, CollateralError>;
