use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use collateral_core::allocation::{self, DiversificationPolicy};
use collateral_core::AssetRegistry;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[derive(Deserialize)]
struct OptimizeRequest {
    registry: AssetRegistry,
    margin_call: Decimal,
    #[serde(default)]
    policy: Option<DiversificationPolicy>,
}

/// Allocate a registry against a margin call.
///
/// Input: `{"registry": {...}, "margin_call": "300000", "policy": {...}?}`.
/// Output: the full computation envelope as JSON.
#[napi]
pub fn optimize_collateral(input_json: String) -> NapiResult<String> {
    let request: OptimizeRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = request.policy.unwrap_or_default();
    let output = allocation::optimize(&request.registry, request.margin_call, &policy)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Validate a registry without optimizing; returns the registry back on success.
#[napi]
pub fn validate_registry(input_json: String) -> NapiResult<String> {
    let registry: AssetRegistry = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    registry.validate().map_err(to_napi_error)?;
    serde_json::to_string(&registry).map_err(to_napi_error)
}
