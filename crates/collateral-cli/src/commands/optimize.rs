use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::fs::File;

use collateral_core::allocation::{self, DiversificationPolicy};
use collateral_core::types::AssetAllocation;
use collateral_core::AssetRegistry;

use crate::input;

/// Arguments for collateral optimization
#[derive(Args)]
pub struct OptimizeArgs {
    /// Path to a JSON or CSV registry file (JSON may also be piped via stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Margin call amount to cover; prompted for when omitted on a terminal
    #[arg(long)]
    pub margin_call: Option<Decimal>,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Write the per-asset allocation table to a CSV snapshot file
    #[arg(long)]
    pub export_csv: Option<String>,

    /// Write the per-asset allocation table to a JSON snapshot file
    #[arg(long)]
    pub export_json: Option<String>,
}

/// Diversification policy overrides
#[derive(Args)]
pub struct PolicyArgs {
    /// Maximum share of the margin call any single asset may cover
    #[arg(long, default_value = "0.25")]
    pub max_share: Decimal,

    /// Minimum share of the margin call each eligible asset must cover
    #[arg(long, default_value = "0.05")]
    pub min_share: Decimal,

    /// Minimum sum of allocation fractions across the registry
    #[arg(long, default_value = "5")]
    pub min_breadth: Decimal,
}

impl PolicyArgs {
    pub fn to_policy(&self) -> DiversificationPolicy {
        DiversificationPolicy {
            max_share: self.max_share,
            min_share: self.min_share,
            min_breadth: self.min_breadth,
        }
    }
}

pub fn run_optimize(args: OptimizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let registry = load_registry(&args.input)?;
    let margin_call = match args.margin_call {
        Some(amount) => amount,
        None => input::prompt::prompt_margin_call()?,
    };

    let output = allocation::optimize(&registry, margin_call, &args.policy.to_policy())?;

    if let Some(ref path) = args.export_csv {
        export_csv(path, &output.result.allocations)?;
    }
    if let Some(ref path) = args.export_json {
        export_json(path, &output.result.allocations)?;
    }

    Ok(serde_json::to_value(&output)?)
}

fn load_registry(input_path: &Option<String>) -> Result<AssetRegistry, Box<dyn std::error::Error>> {
    if let Some(ref path) = input_path {
        return input::file::read_registry(path);
    }
    if let Some(registry) = input::stdin::read_registry_stdin()? {
        return Ok(registry);
    }
    Err("Provide --input <file> or pipe a JSON registry via stdin".into())
}

/// Snapshot the allocation table as CSV, one row per asset.
pub(crate) fn export_csv(
    path: &str,
    allocations: &[AssetAllocation],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| format!("Failed to open '{}' for CSV export: {}", path, e))?;
    for allocation in allocations {
        wtr.serialize(allocation)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Snapshot the allocation table as pretty JSON.
pub(crate) fn export_json(
    path: &str,
    allocations: &[AssetAllocation],
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)
        .map_err(|e| format!("Failed to open '{}' for JSON export: {}", path, e))?;
    serde_json::to_writer_pretty(file, allocations)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use collateral_core::types::{AssetType, CollateralAsset};
    use rust_decimal_macros::dec;

    fn allocation_row() -> AssetAllocation {
        AssetAllocation {
            name: "SPY".into(),
            asset_type: AssetType::Equity,
            market_value: dec!(120000),
            haircut: dec!(0.2),
            eligibility: true,
            allocation: dec!(0.5),
            allocated_value: dec!(60000),
            post_haircut_value: dec!(48000),
        }
    }

    #[test]
    fn csv_export_writes_one_row_per_asset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.csv");
        export_csv(path.to_str().unwrap(), &[allocation_row()]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert!(lines.next().unwrap().starts_with("name,asset_type"));
        assert!(lines.next().unwrap().starts_with("SPY,"));
    }

    #[test]
    fn json_export_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        export_json(path.to_str().unwrap(), &[allocation_row()]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let back: Vec<AssetAllocation> = serde_json::from_str(&contents).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].name, "SPY");
    }

    #[test]
    fn default_policy_args_match_engine_defaults() {
        let args = PolicyArgs {
            max_share: dec!(0.25),
            min_share: dec!(0.05),
            min_breadth: dec!(5),
        };
        let policy = args.to_policy();
        let default = DiversificationPolicy::default();
        assert_eq!(policy.max_share, default.max_share);
        assert_eq!(policy.min_share, default.min_share);
        assert_eq!(policy.min_breadth, default.min_breadth);
    }

    #[test]
    fn missing_registry_file_is_an_error() {
        let result = load_registry(&Some("/nonexistent/registry.json".into()));
        assert!(result.is_err());
    }
}
