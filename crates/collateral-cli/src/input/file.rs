use serde_json::Value;
use std::fs;
use std::path::Path;

use collateral_core::types::CollateralAsset;
use collateral_core::AssetRegistry;

/// Read a registry from a JSON or CSV file, dispatching on the extension.
///
/// JSON accepts either an `AssetRegistry` object or a bare array of assets.
/// CSV expects a header of `name,asset_type,market_value,haircut,eligibility`
/// with `asset_type` as one of Cash, GovernmentBond, CorporateBond, Equity.
pub fn read_registry(path: &str) -> Result<AssetRegistry, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let is_csv = canonical
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        read_csv_registry(&canonical)
    } else {
        let contents = fs::read_to_string(&canonical)
            .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
        parse_json_registry(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e).into())
    }
}

/// Parse a JSON registry: either `{"assets": [...], "as_of": ...}` or `[...]`.
pub fn parse_json_registry(contents: &str) -> Result<AssetRegistry, Box<dyn std::error::Error>> {
    let value: Value = serde_json::from_str(contents)?;
    registry_from_value(value)
}

pub fn registry_from_value(value: Value) -> Result<AssetRegistry, Box<dyn std::error::Error>> {
    match value {
        Value::Array(_) => {
            let assets: Vec<CollateralAsset> = serde_json::from_value(value)?;
            Ok(AssetRegistry::new(assets))
        }
        Value::Object(_) => Ok(serde_json::from_value(value)?),
        other => Err(format!(
            "Expected a registry object or an array of assets, got {}",
            type_name(&other)
        )
        .into()),
    }
}

fn read_csv_registry(path: &Path) -> Result<AssetRegistry, Box<dyn std::error::Error>> {
    let mut rdr = csv::Reader::from_path(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let mut assets = Vec::new();
    for record in rdr.deserialize() {
        let asset: CollateralAsset =
            record.map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?;
        assets.push(asset);
    }
    Ok(AssetRegistry::new(assets))
}

/// Resolve and validate the path, preventing directory traversal.
fn resolve_path(path: &str) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn parses_a_bare_asset_array() {
        let json = r#"[
            {"name": "TLT", "asset_type": "GovernmentBond",
             "market_value": "95000", "haircut": "0.03", "eligibility": true}
        ]"#;
        let registry = parse_json_registry(json).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.assets[0].market_value, dec!(95000));
    }

    #[test]
    fn parses_a_registry_object_with_as_of() {
        let json = r#"{
            "assets": [
                {"name": "SPY", "asset_type": "Equity",
                 "market_value": "120000", "haircut": "0.2", "eligibility": false}
            ],
            "as_of": "2026-08-28"
        }"#;
        let registry = parse_json_registry(json).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.as_of.is_some());
        assert!(!registry.assets[0].eligibility);
    }

    #[test]
    fn rejects_scalar_json() {
        assert!(parse_json_registry("42").is_err());
    }

    #[test]
    fn reads_a_csv_registry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "name,asset_type,market_value,haircut,eligibility").unwrap();
        writeln!(file, "AAPL,Equity,150000,0.18,true").unwrap();
        writeln!(file, "SHY,GovernmentBond,80000,0.02,false").unwrap();
        drop(file);

        let registry = read_registry(path.to_str().unwrap()).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.assets[0].haircut, dec!(0.18));
        assert!(!registry.assets[1].eligibility);
    }

    #[test]
    fn missing_file_is_reported_with_the_path() {
        let err = read_registry("/no/such/registry.json").unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
