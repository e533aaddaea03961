use serde_json::Value;

/// Pretty-print an allocation envelope (or registry snapshot) to stdout.
///
/// The default format. Decimal fields arrive as JSON strings, so amounts
/// round-trip through downstream tooling without float drift.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}
