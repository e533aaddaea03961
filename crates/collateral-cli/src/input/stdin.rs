use std::io::{self, Read};

use collateral_core::AssetRegistry;

use super::file::parse_json_registry;

/// Attempt to read a JSON registry from stdin if data is being piped.
/// Returns None if stdin is a TTY (interactive).
pub fn read_registry_stdin() -> Result<Option<AssetRegistry>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    Ok(Some(parse_json_registry(trimmed)?))
}
