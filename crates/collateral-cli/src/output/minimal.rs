use serde_json::Value;

/// Print just the headline figures from the output.
///
/// For an optimization envelope that is the post-haircut cover, the value
/// lost to haircuts, and how many assets were funded; otherwise fall back
/// to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "total_post_haircut_value",
        "haircut_loss",
        "assets_funded",
        "breadth",
        "total_allocated_value",
    ];

    if let Value::Object(map) = result_obj {
        let mut printed = false;
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}: {}", key, format_minimal(val));
                    printed = true;
                }
            }
        }
        if printed {
            return;
        }

        // Fall back to first field
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
