use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Format output as a table using the tabled crate.
///
/// Optimization envelopes get the allocation rows as the main table followed
/// by a summary block; other values fall back to a field/value listing.
pub fn print_table(value: &Value) {
    if let Some(rows) = super::allocation_rows(value) {
        print_allocation_table(rows);
        if let Some(result) = value.get("result") {
            print_summary(result);
        }
        print_envelope_notes(value);
        return;
    }

    match value {
        Value::Object(_) => print_flat_object(value),
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

const ALLOCATION_COLUMNS: [&str; 7] = [
    "name",
    "asset_type",
    "market_value",
    "haircut",
    "eligibility",
    "allocation",
    "allocated_value",
];

fn print_allocation_table(rows: &[Value]) {
    let mut builder = Builder::default();
    let mut headers: Vec<&str> = ALLOCATION_COLUMNS.to_vec();
    headers.push("post_haircut_value");
    builder.push_record(headers.clone());

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }
    }

    let table = Table::from(builder);
    println!("{}", table);
}

fn print_summary(result: &Value) {
    let summary_keys = [
        "margin_call",
        "total_allocated_value",
        "total_post_haircut_value",
        "haircut_loss",
        "breadth",
        "assets_funded",
    ];
    if let Value::Object(map) = result {
        println!();
        for key in &summary_keys {
            if let Some(val) = map.get(*key) {
                println!("{}: {}", key, format_value(val));
            }
        }
    }
}

fn print_envelope_notes(value: &Value) {
    let Some(envelope) = value.as_object() else {
        return;
    };

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        let table = Table::from(builder);
        println!("{}", table);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        let table = Table::from(builder);
        println!("{}", table);
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
