use colored::Colorize;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

const BAR_WIDTH: usize = 48;

/// Render the allocation as a horizontal bar chart in the terminal, one bar
/// per asset scaled against the largest allocated value.
pub fn print_chart(value: &Value) {
    let Some(rows) = super::allocation_rows(value) else {
        eprintln!("chart output needs an optimization result; falling back to JSON");
        super::json::print_json(value);
        return;
    };

    let bars: Vec<(String, Decimal, bool)> = rows
        .iter()
        .filter_map(|row| {
            let map = row.as_object()?;
            let name = map.get("name")?.as_str()?.to_string();
            let allocated = decimal_field(map.get("allocated_value")?)?;
            let eligible = map
                .get("eligibility")
                .and_then(|v| v.as_bool())
                .unwrap_or(true);
            Some((name, allocated, eligible))
        })
        .collect();

    if bars.is_empty() {
        println!("(no allocations)");
        return;
    }

    let max_value = bars
        .iter()
        .map(|(_, v, _)| *v)
        .max()
        .unwrap_or(Decimal::ONE);
    let name_width = bars.iter().map(|(n, _, _)| n.len()).max().unwrap_or(0);

    println!("Allocated value per asset");
    for (name, allocated, eligible) in &bars {
        let length = bar_length(*allocated, max_value, BAR_WIDTH);
        let bar = "█".repeat(length);
        let line = format!(
            "{:>width$}  {:<bar_width$}  {}",
            name,
            bar,
            allocated,
            width = name_width,
            bar_width = BAR_WIDTH
        );
        if *eligible {
            println!("{}", line.cyan());
        } else {
            println!("{}", line.dimmed());
        }
    }
}

/// Scale a value into a bar length, keeping nonzero values visible.
fn bar_length(value: Decimal, max_value: Decimal, width: usize) -> usize {
    if value <= Decimal::ZERO || max_value <= Decimal::ZERO {
        return 0;
    }
    let ratio = (value / max_value).to_f64().unwrap_or(0.0);
    let scaled = (ratio * width as f64).round() as usize;
    scaled.clamp(1, width)
}

/// Decimals arrive as JSON strings; tolerate plain numbers as well.
fn decimal_field(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_f64().and_then(|f| Decimal::try_from(f).ok()),
        _ => None,
    }
}
