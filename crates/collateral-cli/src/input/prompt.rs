use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};

/// Ask for the margin call amount on an interactive terminal.
pub fn prompt_margin_call() -> Result<Decimal, Box<dyn std::error::Error>> {
    if !atty::is(atty::Stream::Stdin) {
        return Err("No --margin-call given and stdin is not a terminal".into());
    }

    print!("Enter the margin call amount: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    parse_amount(&line)
}

fn parse_amount(line: &str) -> Result<Decimal, Box<dyn std::error::Error>> {
    let trimmed = line.trim().replace(',', "");
    let amount: Decimal = trimmed
        .parse()
        .map_err(|_| format!("'{}' is not a number", line.trim()))?;
    Ok(amount)
}
