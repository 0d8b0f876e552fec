use colored::Colorize;
use keyseal_crypto::{error::queue, error_string};

use crate::error::{CliError, CliResult};

/// Parse a packed error code, accepting `0x`-prefixed hex or decimal
pub fn parse_code(input: &str) -> CliResult<u32> {
    let input = input.trim();
    let parsed = match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => input.parse::<u32>(),
    };
    parsed.map_err(|e| CliError::InvalidInput(format!("invalid error code {}: {}", input, e)))
}

/// Decode a packed error code into its library and reason
pub fn handle(code: String) -> CliResult<()> {
    let code = parse_code(&code)?;
    println!("{} {:08X}", "错误码:".cyan(), code);
    println!("  库: {}", queue::library_name(code));
    println!("  原因: {}", queue::reason(code));
    Ok(())
}

/// Print queued errors to stderr and empty the queue
///
/// Only the oldest record is shown unless `verbose` is set. Returns the
/// number of records printed.
pub fn drain(verbose: bool) -> usize {
    let mut count = 0;
    while let Some((_, message)) = error_string(false) {
        eprintln!("{}", message.red());
        count += 1;
        if !verbose {
            queue::clear();
        }
    }
    count
}
