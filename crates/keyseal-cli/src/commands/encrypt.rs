use colored::Colorize;
use keyseal_core::encrypt;

use super::{load_any_key, read_file, write_output};
use crate::error::{CliError, CliResult};

/// Raw RSA encryption; a private key file selects private-key encryption
pub fn handle(
    key: String,
    file: String,
    padding: Option<String>,
    passphrase: Option<String>,
    output: Option<String>,
) -> CliResult<()> {
    let data = read_file(&file)?;
    let loaded = load_any_key(&key, passphrase.as_deref())?;
    eprintln!(
        "{}",
        format!("RSA 加密: {} ({})", file, padding.as_deref().unwrap_or("pkcs1")).cyan()
    );

    let out = encrypt(&loaded, &data, padding.as_deref())?
        .ok_or_else(|| CliError::Other("RSA encryption failed".to_string()))?;
    write_output(output.as_deref(), &format!("{}\n", hex::encode(out)))
}
