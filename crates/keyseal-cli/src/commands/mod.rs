pub mod decrypt;
pub mod dh;
pub mod encrypt;
pub mod errors;
pub mod export;
pub mod generate;
pub mod info;
pub mod open;
pub mod seal;
pub mod sign;
pub mod verify;

use std::{fs, path::Path};

use colored::Colorize;
use keyseal_crypto::encoding::{is_pem, pem::CERTIFICATE};
use keyseal_key::{read, Certificate, KeyObject, KeyRole, KeySource};

use crate::error::{CliError, CliResult};

/// Read a whole file, reporting a missing path as such
pub fn read_file(path: &str) -> CliResult<Vec<u8>> {
    if !Path::new(path).exists() {
        return Err(CliError::FileNotFound(path.to_string()));
    }
    Ok(fs::read(path)?)
}

/// Load a key of the requested role from a PEM/DER file or a certificate
pub fn load_key(path: &str, role: KeyRole, passphrase: Option<&str>) -> CliResult<KeyObject> {
    let bytes = read_file(path)?;
    let is_certificate = is_pem(&bytes) && String::from_utf8_lossy(&bytes).contains(CERTIFICATE);
    let key = if is_certificate {
        let cert = Certificate::from_pem(&bytes)?;
        read(KeySource::Certificate(&cert), role, passphrase)?
    } else {
        read(KeySource::Encoded(&bytes), role, passphrase)?
    };
    key.ok_or_else(|| CliError::NoKey(path.to_string()))
}

/// Load whatever the file holds, private first
pub fn load_any_key(path: &str, passphrase: Option<&str>) -> CliResult<KeyObject> {
    match load_key(path, KeyRole::Private, passphrase) {
        Ok(key) => Ok(key),
        Err(CliError::NoKey(_)) | Err(CliError::Key(_)) => load_key(path, KeyRole::Public, passphrase),
        Err(e) => Err(e),
    }
}

/// Write to `output` when given, otherwise print to stdout
pub fn write_output(output: Option<&str>, content: &str) -> CliResult<()> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            println!("{} 已保存到: {}", "✓".green(), path);
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Decode a hex argument or file content, ignoring surrounding whitespace
pub fn decode_hex(input: &str) -> CliResult<Vec<u8>> {
    hex::decode(input.trim()).map_err(|e| CliError::InvalidInput(format!("invalid hex: {}", e)))
}
