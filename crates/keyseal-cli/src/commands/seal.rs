use colored::Colorize;
use keyseal_core::Envelope;
use keyseal_crypto::CipherSelector;
use keyseal_key::KeyObject;

use super::{load_any_key, read_file, write_output};
use crate::error::{CliError, CliResult};

/// Seal a file for one or more recipients; the envelope is written as JSON
pub fn handle(
    envelope: &Envelope,
    file: String,
    recipients: Vec<String>,
    cipher: Option<String>,
    output: Option<String>,
) -> CliResult<()> {
    eprintln!("{}", format!("封装文件: {}", file).cyan());
    let data = read_file(&file)?;

    let keys = recipients
        .iter()
        .map(|path| load_any_key(path, None))
        .collect::<CliResult<Vec<KeyObject>>>()?;
    let refs: Vec<&KeyObject> = keys.iter().collect();

    let selector = cipher.as_deref().map(CipherSelector::from);
    let sealed = envelope
        .seal(&data, &refs, selector)?
        .ok_or_else(|| CliError::InvalidInput("nothing to seal".to_string()))?;

    let output = output.unwrap_or_else(|| format!("{}.env.json", file));
    write_output(Some(output.as_str()), &sealed.to_json()?)?;
    eprintln!("{} 接收者数量: {}", "✓".green(), sealed.encrypted_keys.len());
    Ok(())
}
