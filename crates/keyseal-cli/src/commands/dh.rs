use colored::Colorize;
use keyseal_core::dh_compute_key_with;
use keyseal_key::KeyRole;

use super::{load_any_key, load_key, write_output};
use crate::error::CliResult;

/// Derive the shared DH secret between a local private key and a peer key
pub fn handle(
    key: String,
    peer: String,
    passphrase: Option<String>,
    output: Option<String>,
) -> CliResult<()> {
    let local = load_key(&key, KeyRole::Private, passphrase.as_deref())?;
    let remote = load_any_key(&peer, None)?;
    eprintln!("{}", format!("DH 密钥协商: {} <-> {}", key, peer).cyan());

    let secret = dh_compute_key_with(&remote, &local)?;
    eprintln!("{} 共享密钥长度: {} 字节", "✓".green(), secret.len());
    write_output(output.as_deref(), &format!("{}\n", hex::encode(secret.as_slice())))
}
