use colored::Colorize;
use keyseal_crypto::DigestSelector;
use keyseal_key::{verify, VerifyOutcome};

use super::{decode_hex, load_any_key, read_file};
use crate::error::{CliError, CliResult};

/// Verify a hex signature file against `file`
pub fn check(
    file: &str,
    key: &str,
    signature: &str,
    digest: Option<&str>,
    default_digest: DigestSelector<'_>,
) -> CliResult<VerifyOutcome> {
    let data = read_file(file)?;
    let sig_text = String::from_utf8(read_file(signature)?)
        .map_err(|e| CliError::InvalidInput(format!("signature file is not text: {}", e)))?;
    let sig = decode_hex(&sig_text)?;
    let verifier = load_any_key(key, None)?;
    let selector = digest.map(DigestSelector::from).unwrap_or(default_digest);
    Ok(verify(&data, &sig, &verifier, Some(selector))?)
}

pub fn handle(
    file: String,
    key: String,
    signature: String,
    digest: Option<String>,
    default_digest: DigestSelector<'_>,
) -> CliResult<()> {
    println!("{}", format!("验证签名: {}", file).cyan());
    let outcome = check(&file, &key, &signature, digest.as_deref(), default_digest)?;
    match outcome {
        VerifyOutcome::Valid => println!("{} 签名有效", "✓".green()),
        VerifyOutcome::Invalid => println!("{} 签名无效", "✗".red()),
        VerifyOutcome::Error => println!("{} 签名格式错误", "✗".red()),
    }
    println!("  结果代码: {}", outcome.code());
    Ok(())
}
