use colored::Colorize;
use keyseal_crypto::DigestSelector;
use keyseal_key::{sign, KeyRole};

use super::{load_key, read_file, write_output};
use crate::error::CliResult;

/// Sign a file; the signature is written as hex
pub fn handle(
    file: String,
    key: String,
    digest: Option<String>,
    passphrase: Option<String>,
    output: Option<String>,
    default_digest: DigestSelector<'_>,
) -> CliResult<()> {
    eprintln!("{}", format!("签名文件: {}", file).cyan());
    let data = read_file(&file)?;
    eprintln!("  文件大小: {} 字节", data.len());

    let signer = load_key(&key, KeyRole::Private, passphrase.as_deref())?;
    eprintln!("  使用私钥: {} ({})", key, signer.algorithm());

    let selector = digest.as_deref().map(DigestSelector::from).unwrap_or(default_digest);
    let signature = sign(&data, &signer, Some(selector))?;

    let output = output.unwrap_or_else(|| format!("{}.sig", file));
    write_output(Some(output.as_str()), &format!("{}\n", hex::encode(&signature)))?;
    eprintln!("{} 摘要算法: {}", "✓".green(), selector.resolve()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{tests::write_key, verify};
    use keyseal_crypto::MessageDigest;
    use keyseal_key::KeySpec;

    #[test]
    fn test_sign_then_verify() {
        let dir = tempfile::tempdir().unwrap();
        let key = write_key(dir.path(), "ec.pem", KeySpec::Ec { bits: None });
        let file = dir.path().join("message.txt");
        std::fs::write(&file, b"hello").unwrap();
        let file = file.to_string_lossy().into_owned();

        handle(
            file.clone(),
            key.clone(),
            Some("sha256".to_string()),
            None,
            None,
            MessageDigest::Sha1.into(),
        )
        .unwrap();
        let sig = format!("{}.sig", file);
        let outcome = verify::check(&file, &key, &sig, Some("sha256"), MessageDigest::Sha1.into()).unwrap();
        assert!(outcome.is_valid());

        let outcome = verify::check(&file, &key, &sig, None, MessageDigest::Sha1.into()).unwrap();
        assert!(!outcome.is_valid());
    }
}
