use std::fs;

use colored::Colorize;
use keyseal_core::decrypt;

use super::{decode_hex, load_any_key, read_file};
use crate::error::{CliError, CliResult};

/// Raw RSA decryption of a hex file; a public key file selects public-key
/// decryption
pub fn handle(
    key: String,
    file: String,
    padding: Option<String>,
    passphrase: Option<String>,
    output: Option<String>,
) -> CliResult<()> {
    let text = String::from_utf8(read_file(&file)?)
        .map_err(|e| CliError::InvalidInput(format!("ciphertext file is not hex text: {}", e)))?;
    let data = decode_hex(&text)?;
    let loaded = load_any_key(&key, passphrase.as_deref())?;
    eprintln!(
        "{}",
        format!("RSA 解密: {} ({})", file, padding.as_deref().unwrap_or("pkcs1")).cyan()
    );

    let plain = decrypt(&loaded, &data, padding.as_deref())?
        .ok_or_else(|| CliError::Other("RSA decryption failed".to_string()))?;
    match output.as_deref() {
        Some(path) => {
            fs::write(path, &plain)?;
            eprintln!("{} 已保存到: {}", "✓".green(), path);
        }
        None => print!("{}", String::from_utf8_lossy(&plain)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{encrypt, export, tests::write_key};
    use keyseal_key::KeySpec;

    #[test]
    fn test_encrypt_then_decrypt() {
        let dir = tempfile::tempdir().unwrap();
        let key = write_key(dir.path(), "rsa.pem", KeySpec::default());
        let public = dir.path().join("rsa.pub.pem").to_string_lossy().into_owned();
        export::handle(key.clone(), None, true, false, None, Some(public.clone())).unwrap();

        let plain = dir.path().join("plain.txt");
        std::fs::write(&plain, b"short secret").unwrap();
        let sealed = dir.path().join("sealed.hex").to_string_lossy().into_owned();
        let opened = dir.path().join("opened.txt");

        encrypt::handle(
            public,
            plain.to_string_lossy().into_owned(),
            Some("oaep".to_string()),
            None,
            Some(sealed.clone()),
        )
        .unwrap();
        handle(
            key,
            sealed,
            Some("oaep".to_string()),
            None,
            Some(opened.to_string_lossy().into_owned()),
        )
        .unwrap();
        assert_eq!(std::fs::read(&opened).unwrap(), b"short secret");
    }
}
