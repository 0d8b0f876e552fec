use std::fs;

use colored::Colorize;
use keyseal_core::{Envelope, SealedEnvelope};
use keyseal_crypto::CipherSelector;
use keyseal_key::KeyRole;

use super::{load_key, read_file};
use crate::error::{CliError, CliResult};

pub struct OpenArgs {
    pub envelope: String,
    pub key: String,
    pub index: usize,
    pub cipher: Option<String>,
    pub passphrase: Option<String>,
    pub output: Option<String>,
}

/// Open a JSON envelope with one recipient's private key
pub fn open(engine: &Envelope, args: &OpenArgs) -> CliResult<Vec<u8>> {
    let json = String::from_utf8(read_file(&args.envelope)?)
        .map_err(|e| CliError::InvalidInput(format!("envelope is not UTF-8: {}", e)))?;
    let sealed = SealedEnvelope::from_json(&json)?;
    let key = load_key(&args.key, KeyRole::Private, args.passphrase.as_deref())?;
    let selector = args.cipher.as_deref().map(CipherSelector::from);
    engine
        .open_envelope(&sealed, args.index, &key, selector)?
        .ok_or_else(|| CliError::Other("envelope could not be opened".to_string()))
}

pub fn handle(engine: &Envelope, args: OpenArgs) -> CliResult<()> {
    eprintln!("{}", format!("解封: {}", args.envelope).cyan());
    let plaintext = open(engine, &args)?;
    match args.output.as_deref() {
        Some(path) => {
            fs::write(path, &plaintext)?;
            eprintln!("{} 已保存到: {}", "✓".green(), path);
        }
        None => print!("{}", String::from_utf8_lossy(&plaintext)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{seal, tests::write_key};
    use keyseal_crypto::Cipher;
    use keyseal_key::KeySpec;

    #[test]
    fn test_seal_then_open() {
        let dir = tempfile::tempdir().unwrap();
        let alice = write_key(dir.path(), "alice.pem", KeySpec::default());
        let bob = write_key(dir.path(), "bob.pem", KeySpec::default());
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, b"for your eyes only").unwrap();
        let file = file.to_string_lossy().into_owned();

        let engine = Envelope::new(Cipher::Aes128Cbc);
        seal::handle(&engine, file.clone(), vec![alice.clone(), bob.clone()], None, None).unwrap();

        let envelope = format!("{}.env.json", file);
        let mut args = OpenArgs {
            envelope,
            key: bob,
            index: 1,
            cipher: None,
            passphrase: None,
            output: None,
        };
        assert_eq!(open(&engine, &args).unwrap(), b"for your eyes only");

        args.index = 0;
        assert!(open(&engine, &args).map(|p| p != b"for your eyes only").unwrap_or(true));

        args.key = alice;
        assert!(open(&Envelope::new(Cipher::Aes128Cbc), &args).is_ok());
    }
}
