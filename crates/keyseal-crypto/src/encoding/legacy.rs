//! OpenSSL legacy encrypted PEM
//!
//! Traditional private keys may carry `Proc-Type: 4,ENCRYPTED` and
//! `DEK-Info: <CIPHER>,<IV hex>` headers. The cipher key is derived with
//! `EVP_BytesToKey(MD5, passphrase, salt = IV[..8], count = 1)`.

use base64::{engine::general_purpose, Engine as _};
use pem::Pem;
use zeroize::Zeroizing;

use crate::{
    error::{Error, Result},
    hash::MessageDigest,
    kdf::bytes_to_key,
    symmetric::Cipher,
};

const PROC_TYPE: &str = "Proc-Type";
const DEK_INFO: &str = "DEK-Info";
const ENCRYPTED: &str = "4,ENCRYPTED";
const LINE_WIDTH: usize = 64;

/// Whether a parsed block carries legacy encryption headers
pub fn is_encrypted(block: &Pem) -> bool {
    block.headers().get(PROC_TYPE) == Some(ENCRYPTED)
}

fn derive_key(cipher: Cipher, passphrase: &[u8], iv: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if iv.len() < 8 {
        return Err(Error::CipherError(format!(
            "{} cannot be used for PEM encryption",
            cipher.name()
        )));
    }
    let (key, _) = bytes_to_key(
        MessageDigest::Md5,
        passphrase,
        Some(&iv[..8]),
        1,
        cipher.key_len(),
        0,
    );
    Ok(key)
}

/// Encrypt `der` and armour it under `label` with legacy headers
pub fn encrypt_to_pem(label: &str, der: &[u8], passphrase: &[u8], cipher: Cipher) -> Result<String> {
    let iv = cipher.generate_iv();
    let key = derive_key(cipher, passphrase, &iv)?;
    let body = cipher.encrypt(&key, &iv, der)?;

    let encoded = general_purpose::STANDARD.encode(body);
    let mut out = format!(
        "-----BEGIN {label}-----\n{PROC_TYPE}: {ENCRYPTED}\n{DEK_INFO}: {},{}\n\n",
        cipher.name().to_ascii_uppercase(),
        hex::encode_upper(&iv)
    );
    for line in encoded.as_bytes().chunks(LINE_WIDTH) {
        // base64 output is ASCII
        out.push_str(&String::from_utf8_lossy(line));
        out.push('\n');
    }
    out.push_str(&format!("-----END {label}-----\n"));
    Ok(out)
}

/// Decrypt the contents of a block carrying legacy headers
pub fn decrypt_block(block: &Pem, passphrase: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let info = block
        .headers()
        .get(DEK_INFO)
        .ok_or_else(|| Error::Other("missing DEK-Info header".to_string()))?;
    let (name, iv_hex) = info
        .split_once(',')
        .ok_or_else(|| Error::Other(format!("malformed DEK-Info: {}", info)))?;
    let cipher: Cipher = name.trim().parse()?;
    let iv = hex::decode(iv_hex.trim())
        .map_err(|e| Error::Other(format!("malformed DEK-Info IV: {}", e)))?;

    let key = derive_key(cipher, passphrase, &iv)?;
    Ok(Zeroizing::new(cipher.decrypt(&key, &iv, block.contents())?))
}
