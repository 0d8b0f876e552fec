//! Password-based encryption of PKCS#8 documents (PBES2)

use pkcs8::{pkcs5::pbes2, EncryptedPrivateKeyInfo, PrivateKeyInfo, SecretDocument};
use rand::RngCore;

use crate::error::{Error, Result};

/// PBKDF2 iteration count for newly encrypted keys
pub const PBKDF2_ITERATIONS: u32 = 2048;

/// Encrypt a PKCS#8 `PrivateKeyInfo` with PBKDF2-HMAC-SHA256 and DES-EDE3-CBC
pub fn encrypt_private_key(der: &[u8], passphrase: &[u8]) -> Result<SecretDocument> {
    let mut rng = rand::thread_rng();
    let mut salt = [0u8; 16];
    let mut iv = [0u8; 8];
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut iv);

    let kdf = pbes2::Pbkdf2Params::hmac_with_sha256(PBKDF2_ITERATIONS, &salt)
        .map_err(|e| Error::Other(format!("Invalid PBKDF2 parameters: {}", e)))?;
    let params = pbes2::Parameters {
        kdf: kdf.into(),
        encryption: pbes2::EncryptionScheme::DesEde3Cbc { iv: &iv },
    };

    let info = PrivateKeyInfo::try_from(der)?;
    Ok(info.encrypt_with_params(params, passphrase)?)
}

/// Decrypt an `EncryptedPrivateKeyInfo` back into a `PrivateKeyInfo` document
pub fn decrypt_private_key(der: &[u8], passphrase: &[u8]) -> Result<SecretDocument> {
    let info = EncryptedPrivateKeyInfo::try_from(der)?;
    Ok(info.decrypt(passphrase)?)
}
