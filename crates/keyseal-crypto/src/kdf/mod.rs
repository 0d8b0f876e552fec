//! Key Derivation Functions (KDF)
//!
//! OpenSSL's `EVP_BytesToKey`, needed to read and write legacy encrypted PEM
//! (`Proc-Type: 4,ENCRYPTED`) private keys.

use zeroize::Zeroizing;

use crate::hash::MessageDigest;

/// Derive `key_len + iv_len` bytes from a password
///
/// # Arguments
/// - `md`: Digest used for every round (legacy PEM uses MD5)
/// - `password`: Passphrase bytes
/// - `salt`: Optional 8-byte salt (legacy PEM uses the first 8 IV bytes)
/// - `count`: Iteration count per block, at least 1
/// - `key_len` / `iv_len`: Output lengths
///
/// # Returns
/// The derived key and IV
pub fn bytes_to_key(
    md: MessageDigest,
    password: &[u8],
    salt: Option<&[u8]>,
    count: usize,
    key_len: usize,
    iv_len: usize,
) -> (Zeroizing<Vec<u8>>, Vec<u8>) {
    let total = key_len + iv_len;
    let mut out = Zeroizing::new(Vec::with_capacity(total + md.output_size()));
    let mut prev: Zeroizing<Vec<u8>> = Zeroizing::new(Vec::new());

    while out.len() < total {
        let mut hasher = md.hasher();
        hasher.update(&prev);
        hasher.update(password);
        if let Some(salt) = salt {
            hasher.update(salt);
        }
        let mut block = Zeroizing::new(hasher.finalize().into_vec());
        for _ in 1..count.max(1) {
            block = Zeroizing::new(md.digest(&block));
        }
        out.extend_from_slice(&block);
        prev = block;
    }

    let key = Zeroizing::new(out[..key_len].to_vec());
    let iv = out[key_len..total].to_vec();
    (key, iv)
}
