//! Sealed envelope container
//!
//! One symmetric encryption of the payload plus one wrapped content key per
//! recipient. `encrypted_keys[i]` belongs to the i-th recipient passed to
//! seal. The JSON form carries both fields base64 encoded.

use keyseal_crypto::Cipher;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Output of seal, input of open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedEnvelope {
    /// IV followed by the encrypted body
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// Content key wrapped for each recipient, in recipient order
    #[serde(with = "base64_list")]
    pub encrypted_keys: Vec<Vec<u8>>,
}

impl SealedEnvelope {
    pub fn new(data: Vec<u8>, encrypted_keys: Vec<Vec<u8>>) -> Self {
        Self {
            data,
            encrypted_keys,
        }
    }

    /// Split `data` into IV and body for `cipher`
    pub fn split(&self, cipher: Cipher) -> Result<(&[u8], &[u8])> {
        split_data(&self.data, cipher)
    }

    /// 序列化为JSON字符串
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| CoreError::EnvelopeError(e.to_string()))
    }

    /// 从JSON字符串反序列化
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::EnvelopeError(e.to_string()))
    }
}

/// Split `IV || body`; the body must not be empty
pub fn split_data(data: &[u8], cipher: Cipher) -> Result<(&[u8], &[u8])> {
    let iv_len = cipher.iv_len();
    if data.len() <= iv_len {
        return Err(CoreError::EnvelopeError(format!(
            "{} envelope data too short: {} bytes",
            cipher,
            data.len()
        )));
    }
    Ok(data.split_at(iv_len))
}

mod base64_bytes {
    use base64::{engine::general_purpose, Engine as _};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        general_purpose::STANDARD.decode(text).map_err(de::Error::custom)
    }
}

mod base64_list {
    use base64::{engine::general_purpose, Engine as _};
    use serde::{de, ser::SerializeSeq, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
            seq.serialize_element(&general_purpose::STANDARD.encode(item))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .into_iter()
            .map(|text| general_purpose::STANDARD.decode(text).map_err(de::Error::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let envelope = SealedEnvelope::new(vec![1, 2, 3], vec![vec![0xff], vec![0x00, 0x01]]);
        let json = envelope.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["data"], "AQID");
        assert_eq!(value["encrypted_keys"][0], "/w==");
        assert_eq!(SealedEnvelope::from_json(&json).unwrap(), envelope);
    }

    #[test]
    fn test_bad_json() {
        assert!(SealedEnvelope::from_json(r#"{"data": "!!", "encrypted_keys": []}"#).is_err());
        assert!(SealedEnvelope::from_json("{}").is_err());
    }

    #[test]
    fn test_split() {
        let data = vec![7u8; 20];
        let (iv, body) = split_data(&data, Cipher::Aes128Cbc).unwrap();
        assert_eq!((iv.len(), body.len()), (16, 4));
        let (iv, body) = split_data(&data, Cipher::Rc4).unwrap();
        assert_eq!((iv.len(), body.len()), (0, 20));
        assert!(split_data(&data[..16], Cipher::Aes256Cbc).is_err());
    }
}
