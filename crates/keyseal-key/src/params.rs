//! Structured key parameters
//!
//! The hex big-integer maps accepted by [`crate::generate::new_key`] and
//! produced by [`crate::KeyObject::details`]. Field names follow the classic
//! OpenSSL structure members.

use serde::{Deserialize, Serialize};

use crate::key::Algorithm;

/// RSA components, uppercase hex
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dmp1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dmq1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iqmp: Option<String>,
}

/// DSA domain parameters and key pair, uppercase hex
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsaParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priv_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_key: Option<String>,
}

/// DH domain parameters and key pair, uppercase hex
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priv_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_key: Option<String>,
}

/// Parameter map tagged by algorithm, e.g. `{"rsa": {"n": "...", ...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyParams {
    Rsa(RsaParams),
    Dsa(DsaParams),
    Dh(DhParams),
}

impl KeyParams {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            KeyParams::Rsa(_) => Algorithm::Rsa,
            KeyParams::Dsa(_) => Algorithm::Dsa,
            KeyParams::Dh(_) => Algorithm::Dh,
        }
    }
}

/// Key summary: size, type and (except for EC) the parameter map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyDetails {
    pub bits: usize,
    #[serde(rename = "type")]
    pub algorithm: Algorithm,
    #[serde(flatten)]
    pub params: Option<KeyParams>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, KeyObject};

    fn rejected(params: KeyParams, field: &str) {
        match KeyObject::from_params(&params) {
            Err(Error::InvalidParameter { name, .. }) => assert_eq!(name, field, "{:?}", params),
            other => panic!("{:?} was not rejected on {}: {:?}", params, field, other.map(|_| ())),
        }
    }

    fn rsa(n: &str, e: &str, d: &str) -> KeyParams {
        KeyParams::Rsa(RsaParams {
            n: Some(n.to_string()),
            e: Some(e.to_string()),
            d: Some(d.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_rsa_bad_maps() {
        rejected(rsa("C5", "0", "3"), "e");
        rejected(rsa("C5", "1", "1"), "e");
        rejected(rsa("2", "3", "3"), "n");
        rejected(
            KeyParams::Rsa(RsaParams {
                n: Some("C5".to_string()),
                e: Some("3".to_string()),
                d: Some("5".to_string()),
                p: Some("B".to_string()),
                q: Some("13".to_string()),
                ..Default::default()
            }),
            "p",
        );
    }

    #[test]
    fn test_dh_bad_maps() {
        let dh = |g: &str, priv_key: Option<&str>| {
            KeyParams::Dh(DhParams {
                p: Some("17".to_string()),
                g: Some(g.to_string()),
                priv_key: priv_key.map(str::to_string),
                ..Default::default()
            })
        };
        rejected(dh("2", Some("0")), "priv_key");
        rejected(dh("2", Some("16")), "priv_key");
        assert!(KeyObject::from_params(&dh("1", None)).is_err());
        assert!(KeyObject::from_params(&dh("16", None)).is_err());
    }

    #[test]
    fn test_dsa_bad_maps() {
        let dsa = |g: &str, priv_key: Option<&str>| {
            KeyParams::Dsa(DsaParams {
                p: Some("17".to_string()),
                q: Some("B".to_string()),
                g: Some(g.to_string()),
                priv_key: priv_key.map(str::to_string),
                ..Default::default()
            })
        };
        rejected(dsa("1", None), "g");
        rejected(dsa("16", None), "g");
        rejected(dsa("2", Some("0")), "priv_key");
        rejected(dsa("2", Some("B")), "priv_key");
    }

    #[test]
    fn test_params_json_shape() {
        let params: KeyParams =
            serde_json::from_str(r#"{"dh": {"p": "17", "g": "2"}}"#).unwrap();
        match &params {
            KeyParams::Dh(dh) => {
                assert_eq!(dh.p.as_deref(), Some("17"));
                assert!(dh.priv_key.is_none());
            }
            other => panic!("unexpected params: {:?}", other),
        }
        assert_eq!(params.algorithm(), Algorithm::Dh);
    }

    #[test]
    fn test_details_flatten() {
        let details = KeyDetails {
            bits: 1024,
            algorithm: Algorithm::Rsa,
            params: Some(KeyParams::Rsa(RsaParams {
                n: Some("C3".to_string()),
                e: Some("10001".to_string()),
                ..Default::default()
            })),
        };
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["bits"], 1024);
        assert_eq!(value["type"], "rsa");
        assert_eq!(value["rsa"]["e"], "10001");
        assert!(value["rsa"].get("d").is_none());

        let ec = KeyDetails {
            bits: 256,
            algorithm: Algorithm::Ec,
            params: None,
        };
        let value = serde_json::to_value(&ec).unwrap();
        assert_eq!(value, serde_json::json!({"bits": 256, "type": "ec"}));
    }
}
