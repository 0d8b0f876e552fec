//! Process settings
//!
//! Resolved once at startup and passed explicitly to whatever needs them.
//!
//! ```toml
//! [envelope]
//! default_cipher = "rc4"
//!
//! [signature]
//! default_digest = "sha1"
//! ```

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use keyseal_crypto::{Cipher, MessageDigest};
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::error::{CoreError, Result};

/// Explicit settings file
pub const CONF_ENV: &str = "KEYSEAL_CONF";
/// Directory holding [`CONFIG_FILE`]
pub const CONFIG_DIR_ENV: &str = "KEYSEAL_CONFIG_DIR";
pub const CONFIG_FILE: &str = "keyseal.toml";
/// Fallback when neither variable is set
pub const SYSTEM_CONFIG: &str = "/etc/keyseal/keyseal.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub envelope: EnvelopeCfg,
    pub signature: SignatureCfg,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeCfg {
    /// Cipher used by seal/open when the caller names none
    #[serde(deserialize_with = "by_name")]
    pub default_cipher: Cipher,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureCfg {
    /// Digest used by sign/verify when the caller names none
    #[serde(deserialize_with = "by_name")]
    pub default_digest: MessageDigest,
}

fn by_name<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let name = String::deserialize(deserializer)?;
    name.parse().map_err(de::Error::custom)
}

impl Settings {
    /// Settings file location given an environment lookup
    pub fn resolve_path_with<F>(lookup: F) -> PathBuf
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(CONF_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        if let Some(dir) = lookup(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return Path::new(&dir).join(CONFIG_FILE);
        }
        PathBuf::from(SYSTEM_CONFIG)
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(CoreError::SettingsError(format!(
                    "cannot read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        let settings: Settings = toml::from_str(&text)
            .map_err(|e| CoreError::SettingsError(format!("invalid {}: {}", path.display(), e)))?;
        if settings.envelope.default_cipher == Cipher::Rc4 {
            warn!("RC4 is the default envelope cipher; consider aes-256-cbc");
        }
        Ok(settings)
    }

    /// Resolve the path from the process environment and load it
    pub fn from_env() -> Result<Self> {
        let path = Self::resolve_path_with(|name| std::env::var(name).ok());
        debug!(path = %path.display(), "loading settings");
        Self::load(path)
    }

    pub fn default_cipher(&self) -> Cipher {
        self.envelope.default_cipher
    }

    pub fn default_digest(&self) -> MessageDigest {
        self.signature.default_digest
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_path_resolution() {
        let path = Settings::resolve_path_with(lookup(&[
            (CONF_ENV, "/tmp/a.toml"),
            (CONFIG_DIR_ENV, "/tmp/dir"),
        ]));
        assert_eq!(path, PathBuf::from("/tmp/a.toml"));

        let path = Settings::resolve_path_with(lookup(&[(CONFIG_DIR_ENV, "/tmp/dir")]));
        assert_eq!(path, PathBuf::from("/tmp/dir/keyseal.toml"));

        let path = Settings::resolve_path_with(lookup(&[]));
        assert_eq!(path, PathBuf::from(SYSTEM_CONFIG));
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.default_cipher(), Cipher::Rc4);
        assert_eq!(settings.default_digest(), MessageDigest::Sha1);

        let dir = tempfile::tempdir().unwrap();
        let missing = Settings::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(missing, settings);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "[envelope]\ndefault_cipher = \"aes-256-cbc\"\n\n[signature]\ndefault_digest = \"SHA256\"\n",
        )
        .unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.default_cipher(), Cipher::Aes256Cbc);
        assert_eq!(settings.default_digest(), MessageDigest::Sha256);

        fs::write(&path, "[signature]\ndefault_digest = \"sha512\"\n").unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.default_cipher(), Cipher::Rc4);
        assert_eq!(settings.default_digest(), MessageDigest::Sha512);
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[envelope]\ndefault_cipher = \"blowfish\"\n").unwrap();
        assert!(matches!(Settings::load(&path), Err(CoreError::SettingsError(_))));

        fs::write(&path, "not = [toml").unwrap();
        assert!(matches!(Settings::load(&path), Err(CoreError::SettingsError(_))));

        // a directory cannot be read as a file
        assert!(matches!(Settings::load(dir.path()), Err(CoreError::SettingsError(_))));
    }
}
