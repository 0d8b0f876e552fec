pub mod cert;
pub mod codec;
pub mod error;
pub mod export;
pub mod generate;
pub mod import;
pub mod key;
pub mod params;
pub mod signature;

// Re-export core functionality
pub use self::{
    cert::{Certificate, CertificateStack, PublicKeySource},
    error::{Error, Result},
    export::export,
    generate::{new_key, KeySpec, NewKey},
    import::{read, KeyRole, KeySource},
    key::{Algorithm, DhKey, DsaKey, EcKey, KeyMaterial, KeyObject, Privacy, RsaKey},
    params::{DhParams, DsaParams, KeyDetails, KeyParams, RsaParams},
    signature::{sign, verify, VerifyOutcome},
};
