//! Message digests
//!
//! Name-resolvable digest handles with streaming contexts, used by the
//! signature engine and by key derivation.

pub mod digest;

pub use self::digest::{DigestSelector, MessageDigest};
