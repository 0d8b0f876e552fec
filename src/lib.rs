//! # Keyseal - 密钥与数字信封
//!
//! 非对称密钥管理、签名验证和多接收者数字信封
//!
//! ## 模块
//!
//! - `keyseal_crypto` - 摘要、对称算法、RSA/DH 原语和错误队列
//! - `keyseal_key` - 密钥对象的生成、导入、导出和签名
//! - `keyseal_core` - 数字信封、RSA 加解密、DH 协商和配置
//! - `keyseal-cli` - 命令行工具

// Re-export all sub-crates
pub use keyseal_core;
pub use keyseal_crypto;
pub use keyseal_key;
