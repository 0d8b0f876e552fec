use colored::Colorize;
use keyseal_key::Privacy;

use super::load_any_key;
use crate::error::CliResult;

pub fn handle(key: String, passphrase: Option<String>) -> CliResult<()> {
    println!("{}", format!("密钥信息: {}", key).cyan().bold());
    println!();

    let loaded = load_any_key(&key, passphrase.as_deref())?;
    match loaded.privacy() {
        Privacy::Private => println!("{}", "密钥类型: 私钥".yellow()),
        Privacy::Public => println!("{}", "密钥类型: 公钥".green()),
        Privacy::Indeterminate => println!("{}", "密钥类型: 无法确定".normal()),
    }
    println!("算法: {}", loaded.algorithm());
    println!("长度: {} 位", loaded.bits());
    println!("标识: {}", loaded);
    println!();
    println!("{}", serde_json::to_string_pretty(&loaded.details())?);

    if loaded.has_private_material() {
        println!();
        println!("{}", "⚠ 注意: 请妥善保管私钥文件！".yellow().bold());
    }
    Ok(())
}
