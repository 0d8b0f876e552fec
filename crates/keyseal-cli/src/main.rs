//! Keyseal 密钥管理命令行工具

mod commands;
mod error;

use clap::{Parser, Subcommand};
use commands::{generate::GenerateArgs, open::OpenArgs};
use error::CliResult;
use keyseal_core::{Envelope, Settings};
use tracing::debug;

#[derive(Parser)]
#[command(name = "keyseal")]
#[command(about = "Keyseal 密钥管理工具 - 非对称密钥、签名与数字信封")]
#[command(version)]
struct Cli {
    /// 输出全部排队的错误信息
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 生成新的密钥
    Generate {
        /// 密钥算法 (rsa, dsa, dh, ec)
        #[arg(short, long)]
        algorithm: Option<String>,

        /// 密钥位数
        #[arg(short, long)]
        bits: Option<usize>,

        /// RSA 公共指数
        #[arg(long)]
        exponent: Option<u64>,

        /// DH 生成元
        #[arg(long)]
        generator: Option<u32>,

        /// DSA 参数种子
        #[arg(long)]
        seed: Option<String>,

        /// 从 JSON 参数文件构建密钥 (如 {"rsa": {"n": "...", "e": "...", "d": "..."}})
        #[arg(long)]
        params: Option<String>,

        /// 使用传统 (raw) PEM 格式
        #[arg(long)]
        raw: bool,

        /// 加密私钥的口令
        #[arg(long)]
        passphrase: Option<String>,

        /// 输出文件
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 导出密钥
    Export {
        /// 密钥文件路径
        #[arg(short, long)]
        key: String,

        /// 读取密钥的口令
        #[arg(long)]
        passphrase: Option<String>,

        /// 仅导出公钥
        #[arg(long)]
        public: bool,

        /// 使用传统 (raw) PEM 格式
        #[arg(long)]
        raw: bool,

        /// 加密导出私钥的口令
        #[arg(long)]
        out_passphrase: Option<String>,

        /// 输出文件
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 显示密钥信息
    Info {
        /// 密钥文件路径
        #[arg(short, long)]
        key: String,

        /// 读取密钥的口令
        #[arg(long)]
        passphrase: Option<String>,
    },

    /// 签名文件
    Sign {
        /// 要签名的文件路径
        #[arg(short, long)]
        file: String,

        /// 私钥文件路径
        #[arg(short, long)]
        key: String,

        /// 摘要算法
        #[arg(short, long)]
        digest: Option<String>,

        /// 读取私钥的口令
        #[arg(long)]
        passphrase: Option<String>,

        /// 签名输出文件
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 验证签名
    Verify {
        /// 要验证的文件路径
        #[arg(short, long)]
        file: String,

        /// 公钥、私钥或证书文件路径
        #[arg(short, long)]
        key: String,

        /// 签名文件路径
        #[arg(short, long)]
        signature: String,

        /// 摘要算法
        #[arg(short, long)]
        digest: Option<String>,
    },

    /// 为一个或多个接收者封装文件
    Seal {
        /// 要封装的文件路径
        #[arg(short, long)]
        file: String,

        /// 接收者公钥或证书文件 (可重复)
        #[arg(short, long, required = true)]
        recipient: Vec<String>,

        /// 对称算法
        #[arg(short, long)]
        cipher: Option<String>,

        /// 信封输出文件
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 解封数字信封
    Open {
        /// 信封文件路径
        #[arg(short, long)]
        envelope: String,

        /// 接收者私钥文件路径
        #[arg(short, long)]
        key: String,

        /// 接收者序号
        #[arg(short, long, default_value_t = 0)]
        index: usize,

        /// 对称算法
        #[arg(short, long)]
        cipher: Option<String>,

        /// 读取私钥的口令
        #[arg(long)]
        passphrase: Option<String>,

        /// 明文输出文件
        #[arg(short, long)]
        output: Option<String>,
    },

    /// RSA 加密
    Encrypt {
        /// 密钥文件路径
        #[arg(short, long)]
        key: String,

        /// 要加密的文件路径
        #[arg(short, long)]
        file: String,

        /// 填充模式 (pkcs1, oaep, no, x931, sslv23, pss)
        #[arg(short, long)]
        padding: Option<String>,

        /// 读取私钥的口令
        #[arg(long)]
        passphrase: Option<String>,

        /// 密文输出文件 (hex)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// RSA 解密
    Decrypt {
        /// 密钥文件路径
        #[arg(short, long)]
        key: String,

        /// 密文文件路径 (hex)
        #[arg(short, long)]
        file: String,

        /// 填充模式 (pkcs1, oaep, no, x931, sslv23, pss)
        #[arg(short, long)]
        padding: Option<String>,

        /// 读取私钥的口令
        #[arg(long)]
        passphrase: Option<String>,

        /// 明文输出文件
        #[arg(short, long)]
        output: Option<String>,
    },

    /// DH 密钥协商
    Dh {
        /// 本地 DH 私钥文件
        #[arg(short, long)]
        key: String,

        /// 对端 DH 公钥文件
        #[arg(long)]
        peer: String,

        /// 读取私钥的口令
        #[arg(long)]
        passphrase: Option<String>,

        /// 共享密钥输出文件 (hex)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 解析错误码
    Errors {
        /// 错误码 (如 0x03000002)
        code: String,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    debug!(
        cipher = %settings.default_cipher(),
        digest = %settings.default_digest(),
        "settings loaded"
    );
    let envelope = Envelope::from_settings(&settings);
    let default_digest = settings.default_digest().into();

    let result = match cli.command {
        Commands::Generate {
            algorithm,
            bits,
            exponent,
            generator,
            seed,
            params,
            raw,
            passphrase,
            output,
        } => commands::generate::handle(GenerateArgs {
            algorithm,
            bits,
            exponent,
            generator,
            seed,
            params,
            raw,
            passphrase,
            output,
        }),
        Commands::Export {
            key,
            passphrase,
            public,
            raw,
            out_passphrase,
            output,
        } => commands::export::handle(key, passphrase, public, raw, out_passphrase, output),
        Commands::Info { key, passphrase } => commands::info::handle(key, passphrase),
        Commands::Sign {
            file,
            key,
            digest,
            passphrase,
            output,
        } => commands::sign::handle(file, key, digest, passphrase, output, default_digest),
        Commands::Verify {
            file,
            key,
            signature,
            digest,
        } => commands::verify::handle(file, key, signature, digest, default_digest),
        Commands::Seal {
            file,
            recipient,
            cipher,
            output,
        } => commands::seal::handle(&envelope, file, recipient, cipher, output),
        Commands::Open {
            envelope: path,
            key,
            index,
            cipher,
            passphrase,
            output,
        } => commands::open::handle(
            &envelope,
            OpenArgs {
                envelope: path,
                key,
                index,
                cipher,
                passphrase,
                output,
            },
        ),
        Commands::Encrypt {
            key,
            file,
            padding,
            passphrase,
            output,
        } => commands::encrypt::handle(key, file, padding, passphrase, output),
        Commands::Decrypt {
            key,
            file,
            padding,
            passphrase,
            output,
        } => commands::decrypt::handle(key, file, padding, passphrase, output),
        Commands::Dh {
            key,
            peer,
            passphrase,
            output,
        } => commands::dh::handle(key, peer, passphrase, output),
        Commands::Errors { code } => commands::errors::handle(code),
    };

    commands::errors::drain(cli.verbose);
    if let Err(e) = &result {
        if let Some(code) = e.code() {
            eprintln!("错误码: {:08X}", code);
        }
    }
    result
}
