use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::metadata::LevelFilter;

#[derive(Parser, Debug)]
#[command(version, about, author, arg_required_else_help = true)]
pub struct Cli {
    /// Log verbosity. RUST_LOG takes precedence when set.
    #[arg(
        long = "log-level",
        value_enum,
        global = true,
        env = "AES_STEPS_LOG",
        default_value_t = LogLevel::Warn
    )]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encrypt text and print every step
    Encrypt(OperationArgs),

    /// Decrypt Base64 text and print every step
    Decrypt(OperationArgs),

    /// Encrypt and decrypt a fixed 16-byte block in ECB mode
    Demo,
}

#[derive(Args, Debug)]
#[command(arg_required_else_help = true)]
pub struct OperationArgs {
    /// Plaintext to encrypt, or Base64 ciphertext to decrypt.
    #[arg(short = 't', long = "text")]
    pub text: String,

    /// 32-character key.
    #[arg(short = 'k', long = "key", env = "AES_STEPS_KEY", hide_env_values = true)]
    pub key: String,

    /// Mode of operation.
    #[arg(short = 'm', long = "mode", value_enum, default_value_t = Mode::Ecb)]
    pub mode: Mode,

    /// 16-character IV (nonce for CTR). Generated when omitted; ignored for ECB.
    #[arg(long = "iv", env = "AES_STEPS_IV")]
    pub iv: Option<String>,

    /// Write the trace as a mind map to this path.
    #[arg(short = 'e', long = "export", value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Format of the exported trace.
    #[arg(long = "format", value_enum, default_value_t = Format::Json)]
    pub format: Format,

    /// Print the response as JSON.
    #[arg(long = "json", conflicts_with = "quiet")]
    pub json: bool,

    /// Print only the result.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum, Eq, PartialEq)]
pub enum Mode {
    #[value(name = "ecb")]
    Ecb,
    #[value(name = "cbc")]
    Cbc,
    #[value(name = "cfb")]
    Cfb,
    #[value(name = "ofb")]
    Ofb,
    #[value(name = "ctr")]
    Ctr,
}

impl From<Mode> for aes_steps::Mode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Ecb => aes_steps::Mode::Ecb,
            Mode::Cbc => aes_steps::Mode::Cbc,
            Mode::Cfb => aes_steps::Mode::Cfb,
            Mode::Ofb => aes_steps::Mode::Ofb,
            Mode::Ctr => aes_steps::Mode::Ctr,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum, Eq, PartialEq)]
pub enum Format {
    Json,
    Text,
}

impl From<Format> for aes_steps::export::ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => Self::Json,
            Format::Text => Self::Text,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum, Eq, PartialEq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}
