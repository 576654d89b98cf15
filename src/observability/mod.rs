//! 可观测性：tracing 订阅器
//!
//! TUI 占用终端，日志写入文件；默认 info，可通过 RUST_LOG 覆盖。

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 默认日志文件
pub const DEFAULT_LOG_FILE: &str = "logs/strategist.log";

pub fn init(log_file: &Path) -> anyhow::Result<()> {
    if let Some(dir) = log_file.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()?;
    Ok(())
}
