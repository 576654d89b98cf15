//! Strategist - 终端营销策略工作台
//!
//! 入口：初始化日志、加载配置并启动运行时，然后运行 TUI 主循环。

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use strategist::{core::create_studio, observability, ui::run_app};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init(Path::new(observability::DEFAULT_LOG_FILE))
        .context("Failed to initialize logging")?;

    // 可选：第一个参数为额外的配置文件
    let config_path = std::env::args().nth(1).map(PathBuf::from);

    let shutdown = CancellationToken::new();
    let (cfg, cmd_tx, state_rx) = create_studio(config_path, shutdown.clone())
        .await
        .context("Failed to create studio")?;

    tracing::info!(
        "{} started",
        cfg.app.name.as_deref().unwrap_or("Strategist")
    );

    let result = run_app(state_rx, cmd_tx, Duration::from_millis(cfg.app.tick_ms.max(10)))
        .await
        .context("App run failed");

    shutdown.cancel();
    result
}
