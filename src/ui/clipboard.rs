//! 复制到剪贴板：OSC 52 终端序列
//!
//! 终端（含 SSH 会话）收到 `ESC ] 52 ; c ; <base64> BEL` 后写入系统剪贴板；
//! 复制成功后显示 2 秒的「已复制」提示。

use std::io::{self, Write};
use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// 「已复制」提示的显示时长
pub const COPIED_INDICATOR: Duration = Duration::from_secs(2);

/// 生成 OSC 52 序列
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

/// 写入 stdout 并 flush
pub fn copy_to_clipboard(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(osc52_sequence(text).as_bytes())?;
    stdout.flush()
}

/// 一次性的复制提示
#[derive(Debug, Default, Clone, Copy)]
pub struct CopyIndicator {
    copied_at: Option<Instant>,
}

impl CopyIndicator {
    pub fn mark(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < COPIED_INDICATOR)
    }
}
