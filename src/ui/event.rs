//! 事件处理
//!
//! 轮询 crossterm 键盘事件：Ctrl+Q 退出、Ctrl+G 提交直接转为 Command，其余按键交给 app 按焦点处理。

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use crate::core::Command;

/// 应用事件：来自快捷键的 Command 或原始 KeyEvent
#[derive(Debug, Clone)]
pub enum AppEvent {
    Command(Command),
    Key(KeyEvent),
}

/// 事件处理器：持有 cmd_tx，poll 时读键盘并返回 AppEvent，send 转发命令给运行时
pub struct EventHandler {
    cmd_tx: mpsc::UnboundedSender<Command>,
    tick: Duration,
}

impl EventHandler {
    pub fn new(cmd_tx: mpsc::UnboundedSender<Command>, tick: Duration) -> Self {
        Self { cmd_tx, tick }
    }

    pub fn poll(&self) -> anyhow::Result<Option<AppEvent>> {
        if event::poll(self.tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(classify(key)));
                }
            }
        }
        Ok(None)
    }

    pub fn send(&self, cmd: Command) {
        if self.cmd_tx.send(cmd).is_err() {
            tracing::warn!("Studio runtime is gone, command dropped");
        }
    }
}

/// 全局快捷键优先，其余原样交给焦点处理
pub fn classify(key: KeyEvent) -> AppEvent {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') if ctrl => AppEvent::Command(Command::Quit),
        KeyCode::Char('c') if ctrl => AppEvent::Command(Command::Quit),
        KeyCode::Char('g') if ctrl => AppEvent::Command(Command::Submit),
        _ => AppEvent::Key(key),
    }
}
