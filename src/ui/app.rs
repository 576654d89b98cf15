//! TUI 应用主循环
//!
//! 进入全屏/原始模式，轮询 state_rx 与键盘事件，把按键按焦点翻译成 Command 发给运行时，
//! 每帧用 draw 渲染 UiState 与本地视图状态（焦点、表单缓冲、滚动、复制提示）。

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::{mpsc, watch};

use crate::campaign::{CampaignField, CampaignParameters, TabId, TabStatus};
use crate::core::{Command, UiState};
use crate::ui::clipboard::{copy_to_clipboard, CopyIndicator};
use crate::ui::event::{AppEvent, EventHandler};
use crate::ui::render::draw;

/// 输入焦点
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Field(CampaignField),
    Tabs,
}

/// 本地视图状态（不属于核心状态）
#[derive(Debug)]
pub struct ViewState {
    pub focus: Focus,
    /// 表单编辑缓冲，每次修改同步一条 SetField
    pub form: CampaignParameters,
    pub scroll: usize,
    pub copied: CopyIndicator,
    /// 动画帧计数（加载指示）
    pub frame: usize,
    last_active: Option<TabId>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            focus: Focus::Field(CampaignField::TargetIndustries),
            form: CampaignParameters::default(),
            scroll: 0,
            copied: CopyIndicator::default(),
            frame: 0,
            last_active: None,
        }
    }
}

/// 按键产生的动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Send(Command),
    Copy,
    Quit,
}

impl ViewState {
    /// 切换标签页后滚动归零
    pub fn sync(&mut self, state: &UiState) {
        if self.last_active != Some(state.active) {
            self.last_active = Some(state.active);
            self.scroll = 0;
        }
    }

    fn edit(&mut self, field: CampaignField, f: impl FnOnce(&mut String)) -> UiAction {
        let mut value = self.form.get(field).to_string();
        f(&mut value);
        self.form.set(field, value.clone());
        UiAction::Send(Command::SetField(field, value))
    }

    /// 按焦点把按键翻译为动作
    pub fn handle_key(&mut self, state: &UiState, key: KeyEvent) -> Option<UiAction> {
        match (key.code, self.focus) {
            (KeyCode::Tab, Focus::Field(f)) => {
                self.focus = f.next().map(Focus::Field).unwrap_or(Focus::Tabs);
                None
            }
            (KeyCode::Tab, Focus::Tabs) => {
                self.focus = Focus::Field(CampaignField::TargetIndustries);
                None
            }
            (KeyCode::BackTab, Focus::Field(f)) => {
                self.focus = f.prev().map(Focus::Field).unwrap_or(Focus::Tabs);
                None
            }
            (KeyCode::BackTab, Focus::Tabs) => {
                self.focus = Focus::Field(CampaignField::Budget);
                None
            }
            (KeyCode::Esc, _) => {
                self.focus = Focus::Tabs;
                None
            }
            (KeyCode::Enter, _) => Some(UiAction::Send(Command::Submit)),

            (KeyCode::Up, Focus::Field(f)) => {
                if let Some(prev) = f.prev() {
                    self.focus = Focus::Field(prev);
                }
                None
            }
            (KeyCode::Down, Focus::Field(f)) => {
                if let Some(next) = f.next() {
                    self.focus = Focus::Field(next);
                }
                None
            }
            (KeyCode::Backspace, Focus::Field(f)) => Some(self.edit(f, |v| {
                v.pop();
            })),
            // Ctrl / Alt 组合键不录入字段
            (KeyCode::Char(c), Focus::Field(f))
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(self.edit(f, |v| v.push(c)))
            }

            (KeyCode::Left | KeyCode::Char('h'), Focus::Tabs) => {
                Some(UiAction::Send(Command::SelectTab(state.active.prev())))
            }
            (KeyCode::Right | KeyCode::Char('l'), Focus::Tabs) => {
                Some(UiAction::Send(Command::SelectTab(state.active.next())))
            }
            (KeyCode::Char(c), Focus::Tabs) if c.is_ascii_digit() => {
                let n = c.to_digit(10).unwrap_or(0) as usize;
                TabId::from_ordinal(n).map(|id| UiAction::Send(Command::SelectTab(id)))
            }
            (KeyCode::Char('r'), Focus::Tabs) => match state.active_record().status {
                TabStatus::Error | TabStatus::Success => Some(UiAction::Send(Command::RetryActive)),
                _ => None,
            },
            (KeyCode::Char('c'), Focus::Tabs) => {
                (state.active_record().status == TabStatus::Success).then_some(UiAction::Copy)
            }
            (KeyCode::Char('q'), Focus::Tabs) => Some(UiAction::Quit),
            (KeyCode::Up | KeyCode::Char('k'), Focus::Tabs) => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            (KeyCode::Down | KeyCode::Char('j'), Focus::Tabs) => {
                self.scroll = self.scroll.saturating_add(1);
                None
            }
            (KeyCode::PageUp, _) => {
                self.scroll = self.scroll.saturating_sub(10);
                None
            }
            (KeyCode::PageDown, _) => {
                self.scroll = self.scroll.saturating_add(10);
                None
            }
            (KeyCode::Home, Focus::Tabs) => {
                self.scroll = 0;
                None
            }
            (KeyCode::End, Focus::Tabs) => {
                self.scroll = usize::MAX;
                None
            }
            _ => None,
        }
    }
}

/// 运行 TUI：启用原始模式与全屏，循环 poll 事件 + 渲染，退出时恢复终端
pub async fn run_app(
    mut state_rx: watch::Receiver<UiState>,
    cmd_tx: mpsc::UnboundedSender<Command>,
    tick: Duration,
) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut state_rx, cmd_tx, tick).await;

    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state_rx: &mut watch::Receiver<UiState>,
    cmd_tx: mpsc::UnboundedSender<Command>,
    tick: Duration,
) -> anyhow::Result<()> {
    let events = EventHandler::new(cmd_tx, tick);
    let mut view = ViewState::default();

    loop {
        let state = state_rx.borrow_and_update().clone();
        view.sync(&state);
        view.frame = view.frame.wrapping_add(1);

        let action = match events.poll()? {
            Some(AppEvent::Command(cmd)) => Some(if cmd == Command::Quit {
                UiAction::Quit
            } else {
                UiAction::Send(cmd)
            }),
            Some(AppEvent::Key(key)) => view.handle_key(&state, key),
            None => None,
        };

        match action {
            Some(UiAction::Quit) => {
                events.send(Command::Quit);
                break;
            }
            Some(UiAction::Send(cmd)) => events.send(cmd),
            Some(UiAction::Copy) => match copy_to_clipboard(&state.active_record().content) {
                Ok(()) => view.copied.mark(Instant::now()),
                Err(e) => tracing::warn!("Copy to clipboard failed: {}", e),
            },
            None => {}
        }

        let mut max_scroll = 0usize;
        terminal.draw(|f| draw(f, &state, &view, &mut max_scroll))?;
        view.scroll = view.scroll.min(max_scroll);

        tokio::task::yield_now().await;
    }

    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
