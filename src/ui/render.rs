//! 界面渲染
//!
//! 左侧为活动参数表单，右侧上方是 9 个标签页（Loading 时带忙碌标记），下方内容区按当前标签页状态绘制：
//! 未提交提示 / 初始化 / 生成中 / 错误 + 重试 / Markdown 结果 + 复制。

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Tabs, Wrap},
    Frame,
};

use crate::campaign::{CampaignField, TabRecord, TabStatus};
use crate::core::UiState;
use crate::ui::app::{Focus, ViewState};
use crate::ui::markdown::{render_markdown, wrapped_height, ACCENT};

const SIDEBAR_WIDTH: u16 = 40;
const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// 绘制一帧；把内容区可滚动的最大偏移写入 max_scroll 供外部 clamp
pub fn draw(f: &mut Frame, state: &UiState, view: &ViewState, max_scroll: &mut usize) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(f.area());

    draw_sidebar(f, columns[0], state, view);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(columns[1]);

    draw_tab_strip(f, main[0], state, view);
    *max_scroll = draw_content(f, main[1], state, view);
}

fn draw_sidebar(f: &mut Frame, area: Rect, state: &UiState, view: &ViewState) {
    let block = Block::default()
        .title(" Campaign Inputs ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(3); CampaignField::ALL.len()];
    constraints.push(Constraint::Length(3));
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in CampaignField::ALL.iter().enumerate() {
        let focused = view.focus == Focus::Field(*field);
        let value = view.form.get(*field);
        let title = if field.is_required() {
            format!(" {} * ", field.label())
        } else {
            format!(" {} ", field.label())
        };
        let border = if focused {
            Style::default().fg(ACCENT)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let body = if value.is_empty() {
            Line::from(Span::styled(
                field.placeholder(),
                Style::default().fg(Color::DarkGray),
            ))
        } else if focused {
            Line::from(vec![Span::raw(value.to_string()), Span::styled("▏", Style::default().fg(ACCENT))])
        } else {
            Line::from(value.to_string())
        };
        let widget = Paragraph::new(body).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border),
        );
        f.render_widget(widget, rows[i]);
    }

    let ready = view.form.is_ready();
    let label = if state.submitted {
        " Enter ⏎  Regenerate Strategy "
    } else {
        " Enter ⏎  Generate Strategy "
    };
    let button_style = if ready {
        Style::default().fg(Color::White).bg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let button = Paragraph::new(Line::from(Span::styled(label, button_style)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    f.render_widget(button, rows[CampaignField::ALL.len()]);

    if let Some(notice) = &state.notice {
        let warn = Paragraph::new(Line::from(Span::styled(
            format!("⚠ {}", notice),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )))
        .wrap(Wrap { trim: true });
        f.render_widget(warn, rows[CampaignField::ALL.len() + 1]);
    }
}

fn tab_title(record: &TabRecord, frame: usize) -> Line<'static> {
    let mut spans = vec![Span::raw(format!("{} {}", record.icon, record.label))];
    match record.status {
        TabStatus::Loading => spans.push(Span::styled(
            format!(" {}", SPINNER[frame / 2 % SPINNER.len()]),
            Style::default().fg(ACCENT),
        )),
        TabStatus::Error => spans.push(Span::styled(" !", Style::default().fg(Color::Red))),
        _ => {}
    }
    Line::from(spans)
}

fn draw_tab_strip(f: &mut Frame, area: Rect, state: &UiState, view: &ViewState) {
    let titles: Vec<Line> = state.tabs.iter().map(|r| tab_title(r, view.frame)).collect();
    let border = if view.focus == Focus::Tabs {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let tabs = Tabs::new(titles)
        .select(state.active.index())
        .block(Block::default().borders(Borders::ALL).border_style(border))
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD | Modifier::UNDERLINED))
        .padding(" ", "")
        .divider("│");
    f.render_widget(tabs, area);
}

fn centered(f: &mut Frame, area: Rect, block: Block, lines: Vec<Line<'static>>) {
    let inner = block.inner(area);
    f.render_widget(block, area);
    let top = inner.height.saturating_sub(lines.len() as u16) / 2;
    let body = Rect {
        y: inner.y + top,
        height: inner.height.saturating_sub(top),
        ..inner
    };
    let paragraph = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, body);
}

/// 返回最大滚动偏移
fn draw_content(f: &mut Frame, area: Rect, state: &UiState, view: &ViewState) -> usize {
    let record = state.active_record();
    let hint = " Tab focus │ ←→ / 1-9 tabs │ r retry │ c copy │ Ctrl+G generate │ Ctrl+Q quit ";
    let title = format!(" {} {} ", record.icon, record.label);
    let block = Block::default()
        .title(title)
        .title_bottom(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if !state.submitted {
        centered(
            f,
            area,
            block,
            vec![
                Line::from(Span::styled(
                    "Ready to build your strategy",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Fill in the campaign inputs on the left and press Enter to generate.",
                    Style::default().fg(Color::Gray),
                )),
            ],
        );
        return 0;
    }

    match record.status {
        TabStatus::Idle => {
            centered(
                f,
                area,
                block,
                vec![Line::from(Span::styled("Initializing…", Style::default().fg(Color::Gray)))],
            );
            0
        }
        TabStatus::Loading => {
            centered(
                f,
                area,
                block,
                vec![
                    Line::from(Span::styled(
                        format!("{} Generating {} strategy…", SPINNER[view.frame / 2 % SPINNER.len()], record.label),
                        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(
                        "You can switch tabs meanwhile; the result will be waiting here.",
                        Style::default().fg(Color::Gray),
                    )),
                ],
            );
            0
        }
        TabStatus::Error => {
            let message = record.error.clone().unwrap_or_default();
            centered(
                f,
                area,
                block.border_style(Style::default().fg(Color::Red)),
                vec![
                    Line::from(Span::styled(
                        "Generation Failed",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(message),
                    Line::from(""),
                    Line::from(Span::styled("Press r to retry", Style::default().fg(ACCENT))),
                ],
            );
            0
        }
        TabStatus::Success => draw_result(f, area, block, record, view),
    }
}

fn draw_result(f: &mut Frame, area: Rect, block: Block, record: &TabRecord, view: &ViewState) -> usize {
    let copy_label = if view.copied.is_visible(Instant::now()) {
        Span::styled(" ✓ Copied ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
    } else {
        Span::styled(" c Copy ", Style::default().fg(Color::Gray))
    };
    let block = block.title(Line::from(copy_label).alignment(Alignment::Right));

    let inner = block.inner(area);
    // 右侧留一列给滚动条
    let content_width = inner.width.saturating_sub(1) as usize;
    let lines = render_markdown(&record.content, content_width);
    let total = wrapped_height(&lines, content_width);
    let height = inner.height as usize;
    let max_scroll = total.saturating_sub(height);
    let offset = view.scroll.min(max_scroll);

    f.render_widget(block, area);
    let text_area = Rect {
        width: inner.width.saturating_sub(1),
        ..inner
    };
    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .scroll((offset.min(u16::MAX as usize) as u16, 0));
    f.render_widget(paragraph, text_area);

    if total > height {
        let mut scrollbar_state = ScrollbarState::new(total)
            .position(offset)
            .viewport_content_length(height);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .thumb_symbol("█")
            .track_symbol(Some("░"));
        f.render_stateful_widget(scrollbar, inner, &mut scrollbar_state);
    }

    max_scroll
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::campaign::TabId;

    fn render(state: &UiState, view: &ViewState) -> String {
        let backend = TestBackend::new(140, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut max_scroll = 0;
        terminal
            .draw(|f| draw(f, state, view, &mut max_scroll))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_prompt_to_fill_before_submit() {
        let screen = render(&UiState::default(), &ViewState::default());
        assert!(screen.contains("Ready to build your strategy"));
        assert!(screen.contains("Orchestration"));
        assert!(screen.contains("Lead Magnets"));
        assert!(screen.contains("Target Industries *"));
    }

    #[test]
    fn test_error_view_and_notice() {
        let mut state = UiState {
            submitted: true,
            notice: Some("Please enter target industries at minimum.".to_string()),
            ..UiState::default()
        };
        let record = state.tabs.get_mut(TabId::Orchestration);
        record.start_loading();
        record.fail("upstream quota exceeded".to_string());

        let screen = render(&state, &ViewState::default());
        assert!(screen.contains("Generation Failed"));
        assert!(screen.contains("upstream quota exceeded"));
        assert!(screen.contains("Press r to retry"));
        assert!(screen.contains("Please enter target"));
    }

    #[test]
    fn test_success_renders_markdown() {
        let mut state = UiState {
            submitted: true,
            ..UiState::default()
        };
        state
            .tabs
            .get_mut(TabId::Orchestration)
            .succeed("### ICP Breakdown\n\n| Industry | Trigger |\n|---|---|\n| SaaS | Churn |\n".to_string());

        let screen = render(&state, &ViewState::default());
        assert!(screen.contains("### ICP Breakdown"));
        assert!(screen.contains("Industry │ Trigger"));
        assert!(screen.contains("c Copy"));
    }
}
