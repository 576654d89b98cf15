//! Markdown → ratatui 行
//!
//! 覆盖策略文档里常见的结构：标题、段落、有序/无序列表、引用、代码块、表格、粗体/斜体/行内代码。
//! 表格按列宽对齐，超出可用宽度时截断单元格。

use pulldown_cmark::{Event, Options, Parser, Tag};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// 主题强调色
pub const ACCENT: Color = Color::Rgb(0, 67, 255);

/// 已打开的块级/行内结构（按嵌套顺序入栈，End 时出栈）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Open {
    Paragraph,
    Heading(usize),
    BlockQuote,
    CodeBlock,
    List,
    Item,
    Table,
    TableHead,
    TableRow,
    TableCell,
    Strong,
    Emphasis,
    Other,
}

#[derive(Default)]
struct TableBuf {
    header: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
}

struct Renderer {
    width: usize,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    stack: Vec<Open>,
    /// 列表层级：Some(n) 为有序列表的下一个序号
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    strong: usize,
    emphasis: usize,
    heading: Option<usize>,
    code: Option<String>,
    table: Option<TableBuf>,
}

impl Renderer {
    fn new(width: usize) -> Self {
        Self {
            width: width.max(20),
            lines: Vec::new(),
            spans: Vec::new(),
            stack: Vec::new(),
            lists: Vec::new(),
            quote_depth: 0,
            strong: 0,
            emphasis: 0,
            heading: None,
            code: None,
            table: None,
        }
    }

    fn text_style(&self) -> Style {
        let mut style = match self.heading {
            Some(1) | Some(2) => Style::default()
                .fg(ACCENT)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            Some(_) => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            None => Style::default(),
        };
        if self.strong > 0 {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.emphasis > 0 {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.quote_depth > 0 {
            style = style.fg(Color::Gray).add_modifier(Modifier::ITALIC);
        }
        style
    }

    fn quote_prefix(&self) -> Option<Span<'static>> {
        (self.quote_depth > 0).then(|| {
            Span::styled("│ ".repeat(self.quote_depth), Style::default().fg(ACCENT))
        })
    }

    fn flush_line(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let mut spans = Vec::with_capacity(self.spans.len() + 1);
        spans.extend(self.quote_prefix());
        spans.append(&mut self.spans);
        self.lines.push(Line::from(spans));
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|l| !l.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(code) = self.code.as_mut() {
            code.push_str(text);
        } else if let Some(table) = self.table.as_mut() {
            table.cell.push_str(text);
        } else {
            let style = self.text_style();
            self.spans.push(Span::styled(text.to_string(), style));
        }
    }

    fn start(&mut self, tag: Tag) {
        let open = match tag {
            Tag::Paragraph => Open::Paragraph,
            Tag::Heading { level, .. } => {
                self.flush_line();
                let level = level as usize;
                self.heading = Some(level);
                if level > 2 {
                    self.spans.push(Span::styled(
                        format!("{} ", "#".repeat(level)),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                Open::Heading(level)
            }
            Tag::BlockQuote(_) => {
                self.flush_line();
                self.quote_depth += 1;
                Open::BlockQuote
            }
            Tag::CodeBlock(_) => {
                self.flush_line();
                self.code = Some(String::new());
                Open::CodeBlock
            }
            Tag::List(start) => {
                self.flush_line();
                self.lists.push(start);
                Open::List
            }
            Tag::Item => {
                self.flush_line();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{}. ", n);
                        *n += 1;
                        m
                    }
                    _ => "• ".to_string(),
                };
                self.spans.push(Span::styled(
                    format!("{}{}", "  ".repeat(depth), marker),
                    Style::default().fg(ACCENT),
                ));
                Open::Item
            }
            Tag::Table(_) => {
                self.flush_line();
                self.table = Some(TableBuf::default());
                Open::Table
            }
            Tag::TableHead => Open::TableHead,
            Tag::TableRow => Open::TableRow,
            Tag::TableCell => Open::TableCell,
            Tag::Strong => {
                self.strong += 1;
                Open::Strong
            }
            Tag::Emphasis => {
                self.emphasis += 1;
                Open::Emphasis
            }
            _ => Open::Other,
        };
        self.stack.push(open);
    }

    fn end(&mut self) {
        let Some(open) = self.stack.pop() else {
            return;
        };
        match open {
            Open::Paragraph => {
                self.flush_line();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            Open::Heading(_) => {
                self.flush_line();
                self.heading = None;
                self.blank();
            }
            Open::BlockQuote => {
                self.flush_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.blank();
            }
            Open::CodeBlock => {
                let code = self.code.take().unwrap_or_default();
                let style = Style::default().fg(Color::LightGreen);
                for line in code.trim_end_matches('\n').lines() {
                    self.lines.push(Line::from(vec![
                        Span::styled("  ▏ ", Style::default().fg(Color::DarkGray)),
                        Span::styled(line.to_string(), style),
                    ]));
                }
                self.blank();
            }
            Open::List => {
                self.flush_line();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            Open::Item => self.flush_line(),
            Open::Table => {
                if let Some(table) = self.table.take() {
                    let rendered = render_table(table, self.width);
                    self.lines.extend(rendered);
                }
                self.blank();
            }
            Open::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.header = Some(std::mem::take(&mut table.row));
                }
            }
            Open::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                }
            }
            Open::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    let cell = std::mem::take(&mut table.cell);
                    table.row.push(cell.trim().to_string());
                }
            }
            Open::Strong => self.strong = self.strong.saturating_sub(1),
            Open::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            Open::Other => {}
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_line();
        while self.lines.last().is_some_and(|l| l.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}

fn truncate(s: &str, width: usize) -> String {
    let count = s.chars().count();
    if count <= width {
        return format!("{}{}", s, " ".repeat(width - count));
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// 列宽按内容取最大值；总宽超出时从最宽的列开始收缩
fn column_widths(table: &TableBuf, width: usize) -> Vec<usize> {
    let cols = table
        .rows
        .iter()
        .chain(table.header.iter())
        .map(|r| r.len())
        .max()
        .unwrap_or(0);
    let mut widths = vec![1usize; cols];
    for row in table.header.iter().chain(table.rows.iter()) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    // 每列之间 " │ " 占 3 列
    let budget = width.saturating_sub(cols.saturating_sub(1) * 3).max(cols * 3);
    while widths.iter().sum::<usize>() > budget {
        let Some((idx, _)) = widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
            break;
        };
        if widths[idx] <= 3 {
            break;
        }
        widths[idx] -= 1;
    }
    widths
}

fn render_row(row: &[String], widths: &[usize], style: Style) -> Line<'static> {
    let sep = Style::default().fg(Color::DarkGray);
    let mut spans = Vec::new();
    for (i, w) in widths.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", sep));
        }
        let cell = row.get(i).map(String::as_str).unwrap_or("");
        spans.push(Span::styled(truncate(cell, *w), style));
    }
    Line::from(spans)
}

fn render_table(table: TableBuf, width: usize) -> Vec<Line<'static>> {
    let widths = column_widths(&table, width);
    if widths.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    if let Some(header) = &table.header {
        out.push(render_row(
            header,
            &widths,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ));
        let rule = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        out.push(Line::from(Span::styled(rule, Style::default().fg(Color::DarkGray))));
    }
    for row in &table.rows {
        out.push(render_row(row, &widths, Style::default()));
    }
    out
}

/// 把 Markdown 文本渲染为终端行；width 为内容区可用列数（表格对齐用）
pub fn render_markdown(src: &str, width: usize) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut r = Renderer::new(width);
    for event in Parser::new_ext(src, options) {
        match event {
            Event::Start(tag) => r.start(tag),
            Event::End(_) => r.end(),
            Event::Text(text) => r.push_text(&text),
            Event::Code(code) => {
                if let Some(table) = r.table.as_mut() {
                    table.cell.push_str(&code);
                } else {
                    r.spans.push(Span::styled(
                        code.to_string(),
                        Style::default().fg(Color::Yellow),
                    ));
                }
            }
            Event::SoftBreak => r.push_text(" "),
            Event::HardBreak => r.flush_line(),
            Event::Rule => {
                r.flush_line();
                r.lines.push(Line::from(Span::styled(
                    "─".repeat(r.width.min(60)),
                    Style::default().fg(Color::DarkGray),
                )));
                r.blank();
            }
            Event::Html(html) | Event::InlineHtml(html) => r.push_text(&html),
            _ => {}
        }
    }
    r.finish()
}

/// 按可用宽度估算换行后的总行数（用于滚动边界）
pub fn wrapped_height(lines: &[Line<'_>], width: usize) -> usize {
    let width = width.max(1);
    lines
        .iter()
        .map(|l| l.width().max(1).div_ceil(width))
        .sum()
}
