//! TUI 层：Ratatui + crossterm，主循环（app）、事件（event）、渲染（render）、Markdown、剪贴板

pub mod app;
pub mod clipboard;
pub mod event;
pub mod markdown;
pub mod render;

pub use app::run_app;
pub use event::EventHandler;
pub use render::draw;
