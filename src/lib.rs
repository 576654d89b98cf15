//! Strategist - 终端营销策略工作台
//!
//! 模块划分：
//! - **campaign**: 活动参数与 9 个标签页的数据模型
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 标签页状态机、运行时主控循环、状态投影
//! - **generation**: 生成客户端（一次调用 = 一次外部生成）
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / DeepSeek / Gemini / Mock）
//! - **observability**: 日志
//! - **prompts**: 按标签页构建请求文本
//! - **ui**: Ratatui TUI 界面

pub mod campaign;
pub mod config;
pub mod core;
pub mod generation;
pub mod llm;
pub mod observability;
pub mod prompts;
pub mod ui;

pub use campaign::{CampaignField, CampaignParameters, TabId, TabStatus};
pub use core::{spawn_studio, Command, TabOrchestrator, UiState};
pub use generation::{GenerationClient, GenerationError};
