//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `STRATEGIST__*` 覆盖（双下划线表示嵌套，如 `STRATEGIST__LLM__PROVIDER=openai`）。
//! API Key 不进配置文件，只从环境变量读取。

use std::path::PathBuf;

use serde::Deserialize;

use crate::campaign::TabId;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub llm: LlmSection,
}

/// [app] 段：应用名、启动标签页、TUI 轮询间隔
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    pub name: Option<String>,
    /// 启动时激活的标签页 key（如 orchestration、seo）
    #[serde(default = "default_tab_key")]
    pub default_tab: String,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: None,
            default_tab: default_tab_key(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl AppSection {
    /// 解析 default_tab；未知 key 回退到 Orchestration
    pub fn initial_tab(&self) -> TabId {
        self.default_tab.parse().unwrap_or_else(|e| {
            tracing::warn!("{}; falling back to orchestration", e);
            TabId::Orchestration
        })
    }
}

fn default_tab_key() -> String {
    TabId::Orchestration.key().to_string()
}

fn default_tick_ms() -> u64 {
    100
}

/// 推理强度：上游调用的静态配置，用延迟换质量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Low,
    #[default]
    Medium,
    High,
}

impl ReasoningEffort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasoningEffort::Low => "low",
            ReasoningEffort::Medium => "medium",
            ReasoningEffort::High => "high",
        }
    }

    /// Gemini thinkingBudget（token 数）
    pub fn thinking_budget(&self) -> u32 {
        match self {
            ReasoningEffort::Low => 512,
            ReasoningEffort::Medium => 1024,
            ReasoningEffort::High => 4096,
        }
    }
}

/// [llm] 段：后端选择、模型、推理强度与超时
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSection {
    /// 后端：openai / deepseek / gemini / mock；缺少对应 API Key 时生成请求以配置错误失败
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    pub base_url: Option<String>,
    #[serde(default)]
    pub reasoning_effort: ReasoningEffort,
    #[serde(default)]
    pub openai: LlmModelSection,
    #[serde(default)]
    pub deepseek: LlmModelSection,
    #[serde(default)]
    pub gemini: LlmModelSection,
    #[serde(default)]
    pub timeouts: LlmTimeoutsSection,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: None,
            reasoning_effort: ReasoningEffort::default(),
            openai: LlmModelSection::default(),
            deepseek: LlmModelSection::default(),
            gemini: LlmModelSection::default(),
            timeouts: LlmTimeoutsSection::default(),
        }
    }
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

/// [llm.openai] / [llm.deepseek] / [llm.gemini]：按后端覆盖模型名
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LlmModelSection {
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmTimeoutsSection {
    /// 单次请求超时（秒），由传输层执行
    #[serde(default = "default_request_timeout")]
    pub request: u64,
}

impl Default for LlmTimeoutsSection {
    fn default() -> Self {
        Self {
            request: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    120
}

/// 从 config 目录加载配置，环境变量 STRATEGIST__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 STRATEGIST__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("STRATEGIST")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
