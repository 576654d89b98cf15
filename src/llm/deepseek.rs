//! DeepSeek 预设：OpenAI 兼容端点 + 默认推理模型
//!
//! 与 OpenAI 后端一样携带配置中的推理强度和请求超时。

use std::time::Duration;

use crate::config::ReasoningEffort;
use crate::llm::OpenAiClient;

pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
pub const DEEPSEEK_REASONER: &str = "deepseek-reasoner";

/// 创建 DeepSeek 客户端；未指定模型时使用 deepseek-reasoner
pub fn create_deepseek_client(
    model: Option<&str>,
    api_key: &str,
    effort: ReasoningEffort,
    timeout: Duration,
) -> OpenAiClient {
    OpenAiClient::new(
        Some(DEEPSEEK_BASE_URL),
        model.unwrap_or(DEEPSEEK_REASONER),
        api_key,
    )
    .with_reasoning_effort(effort)
    .with_request_timeout(timeout)
}
