//! 不可用的后端：配置了 provider 但缺少 API Key
//!
//! 启动不受影响；每次调用都以配置错误失败，标签页进入 Error 并提示重试。

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError, Message};

#[derive(Debug, Clone)]
pub struct UnavailableLlmClient {
    backend: String,
    reason: String,
}

impl UnavailableLlmClient {
    /// 缺少 Key：错误信息为 "<VAR> is not set"
    pub fn missing_key(backend: &str, env_var: &str) -> Self {
        Self {
            backend: backend.to_string(),
            reason: format!("{} is not set", env_var),
        }
    }
}

#[async_trait]
impl LlmClient for UnavailableLlmClient {
    fn name(&self) -> &str {
        &self.backend
    }

    async fn complete(&self, _messages: &[Message]) -> Result<String, LlmError> {
        Err(LlmError::Config(self.reason.clone()))
    }
}
