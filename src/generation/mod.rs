//! 生成客户端：一次调用 = 一次外部文本生成
//!
//! 编排器只依赖 GenerationClient trait；生产实现 LlmGenerator 负责构建 Prompt 并调用一个 LlmClient。
//! 不做重试，不做超时（超时留给传输层）。

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::campaign::{CampaignParameters, TabId};
use crate::llm::{LlmClient, LlmError, Message};
use crate::prompts::build_prompt;

/// 生成失败：上游报错、返回空文本，或 Prompt 为空
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("{0}")]
    Upstream(String),

    #[error("No content generated.")]
    EmptyResponse,

    #[error("Refusing to send an empty prompt for tab '{0}'")]
    EmptyPrompt(String),
}

impl From<LlmError> for GenerationError {
    fn from(e: LlmError) -> Self {
        GenerationError::Upstream(e.to_string())
    }
}

/// 生成客户端 trait：每次调用相互独立
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(
        &self,
        tab: TabId,
        params: &CampaignParameters,
    ) -> Result<String, GenerationError>;
}

/// 基于 LlmClient 的生成器
pub struct LlmGenerator {
    llm: Arc<dyn LlmClient>,
}

impl LlmGenerator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// 发送一段已构建好的 Prompt；空 Prompt 直接判为失败
    pub async fn generate_from_prompt(
        &self,
        tab_key: &str,
        prompt: String,
    ) -> Result<String, GenerationError> {
        if prompt.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt(tab_key.to_string()));
        }

        let text = self.llm.complete(&[Message::user(prompt)]).await?;
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl GenerationClient for LlmGenerator {
    async fn generate(
        &self,
        tab: TabId,
        params: &CampaignParameters,
    ) -> Result<String, GenerationError> {
        tracing::debug!(tab = %tab, backend = self.llm.name(), "Generating tab content");
        let result = self
            .generate_from_prompt(tab.key(), build_prompt(tab, params))
            .await;
        if let Err(e) = &result {
            tracing::error!(tab = %tab, "Error generating content: {}", e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::llm::MockLlmClient;
    use crate::prompts::build_prompt_for_key;

    /// 记录收到的消息并返回固定结果
    struct ScriptedLlm {
        reply: Result<String, String>,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
            self.seen
                .lock()
                .unwrap()
                .extend(messages.iter().map(|m| m.content.clone()));
            self.reply.clone().map_err(LlmError::Request)
        }
    }

    fn params() -> CampaignParameters {
        CampaignParameters {
            target_industries: "SaaS".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_generate_sends_built_prompt() {
        let llm = Arc::new(ScriptedLlm {
            reply: Ok("## Plan".to_string()),
            seen: Mutex::new(Vec::new()),
        });
        let generator = LlmGenerator::new(llm.clone());
        let out = generator.generate(TabId::Ads, &params()).await.unwrap();
        assert_eq!(out, "## Plan");
        assert_eq!(
            llm.seen.lock().unwrap().as_slice(),
            &[build_prompt(TabId::Ads, &params())]
        );
    }

    #[tokio::test]
    async fn test_blank_response_is_failure() {
        let llm = Arc::new(ScriptedLlm {
            reply: Ok("  \n".to_string()),
            seen: Mutex::new(Vec::new()),
        });
        let err = LlmGenerator::new(llm)
            .generate(TabId::Seo, &params())
            .await
            .unwrap_err();
        assert_eq!(err, GenerationError::EmptyResponse);
        assert_eq!(err.to_string(), "No content generated.");
    }

    #[tokio::test]
    async fn test_upstream_message_is_kept() {
        let llm = Arc::new(ScriptedLlm {
            reply: Err("upstream quota exceeded".to_string()),
            seen: Mutex::new(Vec::new()),
        });
        let err = LlmGenerator::new(llm)
            .generate(TabId::Seo, &params())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("upstream quota exceeded"));
    }

    #[tokio::test]
    async fn test_empty_prompt_never_reaches_llm() {
        let llm = Arc::new(ScriptedLlm {
            reply: Ok("unused".to_string()),
            seen: Mutex::new(Vec::new()),
        });
        let generator = LlmGenerator::new(llm.clone());
        let prompt = build_prompt_for_key("billboards", &params());
        let err = generator
            .generate_from_prompt("billboards", prompt)
            .await
            .unwrap_err();
        assert_eq!(err, GenerationError::EmptyPrompt("billboards".to_string()));
        assert!(llm.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_with_mock_backend() {
        let generator = LlmGenerator::new(Arc::new(MockLlmClient));
        let out = generator.generate(TabId::Pr, &params()).await.unwrap();
        assert!(out.contains("PR & Communications Plan"));
    }
}
