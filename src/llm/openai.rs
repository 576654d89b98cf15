//! OpenAI 兼容 API 客户端
//!
//! 通过 async_openai 调用任意 OpenAI 兼容端点（可配置 base_url）；支持 DeepSeek、OpenAI、自建代理等。
//! 配置了推理强度时，请求体附带 `reasoning_effort` 字段。

use std::time::Duration;

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;

use crate::config::ReasoningEffort;
use crate::llm::{LlmClient, LlmError, Message, Role};

/// OpenAI 兼容客户端：持有 Client 与 model 名，complete 时转 Message 为 API 格式并取首条 content
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
    reasoning_effort: Option<ReasoningEffort>,
}

impl OpenAiClient {
    /// api_key 由调用方从环境变量读取后传入
    pub fn new(base_url: Option<&str>, model: &str, api_key: &str) -> Self {
        let config = if let Some(url) = base_url {
            OpenAIConfig::new().with_api_base(url).with_api_key(api_key)
        } else {
            OpenAIConfig::new().with_api_key(api_key)
        };

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
            reasoning_effort: None,
        }
    }

    /// 推理模型（o 系列等）才接受 reasoning_effort
    pub fn with_reasoning_effort(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning_effort = Some(effort);
        self
    }

    /// 传输层超时；本客户端自身不做超时控制
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        match reqwest::Client::builder().timeout(timeout).build() {
            Ok(http) => self.client = self.client.with_http_client(http),
            Err(e) => tracing::warn!("Failed to build HTTP client with timeout: {}", e),
        }
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn reasoning_effort(&self) -> Option<ReasoningEffort> {
        self.reasoning_effort
    }

    fn to_openai_messages(
        &self,
        messages: &[Message],
    ) -> Result<Vec<ChatCompletionRequestMessage>, LlmError> {
        messages
            .iter()
            .map(|m| {
                let msg = match m.role {
                    Role::System => ChatCompletionRequestSystemMessageArgs::default()
                        .content(m.content.clone())
                        .build()
                        .map(ChatCompletionRequestMessage::System),
                    Role::User => ChatCompletionRequestUserMessageArgs::default()
                        .content(m.content.clone())
                        .build()
                        .map(ChatCompletionRequestMessage::User),
                    Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                        .content(m.content.clone())
                        .build()
                        .map(ChatCompletionRequestMessage::Assistant),
                };
                msg.map_err(|e| LlmError::Request(e.to_string()))
            })
            .collect()
    }

    pub(crate) fn build_request(&self, messages: &[Message]) -> Result<CreateChatCompletionRequest, LlmError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(self.to_openai_messages(messages)?)
            .build()
            .map_err(|e| LlmError::Request(e.to_string()))?;

        match self.reasoning_effort {
            Some(effort) => apply_reasoning_effort(request, effort),
            None => Ok(request),
        }
    }
}

/// 经 JSON 写入 reasoning_effort，不依赖 SDK 中该枚举的具体路径
fn apply_reasoning_effort(
    request: CreateChatCompletionRequest,
    effort: ReasoningEffort,
) -> Result<CreateChatCompletionRequest, LlmError> {
    let mut value = serde_json::to_value(&request).map_err(|e| LlmError::Decode(e.to_string()))?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert(
            "reasoning_effort".to_string(),
            serde_json::Value::String(effort.as_str().to_string()),
        );
    }
    serde_json::from_value(value).map_err(|e| LlmError::Decode(e.to_string()))
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let request = self.build_request(messages)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                model = %self.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion usage"
            );
        }

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_carries_reasoning_effort() {
        let client = OpenAiClient::new(None, "o4-mini", "sk-test")
            .with_reasoning_effort(ReasoningEffort::High);
        let request = client
            .build_request(&[Message::user("plan a campaign")])
            .unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["reasoning_effort"], "high");
        assert_eq!(json["model"], "o4-mini");
    }

    #[test]
    fn test_request_without_effort() {
        let client = OpenAiClient::new(None, "gpt-4o-mini", "sk-test");
        let request = client
            .build_request(&[Message::system("sys"), Message::user("hi")])
            .unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("reasoning_effort").map_or(true, |v| v.is_null()));
        assert_eq!(json["messages"].as_array().map(|m| m.len()), Some(2));
    }
}
