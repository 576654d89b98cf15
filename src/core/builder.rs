//! 工作台构建：加载配置、选择 LLM 后端、组装生成器并启动运行时

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::config::{load_config, AppConfig};
use crate::core::{spawn_studio, Command, UiState};
use crate::generation::LlmGenerator;
use crate::llm::{
    create_deepseek_client, GeminiClient, LlmClient, LlmError, MockLlmClient, OpenAiClient,
    UnavailableLlmClient,
};

const DEFAULT_OPENAI_MODEL: &str = "o4-mini";

const GEMINI_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];
const OPENAI_KEY_VARS: &[&str] = &["OPENAI_API_KEY"];
const DEEPSEEK_KEY_VARS: &[&str] = &["DEEPSEEK_API_KEY"];

/// 根据配置与环境变量选择 LLM 后端
///
/// - `mock` 是唯一的离线后端，只能显式配置
/// - 配置的后端缺少 Key 时，返回每次调用都失败的客户端（标签页进入 Error）
/// - 未知 provider 视为配置错误
pub fn create_llm_from_config(cfg: &AppConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    create_llm_with_keys(cfg, |name| std::env::var(name).ok())
}

fn create_llm_with_keys(
    cfg: &AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Arc<dyn LlmClient>, LlmError> {
    let key = |names: &[&str]| {
        names
            .iter()
            .find_map(|n| lookup(*n))
            .filter(|v| !v.trim().is_empty())
    };
    let provider = cfg.llm.provider.trim().to_lowercase();
    let effort = cfg.llm.reasoning_effort;

    let client: Arc<dyn LlmClient> = match provider.as_str() {
        "gemini" => match key(GEMINI_KEY_VARS) {
            Some(k) => {
                let client = gemini_client(cfg, &k)?;
                tracing::info!(
                    "Using Gemini LLM ({}, thinking budget {})",
                    client.model(),
                    client.thinking_budget()
                );
                Arc::new(client)
            }
            None => missing_key("gemini", GEMINI_KEY_VARS[0]),
        },
        "openai" => match key(OPENAI_KEY_VARS) {
            Some(k) => {
                let client = openai_client(cfg, &k);
                tracing::info!("Using OpenAI LLM ({}, effort {})", client.model(), effort.as_str());
                Arc::new(client)
            }
            None => missing_key("openai", OPENAI_KEY_VARS[0]),
        },
        "deepseek" => match key(DEEPSEEK_KEY_VARS) {
            Some(k) => {
                let client = deepseek_client(cfg, &k);
                tracing::info!("Using DeepSeek LLM ({}, effort {})", client.model(), effort.as_str());
                Arc::new(client)
            }
            None => missing_key("deepseek", DEEPSEEK_KEY_VARS[0]),
        },
        "mock" => {
            tracing::info!("Using Mock LLM");
            Arc::new(MockLlmClient)
        }
        other => {
            return Err(LlmError::Config(format!(
                "Unknown LLM provider '{}' (expected gemini, openai, deepseek or mock)",
                other
            )))
        }
    };
    Ok(client)
}

fn missing_key(backend: &str, env_var: &str) -> Arc<dyn LlmClient> {
    tracing::warn!("{} is not set; {} requests will fail until it is", env_var, backend);
    Arc::new(UnavailableLlmClient::missing_key(backend, env_var))
}

fn request_timeout(cfg: &AppConfig) -> Duration {
    Duration::from_secs(cfg.llm.timeouts.request)
}

fn gemini_client(cfg: &AppConfig, api_key: &str) -> Result<GeminiClient, LlmError> {
    let model = cfg
        .llm
        .gemini
        .model
        .clone()
        .unwrap_or_else(|| cfg.llm.model.clone());
    GeminiClient::new(
        cfg.llm.base_url.as_deref(),
        &model,
        api_key,
        cfg.llm.reasoning_effort,
        request_timeout(cfg),
    )
}

fn openai_client(cfg: &AppConfig, api_key: &str) -> OpenAiClient {
    let model = cfg
        .llm
        .openai
        .model
        .clone()
        .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
    OpenAiClient::new(cfg.llm.base_url.as_deref(), &model, api_key)
        .with_reasoning_effort(cfg.llm.reasoning_effort)
        .with_request_timeout(request_timeout(cfg))
}

fn deepseek_client(cfg: &AppConfig, api_key: &str) -> OpenAiClient {
    create_deepseek_client(
        cfg.llm.deepseek.model.as_deref(),
        api_key,
        cfg.llm.reasoning_effort,
        request_timeout(cfg),
    )
}

/// 创建工作台：返回配置、命令发送端、状态接收端
pub async fn create_studio(
    config_path: Option<PathBuf>,
    shutdown: CancellationToken,
) -> anyhow::Result<(
    AppConfig,
    mpsc::UnboundedSender<Command>,
    watch::Receiver<UiState>,
)> {
    let cfg = load_config(config_path).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });

    let llm = create_llm_from_config(&cfg).context("Invalid LLM configuration")?;
    let generator = Arc::new(LlmGenerator::new(llm));
    let (cmd_tx, state_rx) = spawn_studio(generator, cfg.app.initial_tab(), shutdown);

    Ok((cfg, cmd_tx, state_rx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::{CampaignField, TabId, TabStatus};
    use crate::config::ReasoningEffort;
    use crate::core::{Completion, TabOrchestrator};
    use crate::generation::{GenerationClient, GenerationError};

    fn no_keys(_: &str) -> Option<String> {
        None
    }

    fn with_key(name: &str) -> Option<String> {
        Some(format!("key-for-{}", name))
    }

    #[test]
    fn test_mock_provider() {
        let mut cfg = AppConfig::default();
        cfg.llm.provider = "mock".to_string();
        let llm = create_llm_with_keys(&cfg, no_keys).unwrap();
        assert_eq!(llm.name(), "mock");
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        let mut cfg = AppConfig::default();
        cfg.llm.provider = "carrier-pigeon".to_string();
        let result = create_llm_with_keys(&cfg, with_key);
        assert!(matches!(result, Err(LlmError::Config(ref m)) if m.contains("carrier-pigeon")));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let mut cfg = AppConfig::default();
        cfg.llm.provider = "openai".to_string();
        let llm = create_llm_with_keys(&cfg, |_| Some("   ".to_string())).unwrap();
        assert_eq!(llm.name(), "openai");
    }

    #[tokio::test]
    async fn test_missing_key_lands_tab_in_error() {
        // 默认 provider 为 gemini
        let cfg = AppConfig::default();
        let llm = create_llm_with_keys(&cfg, no_keys).unwrap();
        assert_eq!(llm.name(), "gemini");
        let generator = LlmGenerator::new(llm);

        let mut orch = TabOrchestrator::new(TabId::Orchestration);
        orch.set_field(CampaignField::TargetIndustries, "SaaS");
        let request = orch.submit().unwrap().unwrap();

        let result = generator.generate(request.tab, &request.params).await;
        assert_eq!(
            result,
            Err(GenerationError::Upstream(
                "Config error: GEMINI_API_KEY is not set".to_string()
            ))
        );

        assert!(orch.complete(Completion {
            tab: request.tab,
            ticket: request.ticket,
            result,
        }));
        let record = orch.active_record();
        assert_eq!(record.status, TabStatus::Error);
        assert!(record.content.is_empty());
        assert_eq!(
            record.error.as_deref(),
            Some("Config error: GEMINI_API_KEY is not set")
        );
    }

    #[test]
    fn test_every_remote_backend_gets_reasoning_effort() {
        let mut cfg = AppConfig::default();
        cfg.llm.reasoning_effort = ReasoningEffort::High;

        let openai = openai_client(&cfg, "sk-test");
        assert_eq!(openai.reasoning_effort(), Some(ReasoningEffort::High));

        let deepseek = deepseek_client(&cfg, "sk-test");
        assert_eq!(deepseek.reasoning_effort(), Some(ReasoningEffort::High));
        assert_eq!(deepseek.model(), "deepseek-reasoner");

        let gemini = gemini_client(&cfg, "test-key").unwrap();
        assert_eq!(gemini.thinking_budget(), 4096);
    }
}
