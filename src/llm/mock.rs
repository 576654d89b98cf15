//! Mock LLM 客户端：仅在 `llm.provider = "mock"` 时使用（本地演示、界面调试）
//!
//! 取最后一条 User 消息中的 TASK 行和 Context 段，拼成一份带表格的 Markdown 样例。

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError, Message, Role};

/// Mock 客户端：按请求内容生成固定格式的策略文档
#[derive(Debug, Default)]
pub struct MockLlmClient;

#[async_trait]
impl LlmClient for MockLlmClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or("");

        let task = last_user
            .lines()
            .find_map(|l| l.trim().strip_prefix("TASK:"))
            .map(str::trim)
            .unwrap_or("Strategy");

        let context: Vec<(&str, &str)> = last_user
            .lines()
            .map(str::trim)
            .skip_while(|l| *l != "Context:")
            .skip(1)
            .map_while(|l| l.strip_prefix("- "))
            .filter_map(|l| l.split_once(": ").or_else(|| l.strip_suffix(':').map(|k| (k, ""))))
            .collect();

        let mut out = format!("### {}\n\n> Mock output (llm.provider = \"mock\").\n\n", task);
        out.push_str("| Input | Value |\n|---|---|\n");
        for (k, v) in context {
            let v = if v.is_empty() { "-" } else { v };
            out.push_str(&format!("| {} | {} |\n", k, v));
        }
        Ok(out)
    }
}
