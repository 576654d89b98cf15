//! LLM 层：客户端抽象与实现（OpenAI 兼容 / DeepSeek / Gemini / Mock / 缺 Key 时的不可用后端）

pub mod deepseek;
pub mod gemini;
pub mod message;
pub mod mock;
pub mod openai;
pub mod traits;
pub mod unavailable;

pub use deepseek::{create_deepseek_client, DEEPSEEK_REASONER};
pub use gemini::GeminiClient;
pub use message::{Message, Role};
pub use mock::MockLlmClient;
pub use openai::OpenAiClient;
pub use traits::{LlmClient, LlmError};
pub use unavailable::UnavailableLlmClient;
