//! 核心编排层：标签页状态机、运行时主控循环、状态投影、构建

pub mod builder;
pub mod error;
pub mod orchestrator;
pub mod runtime;
pub mod state;

pub use builder::{create_llm_from_config, create_studio};
pub use error::ValidationError;
pub use orchestrator::{Completion, GenerationRequest, TabOrchestrator, Ticket, GENERIC_FAILURE};
pub use runtime::{spawn_studio, Command};
pub use state::UiState;
