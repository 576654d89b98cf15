//! 编排层错误类型
//!
//! 校验失败同步返回给调用方，不改动任何状态；生成失败见 `generation::GenerationError`，在编排器边界转为标签页的 Error 状态。

use thiserror::Error;

/// 提交前的输入校验失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter target industries at minimum.")]
    MissingTargetIndustries,
}
