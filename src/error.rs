//! 错误处理模块
//!
//! 定义应用程序的错误类型和表单校验错误。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// 表单校验失败
    #[error("参数验证失败: {0}")]
    Validation(#[from] ValidationError),

    /// 下标或资源不存在
    #[error("资源不存在: {0}")]
    NotFound(String),

    /// 当前界面/步骤不允许该操作
    #[error("非法状态转换: 在 {from} 状态下不能执行 {action}")]
    InvalidTransition { from: String, action: String },

    /// 编辑器已提交或已取消
    #[error("编辑器已关闭")]
    EditorClosed,

    /// 向导已完成，完成回调只会触发一次
    #[error("紧急向导已完成")]
    AlreadyCompleted,

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

impl AppError {
    /// 构造非法状态转换错误
    pub fn invalid_transition(from: impl std::fmt::Display, action: &str) -> Self {
        AppError::InvalidTransition {
            from: from.to_string(),
            action: action.to_string(),
        }
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

/// Form validation error types
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Required field '{field}' is missing")]
    MissingField { field: String },

    #[error("Field '{field}' is not a valid email: {value}")]
    InvalidEmail { field: String, value: String },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field } => field.as_str(),
            Self::InvalidEmail { field, .. } => field.as_str(),
        }
    }
}

/// Validation result type
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;
