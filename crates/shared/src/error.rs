//! 统一错误处理模块
//!
//! 定义各 crate 共享的错误类型，使用 thiserror 提供良好的错误信息。
//! 渲染层自身不处理失败，错误原样上抛给外部分发框架，由其按自身策略
//! 决定记录、丢弃或重试。

use thiserror::Error;

/// 系统错误类型
#[derive(Debug, Error)]
pub enum KillfeedError {
    // ==================== 名称解析错误 ====================
    #[error("名称解析失败: {category} id={id}")]
    UnresolvedId { category: String, id: i64 },

    // ==================== 外部服务错误 ====================
    #[error("外部服务错误: {service} - {message}")]
    ExternalService { service: String, message: String },

    // ==================== 通用错误 ====================
    #[error("内部错误: {0}")]
    Internal(String),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, KillfeedError>;

impl KillfeedError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnresolvedId { .. } => "UNRESOLVED_ID",
            Self::ExternalService { .. } => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 是否为可重试错误
    ///
    /// 解析失败通常意味着上游数据缺失，重试无意义；
    /// 外部服务错误多为瞬时故障，分发框架可按自身策略重试。
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ExternalService { .. })
    }
}
