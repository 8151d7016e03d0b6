//! 通知渲染错误类型
//!
//! 定义事件路由、载荷解码和渲染等场景的错误分类。渲染层不做任何
//! 恢复处理，错误上抛给外部分发框架，由其按自身策略记录或重试。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("未注册该事件类型的通知构建器: {kind}")]
    UnknownEventKind { kind: String },

    #[error("事件载荷解码失败: {0}")]
    PayloadDecode(String),

    #[error("击毁记录缺少最后一击攻击者: killmail_id={killmail_id}")]
    MissingFinalBlow { killmail_id: i64 },

    #[error(transparent)]
    Shared(#[from] killfeed_shared::error::KillfeedError),
}
