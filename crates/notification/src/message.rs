//! 出站消息载荷
//!
//! 各渠道载荷全部为纯值结构，由渲染函数直接构造返回，不经过
//! 流式 builder。载荷交给外部分发框架序列化投递，因此只派生
//! Serialize；渲染层自身不回读这些结构。

use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// MailMessage — 邮件载荷
// ---------------------------------------------------------------------------

/// 邮件载荷
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailMessage {
    pub subject: String,
    /// 正文段落，按顺序渲染
    pub lines: Vec<String>,
    pub action: MailAction,
}

/// 邮件行动按钮
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailAction {
    pub label: String,
    pub url: String,
}

// ---------------------------------------------------------------------------
// ChatMessage — 聊天载荷
// ---------------------------------------------------------------------------

/// 聊天载荷
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// 标题文本
    pub content: String,
    pub from: ChatSender,
    pub attachment: ChatAttachment,
    pub status: MessageStatus,
}

/// 聊天消息发送者
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSender {
    pub name: String,
    pub icon_url: String,
}

/// 聊天消息附件
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAttachment {
    pub timestamp: DateTime<Utc>,
    /// 字段列表，保持渲染顺序
    pub fields: Vec<ChatField>,
    pub thumb_url: String,
    /// 客户端不支持富文本时的降级文本
    pub fallback: String,
    pub footer: String,
    pub footer_icon: String,
    /// 侧边颜色条（#RRGGBB）
    pub color: String,
}

impl ChatAttachment {
    /// 按标题查找字段值
    pub fn field(&self, title: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.title == title)
            .map(|f| f.value.as_str())
    }
}

/// 聊天消息附件字段
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatField {
    pub title: String,
    pub value: String,
}

impl ChatField {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
        }
    }
}

/// 消息状态标记
///
/// 分发框架按状态决定消息的强调样式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageStatus {
    Success,
    Error,
}
