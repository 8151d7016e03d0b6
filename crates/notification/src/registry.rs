//! 通知注册表
//!
//! 以组合替代继承：每种事件类型提供一个通知构建器，注册表按事件
//! 类型选择构建器，由外部分发框架驱动。构建器与通知本体都不持有
//! 可变状态，注册表构建完成后只读。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use killfeed_shared::config::KillboardConfig;
use killfeed_shared::events::{EventKind, IncomingEvent, Killmail, NotificationChannel};
use tracing::debug;

use crate::error::NotificationError;
use crate::killmail::KillmailNotification;
use crate::message::{ChatMessage, MailMessage};
use crate::resolver::{IdResolver, ImageLookup};

/// 通知接收者
///
/// 渠道偏好完全由接收者自身维护，渲染层不做任何推断。
#[cfg_attr(test, mockall::automock)]
pub trait Recipient: Send + Sync {
    fn notification_channels(&self) -> Vec<NotificationChannel>;
}

/// 单个事件的通知能力
///
/// 每种事件类型实现一次，产出各渠道的出站载荷。`to_record` 返回
/// 扁平 JSON 映射，让分发框架无须感知具体事件类型。
#[async_trait]
pub trait EventNotification: Send + Sync {
    /// 返回接收者配置的渠道列表，本身不含任何逻辑
    fn via(&self, recipient: &dyn Recipient) -> Vec<NotificationChannel>;

    /// 渲染邮件载荷
    async fn to_mail(&self) -> Result<MailMessage, NotificationError>;

    /// 渲染聊天载荷
    ///
    /// 接收者参数为分发框架的调用约定保留，具体事件类型可以不使用。
    async fn to_chat(&self, recipient: &dyn Recipient) -> Result<ChatMessage, NotificationError>;

    /// 渲染扁平结构化载荷
    async fn to_record(&self) -> Result<serde_json::Value, NotificationError>;
}

/// 通知构建器
///
/// 将事件信封的 JSON 载荷解码为领域记录并构造对应通知。
pub trait NotificationBuilder: Send + Sync {
    /// 构建器负责的事件类型，注册表按此路由
    fn kind(&self) -> EventKind;

    fn build(
        &self,
        event: &IncomingEvent,
    ) -> Result<Box<dyn EventNotification>, NotificationError>;
}

/// 通知注册表
pub struct NotificationRegistry {
    builders: HashMap<EventKind, Arc<dyn NotificationBuilder>>,
}

impl NotificationRegistry {
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// 注册构建器，同类型后注册的覆盖先注册的
    pub fn register(&mut self, builder: Arc<dyn NotificationBuilder>) {
        debug!(kind = %builder.kind(), "注册通知构建器");
        self.builders.insert(builder.kind(), builder);
    }

    /// 为事件选择构建器并构造通知
    pub fn notification_for(
        &self,
        event: &IncomingEvent,
    ) -> Result<Box<dyn EventNotification>, NotificationError> {
        let builder =
            self.builders
                .get(&event.kind)
                .ok_or_else(|| NotificationError::UnknownEventKind {
                    kind: event.kind.to_string(),
                })?;

        debug!(event_id = %event.event_id, kind = %event.kind, "构建通知");
        builder.build(event)
    }
}

impl Default for NotificationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// killmail 通知构建器
pub struct KillmailNotificationBuilder {
    resolver: Arc<dyn IdResolver>,
    images: Arc<dyn ImageLookup>,
    killboard: KillboardConfig,
}

impl KillmailNotificationBuilder {
    pub fn new(
        resolver: Arc<dyn IdResolver>,
        images: Arc<dyn ImageLookup>,
        killboard: KillboardConfig,
    ) -> Self {
        Self {
            resolver,
            images,
            killboard,
        }
    }
}

impl NotificationBuilder for KillmailNotificationBuilder {
    fn kind(&self) -> EventKind {
        EventKind::Killmail
    }

    fn build(
        &self,
        event: &IncomingEvent,
    ) -> Result<Box<dyn EventNotification>, NotificationError> {
        let killmail: Killmail = serde_json::from_value(event.payload.clone())
            .map_err(|e| NotificationError::PayloadDecode(e.to_string()))?;

        Ok(Box::new(KillmailNotification::new(
            killmail,
            Arc::clone(&self.resolver),
            Arc::clone(&self.images),
            self.killboard.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use killfeed_shared::test_utils::test_killmail;

    use crate::resolver::{MockIdResolver, MockImageLookup};

    fn killmail_builder() -> Arc<KillmailNotificationBuilder> {
        Arc::new(KillmailNotificationBuilder::new(
            Arc::new(MockIdResolver::new()),
            Arc::new(MockImageLookup::new()),
            KillboardConfig::default(),
        ))
    }

    fn killmail_event() -> IncomingEvent {
        IncomingEvent::new(
            EventKind::Killmail,
            serde_json::to_value(test_killmail()).unwrap(),
            "killmail-ingest",
        )
    }

    #[test]
    fn test_registry_routes_killmail_event() {
        let mut registry = NotificationRegistry::new();
        registry.register(killmail_builder());

        let notification = registry.notification_for(&killmail_event());
        assert!(notification.is_ok());
    }

    #[test]
    fn test_empty_registry_rejects_event() {
        let registry = NotificationRegistry::new();

        let result = registry.notification_for(&killmail_event());
        assert!(matches!(
            result,
            Err(NotificationError::UnknownEventKind { kind }) if kind == "KILLMAIL"
        ));
    }

    #[test]
    fn test_builder_rejects_malformed_payload() {
        let mut registry = NotificationRegistry::new();
        registry.register(killmail_builder());

        let event = IncomingEvent::new(
            EventKind::Killmail,
            serde_json::json!({"bogus": true}),
            "killmail-ingest",
        );

        let result = registry.notification_for(&event);
        assert!(matches!(result, Err(NotificationError::PayloadDecode(_))));
    }
}
