//! 通知渲染的集成测试
//!
//! 从事件信封出发，走注册表路由到 killmail 构建器，验证三种渠道
//! 载荷的端到端渲染结果。名称解析与图标查询用内存静态表实现。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use killfeed_notification::error::NotificationError;
use killfeed_notification::killmail::{KILL_COLOR, LOSS_COLOR};
use killfeed_notification::message::MessageStatus;
use killfeed_notification::registry::{
    KillmailNotificationBuilder, NotificationRegistry, Recipient,
};
use killfeed_notification::resolver::{IdResolver, ImageCategory, ImageLookup};
use killfeed_shared::config::KillboardConfig;
use killfeed_shared::error::{KillfeedError, Result};
use killfeed_shared::events::{EventKind, IncomingEvent, NotificationChannel};
use killfeed_shared::test_utils::test_killmail;

/// 静态名称表解析器
struct StaticResolver {
    names: HashMap<i64, &'static str>,
}

impl StaticResolver {
    fn with_fixture_names() -> Self {
        let names = HashMap::from([
            (92168909, "Arion Tekk"),
            (98000001, "Brave Newbies"),
            (99005338, "Brave Collective"),
            (587, "Rifter"),
            (90379338, "Joss Merand"),
            (91613478, "Kara Voss"),
            (98388312, "Wrecking Crew"),
            (99003581, "Pandemic Horde"),
            (17738, "Machariel"),
            (11993, "Cerberus"),
        ]);
        Self { names }
    }

    fn lookup(&self, id: i64) -> Result<String> {
        self.names
            .get(&id)
            .map(|name| name.to_string())
            .ok_or(KillfeedError::UnresolvedId {
                category: "entity".to_string(),
                id,
            })
    }
}

#[async_trait]
impl IdResolver for StaticResolver {
    async fn resolve(&self, id: i64) -> Result<String> {
        self.lookup(id)
    }

    async fn resolve_linked(&self, id: i64) -> Result<String> {
        self.lookup(id)
    }
}

/// 固定格式的图标地址生成器，返回协议相对地址
struct StaticImages;

#[async_trait]
impl ImageLookup for StaticImages {
    async fn icon_url(&self, category: ImageCategory, id: i64, size: u32) -> Result<String> {
        Ok(format!("//images.example/{category}s/{id}/icon?size={size}"))
    }
}

/// 订阅邮件与聊天两个渠道的接收者
struct ChatAndMailRecipient;

impl Recipient for ChatAndMailRecipient {
    fn notification_channels(&self) -> Vec<NotificationChannel> {
        vec![NotificationChannel::Email, NotificationChannel::Chat]
    }
}

fn registry() -> NotificationRegistry {
    let mut registry = NotificationRegistry::new();
    registry.register(Arc::new(KillmailNotificationBuilder::new(
        Arc::new(StaticResolver::with_fixture_names()),
        Arc::new(StaticImages),
        KillboardConfig::default(),
    )));
    registry
}

fn killmail_event() -> IncomingEvent {
    IncomingEvent::new(
        EventKind::Killmail,
        serde_json::to_value(test_killmail()).unwrap(),
        "killmail-ingest",
    )
}

#[tokio::test]
async fn test_full_pipeline_renders_all_channels() {
    let registry = registry();
    let notification = registry.notification_for(&killmail_event()).unwrap();

    // 渠道选择完全委托给接收者
    let channels = notification.via(&ChatAndMailRecipient);
    assert_eq!(
        channels,
        vec![NotificationChannel::Email, NotificationChannel::Chat]
    );

    let mail = notification.to_mail().await.unwrap();
    assert_eq!(mail.subject, "Killmail Notification");
    assert_eq!(mail.lines[1], "Lost a Rifter in Jita (0.95)");
    assert_eq!(mail.action.url, "https://zkillboard.com/kill/81724510/");

    // 夹具为军团损失：损失颜色 + 错误状态，星系字段带两位小数安等
    let chat = notification.to_chat(&ChatAndMailRecipient).await.unwrap();
    assert_eq!(chat.attachment.color, LOSS_COLOR);
    assert_eq!(chat.status, MessageStatus::Error);
    let system_field = chat.attachment.field("System").unwrap();
    assert!(system_field.contains("Jita (0.95)"));

    let record = notification.to_record().await.unwrap();
    let object = record.as_object().unwrap();
    assert_eq!(object.len(), 5);
    assert_eq!(object["characterName"], "Arion Tekk");
    assert_eq!(object["itemName"], "Jita");
}

#[tokio::test]
async fn test_kill_event_uses_kill_color() {
    let mut killmail = test_killmail();
    killmail.victim.corporation_id = Some(98388312);
    let event = IncomingEvent::new(
        EventKind::Killmail,
        serde_json::to_value(killmail).unwrap(),
        "killmail-ingest",
    );

    let registry = registry();
    let notification = registry.notification_for(&event).unwrap();
    let chat = notification.to_chat(&ChatAndMailRecipient).await.unwrap();

    assert_eq!(chat.attachment.color, KILL_COLOR);
    assert_eq!(chat.status, MessageStatus::Success);
}

#[tokio::test]
async fn test_extra_payload_fields_are_ignored() {
    // 摄取系统附带的额外字段不影响解码与结构化输出的键集合
    let mut payload = serde_json::to_value(test_killmail()).unwrap();
    payload["zkbHash"] = serde_json::json!("abc123def");
    payload["ingestBatch"] = serde_json::json!(42);
    let event = IncomingEvent::new(EventKind::Killmail, payload, "killmail-ingest");

    let registry = registry();
    let notification = registry.notification_for(&event).unwrap();

    let record = notification.to_record().await.unwrap();
    let object = record.as_object().unwrap();
    assert_eq!(object.len(), 5);
}

#[tokio::test]
async fn test_unresolved_name_fails_whole_render() {
    // 名称表缺失受害者舰船类型时，邮件渲染整体失败，无部分输出
    let mut killmail = test_killmail();
    killmail.victim.ship_type_id = 999999;
    let event = IncomingEvent::new(
        EventKind::Killmail,
        serde_json::to_value(killmail).unwrap(),
        "killmail-ingest",
    );

    let registry = registry();
    let notification = registry.notification_for(&event).unwrap();

    let result = notification.to_mail().await;
    assert!(matches!(
        result,
        Err(NotificationError::Shared(KillfeedError::UnresolvedId { .. }))
    ));
}
