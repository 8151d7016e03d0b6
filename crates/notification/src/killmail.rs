//! killmail 通知渲染
//!
//! 将一条击毁记录渲染为邮件、聊天与结构化三种出站载荷。渲染无状态、
//! 无副作用，名称与图标通过外部能力接口按需解析；任何解析失败都让
//! 整次渲染失败上抛，不产生部分输出。

use std::sync::Arc;

use async_trait::async_trait;
use killfeed_shared::config::KillboardConfig;
use killfeed_shared::error::KillfeedError;
use killfeed_shared::events::{Killmail, NotificationChannel};
use serde::Serialize;
use tracing::debug;

use crate::error::NotificationError;
use crate::message::{
    ChatAttachment, ChatField, ChatMessage, ChatSender, MailAction, MailMessage, MessageStatus,
};
use crate::registry::{EventNotification, Recipient};
use crate::resolver::{IdResolver, ImageCategory, ImageLookup};

/// 损失（己方被击毁）时的聊天消息颜色
pub const LOSS_COLOR: &str = "#DD4B39";
/// 战果（击毁他人）时的聊天消息颜色
pub const KILL_COLOR: &str = "#00A65A";

/// 聊天消息中舰船图标的边长（像素）
const SHIP_ICON_SIZE: u32 = 64;

/// killmail 通知
///
/// 持有一条击毁记录与外部名称解析、图标查询能力。
/// 每次渲染相互独立，输入相同则输出相同。
pub struct KillmailNotification {
    killmail: Killmail,
    resolver: Arc<dyn IdResolver>,
    images: Arc<dyn ImageLookup>,
    killboard: KillboardConfig,
}

/// 结构化通知载荷
///
/// 给审计日志、webhook 等非可视化消费者的扁平五字段映射。
/// 受害者没有角色或军团时对应字段为 null，键集合保持不变。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KillmailRecord {
    pub character_name: Option<String>,
    pub corporation_name: Option<String>,
    pub type_name: String,
    pub item_name: String,
    pub security: f64,
}

impl KillmailNotification {
    pub fn new(
        killmail: Killmail,
        resolver: Arc<dyn IdResolver>,
        images: Arc<dyn ImageLookup>,
        killboard: KillboardConfig,
    ) -> Self {
        Self {
            killmail,
            resolver,
            images,
            killboard,
        }
    }

    /// 描述一名参战方
    ///
    /// 对带角色与不带角色（NPC、建筑）的参战方分别给出两种措辞。
    /// 联盟名用带链接形式解析，整体包入尖括号并转为大写；
    /// 军团或联盟缺失时在原位置渲染为空串。
    pub async fn describe_participant(
        &self,
        character_id: Option<i64>,
        corporation_id: Option<i64>,
        ship_type_id: i64,
        alliance_id: Option<i64>,
    ) -> Result<String, NotificationError> {
        let (character, corporation, alliance, ship_type) = futures::try_join!(
            resolve_opt(self.resolver.as_ref(), character_id),
            resolve_opt(self.resolver.as_ref(), corporation_id),
            resolve_linked_opt(self.resolver.as_ref(), alliance_id),
            self.resolver.resolve(ship_type_id),
        )?;

        let alliance = alliance
            .map(|a| format!("<{a}>").to_uppercase())
            .unwrap_or_default();
        let corporation = corporation.unwrap_or_default();

        let description = match character {
            Some(character) => {
                format!("*{character}* [{corporation}] {alliance} flying a *{ship_type}*")
            }
            None => format!("*{ship_type}* [{corporation}] {alliance}"),
        };
        Ok(description)
    }

    /// 单行击杀摘要
    ///
    /// 形如 `{最后一击攻击者} just killed {受害者}`，单人击毁时
    /// 追加 ` solo`。供纯文本渠道的消费者使用。
    pub async fn summary(&self) -> Result<String, NotificationError> {
        let attacker = self.killmail.final_blow_attacker().ok_or(
            NotificationError::MissingFinalBlow {
                killmail_id: self.killmail.killmail_id,
            },
        )?;

        let attacker_text = self
            .describe_participant(
                attacker.character_id,
                attacker.corporation_id,
                attacker.ship_type_id,
                attacker.alliance_id,
            )
            .await?;
        let victim = &self.killmail.victim;
        let victim_text = self
            .describe_participant(
                victim.character_id,
                victim.corporation_id,
                victim.ship_type_id,
                victim.alliance_id,
            )
            .await?;

        if self.killmail.attacker_count() == 1 {
            Ok(format!("{attacker_text} just killed {victim_text} solo"))
        } else {
            Ok(format!("{attacker_text} just killed {victim_text}"))
        }
    }

    /// 结构化载荷的类型化形式
    pub async fn record(&self) -> Result<KillmailRecord, NotificationError> {
        let victim = &self.killmail.victim;
        let (character_name, corporation_name, type_name) = futures::try_join!(
            resolve_opt(self.resolver.as_ref(), victim.character_id),
            resolve_opt(self.resolver.as_ref(), victim.corporation_id),
            self.resolver.resolve(victim.ship_type_id),
        )?;

        Ok(KillmailRecord {
            character_name,
            corporation_name,
            type_name,
            item_name: self.killmail.solar_system.name.clone(),
            security: self.killmail.solar_system.security,
        })
    }

    /// 击毁详情页地址（邮件行动按钮用，带尾部斜杠）
    fn kill_url(&self) -> String {
        format!(
            "{}/kill/{}/",
            self.killboard.base_url, self.killmail.killmail_id
        )
    }

    /// 聊天超链接标记：`<url|text>`
    fn chat_link(&self, category: &str, id: i64, text: &str) -> String {
        format!("<{}/{}/{}/|{}>", self.killboard.base_url, category, id, text)
    }

    /// 安全等级固定渲染为两位小数
    fn format_security(security: f64) -> String {
        format!("{security:.2}")
    }

    /// ISK 金额：整数部分千分位分组，保留两位小数
    fn format_isk(value: f64) -> String {
        let cents = (value * 100.0).round() as i64;
        let whole = (cents / 100).abs();
        let frac = (cents % 100).abs();

        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }

        let sign = if cents < 0 { "-" } else { "" };
        format!("{sign}{grouped}.{frac:02} ISK")
    }
}

/// 解析可缺失的标识，缺失时返回 None 而非失败
async fn resolve_opt(
    resolver: &dyn IdResolver,
    id: Option<i64>,
) -> killfeed_shared::error::Result<Option<String>> {
    match id {
        Some(id) => Ok(Some(resolver.resolve(id).await?)),
        None => Ok(None),
    }
}

/// 解析可缺失的标识为带链接形式
async fn resolve_linked_opt(
    resolver: &dyn IdResolver,
    id: Option<i64>,
) -> killfeed_shared::error::Result<Option<String>> {
    match id {
        Some(id) => Ok(Some(resolver.resolve_linked(id).await?)),
        None => Ok(None),
    }
}

#[async_trait]
impl EventNotification for KillmailNotification {
    fn via(&self, recipient: &dyn Recipient) -> Vec<NotificationChannel> {
        recipient.notification_channels()
    }

    async fn to_mail(&self) -> Result<MailMessage, NotificationError> {
        debug!(killmail_id = self.killmail.killmail_id, "渲染邮件通知");

        let ship_type = self.resolver.resolve(self.killmail.victim.ship_type_id).await?;
        let system = &self.killmail.solar_system;

        Ok(MailMessage {
            subject: "Killmail Notification".to_string(),
            lines: vec![
                "A new killmail has been recorded!".to_string(),
                format!(
                    "Lost a {} in {} ({})",
                    ship_type,
                    system.name,
                    Self::format_security(system.security),
                ),
            ],
            action: MailAction {
                label: "Check it out on zKillboard".to_string(),
                url: self.kill_url(),
            },
        })
    }

    async fn to_chat(&self, _recipient: &dyn Recipient) -> Result<ChatMessage, NotificationError> {
        debug!(killmail_id = self.killmail.killmail_id, "渲染聊天通知");

        let (ship_type, icon) = futures::try_join!(
            self.resolver.resolve(self.killmail.victim.ship_type_id),
            self.images.icon_url(
                ImageCategory::Type,
                self.killmail.victim.ship_type_id,
                SHIP_ICON_SIZE,
            ),
        )?;
        // 图标能力返回协议相对地址，此处补全协议
        let icon_url = format!("https:{icon}");

        let system = &self.killmail.solar_system;
        let is_loss = self.killmail.is_corporation_loss();

        let fields = vec![
            ChatField::new("Ship Type", ship_type),
            ChatField::new(
                "zKB Link",
                format!(
                    "{}/kill/{}",
                    self.killboard.base_url, self.killmail.killmail_id
                ),
            ),
            ChatField::new("Value", Self::format_isk(self.killmail.total_value)),
            ChatField::new(
                "Involved Pilots",
                self.killmail.attacker_count().to_string(),
            ),
            ChatField::new(
                "System",
                self.chat_link(
                    "system",
                    system.system_id,
                    &format!(
                        "{} ({})",
                        system.name,
                        Self::format_security(system.security)
                    ),
                ),
            ),
        ];

        Ok(ChatMessage {
            content: "Reactor Breach Detected!".to_string(),
            from: ChatSender {
                name: "Defense Mainframe".to_string(),
                icon_url: icon_url.clone(),
            },
            attachment: ChatAttachment {
                timestamp: self.killmail.killmail_time,
                fields,
                thumb_url: icon_url,
                fallback: "Kill details".to_string(),
                footer: "zKillboard".to_string(),
                footer_icon: "https://zkillboard.com/img/wreck.png".to_string(),
                color: if is_loss { LOSS_COLOR } else { KILL_COLOR }.to_string(),
            },
            status: if is_loss {
                MessageStatus::Error
            } else {
                MessageStatus::Success
            },
        })
    }

    async fn to_record(&self) -> Result<serde_json::Value, NotificationError> {
        let record = self.record().await?;
        serde_json::to_value(&record)
            .map_err(|e| NotificationError::Shared(KillfeedError::Internal(e.to_string())))
    }
}
