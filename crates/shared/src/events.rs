//! 事件模型
//!
//! 定义进入通知渲染层的事件信封、事件类型分类，以及 killmail
//! （舰船击毁记录）的领域模型。这些记录全部由外部事件摄取系统
//! 提供，渲染层只读不改，也不负责持久化。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// EventKind — 事件类型枚举
// ---------------------------------------------------------------------------

/// 事件类型枚举
///
/// 通知注册表按事件类型路由到对应的通知构建器。
/// 当前只有击毁事件一种，新的事件类型在此追加变体即可。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Killmail,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 与 serde 的 SCREAMING_SNAKE_CASE 保持一致，便于在日志中统一引用
        let s = match self {
            Self::Killmail => "KILLMAIL",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// IncomingEvent — 通用事件信封
// ---------------------------------------------------------------------------

/// 通用事件信封
///
/// 所有进入渲染层的事件都包装在此信封中：
/// - `event_id`（UUID v7）由摄取系统用于幂等性校验
/// - `trace_id` 串联分布式追踪上下文
/// - `payload` 以 JSON 承载不同事件类型的业务数据，由对应的
///   通知构建器解码为具体领域记录
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingEvent {
    /// 事件唯一标识（UUID v7），时间有序便于索引
    pub event_id: String,
    /// 事件类型
    pub kind: EventKind,
    /// 事件业务数据（JSON 对象，不同事件类型携带不同字段）
    pub payload: serde_json::Value,
    /// 事件来源系统
    pub source: String,
    /// 追踪 ID（用于分布式追踪串联）
    pub trace_id: Option<String>,
    /// 事件进入渲染层的时间
    pub received_at: DateTime<Utc>,
}

impl IncomingEvent {
    /// 构建新事件，自动生成 UUID v7 作为 event_id 并记录当前时间
    pub fn new(kind: EventKind, payload: serde_json::Value, source: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::now_v7().to_string(),
            kind,
            payload,
            source: source.into(),
            trace_id: None,
            received_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Killmail — 击毁记录领域模型
// ---------------------------------------------------------------------------

/// 击毁记录
///
/// 一艘舰船被击毁的完整事件：受害者、攻击者列表、地点与价值。
/// `corporation_id` 是记录该击毁的军团（订阅方），与受害者军团
/// 的相等性决定这条记录对订阅方而言是损失还是战果。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Killmail {
    pub killmail_id: i64,
    pub killmail_time: DateTime<Utc>,
    /// 记录归属军团 ID（订阅该击毁源的军团）
    pub corporation_id: i64,
    pub victim: Combatant,
    /// 攻击者列表，保持摄取系统给出的顺序
    pub attackers: Vec<Combatant>,
    pub solar_system: SolarSystem,
    /// 击毁总价值（ISK）
    pub total_value: f64,
}

impl Killmail {
    /// 查找造成最后一击的攻击者
    ///
    /// 摄取系统保证最多只有一名攻击者带有 final_blow 标记；
    /// 标记缺失时返回 None，由调用方决定失败语义。
    pub fn final_blow_attacker(&self) -> Option<&Combatant> {
        self.attackers.iter().find(|a| a.final_blow)
    }

    /// 参与击毁的攻击者数量
    pub fn attacker_count(&self) -> usize {
        self.attackers.len()
    }

    /// 该记录对归属军团而言是否为损失
    pub fn is_corporation_loss(&self) -> bool {
        self.victim.corporation_id == Some(self.corporation_id)
    }
}

/// 参战方（受害者或攻击者）
///
/// 角色、军团、联盟标识均可缺失：NPC 或建筑没有角色，
/// 未入联盟的军团没有联盟。缺失用 Option 显式表达，
/// 渲染逻辑对其做穷尽匹配。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combatant {
    pub character_id: Option<i64>,
    pub corporation_id: Option<i64>,
    pub alliance_id: Option<i64>,
    pub ship_type_id: i64,
    /// 是否造成最后一击（仅对攻击者有意义）
    #[serde(default)]
    pub final_blow: bool,
}

/// 星系引用
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarSystem {
    pub system_id: i64,
    pub name: String,
    /// 安全等级，展示时固定保留两位小数
    pub security: f64,
}

// ---------------------------------------------------------------------------
// NotificationChannel — 通知投递渠道
// ---------------------------------------------------------------------------

/// 通知投递渠道
///
/// 渠道选择完全委托给接收者对象，渲染层按渠道产出对应载荷：
/// Email 对应邮件消息，Chat 对应聊天消息，Record 对应给
/// 审计日志、webhook 等非可视化消费者的扁平结构化数据。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationChannel {
    Email,
    Chat,
    Record,
}

// ---------------------------------------------------------------------------
// 单元测试
// ---------------------------------------------------------------------------
