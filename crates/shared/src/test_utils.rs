//! 测试工具模块
//!
//! 提供单元测试与集成测试共用的 killmail 测试数据生成器，
//! 避免各测试文件重复手写领域记录。

use chrono::{DateTime, Utc};

use crate::events::{Combatant, Killmail, SolarSystem};

/// 固定的测试时间点，保证断言可重复
pub fn test_killmail_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-01-15T10:30:00Z")
        .expect("测试时间常量应合法")
        .with_timezone(&Utc)
}

/// 构造测试受害者：带角色、军团、联盟的 Rifter 驾驶员
pub fn test_victim() -> Combatant {
    Combatant {
        character_id: Some(92168909),
        corporation_id: Some(98000001),
        alliance_id: Some(99005338),
        ship_type_id: 587,
        final_blow: false,
    }
}

/// 构造测试攻击者
pub fn test_attacker(character_id: i64, final_blow: bool) -> Combatant {
    Combatant {
        character_id: Some(character_id),
        corporation_id: Some(98388312),
        alliance_id: Some(99003581),
        ship_type_id: 11993,
        final_blow,
    }
}

/// 构造标准测试击毁记录
///
/// Rifter 在 Jita（安等 0.946）被两名攻击者击毁，
/// 受害者军团与记录归属军团相同，即对订阅方而言是一次损失。
pub fn test_killmail() -> Killmail {
    Killmail {
        killmail_id: 81724510,
        killmail_time: test_killmail_time(),
        corporation_id: 98000001,
        victim: test_victim(),
        attackers: vec![
            Combatant {
                character_id: Some(90379338),
                corporation_id: Some(98388312),
                alliance_id: None,
                ship_type_id: 17738,
                final_blow: false,
            },
            test_attacker(91613478, true),
        ],
        solar_system: SolarSystem {
            system_id: 30000142,
            name: "Jita".to_string(),
            security: 0.946,
        },
        total_value: 14_563_201.42,
    }
}

/// 构造单人击毁记录：只有一名攻击者且带最后一击标记
pub fn test_solo_killmail() -> Killmail {
    let mut killmail = test_killmail();
    killmail.attackers = vec![test_attacker(91613478, true)];
    killmail
}
