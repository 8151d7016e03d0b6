//! 外部数据能力抽象
//!
//! 定义名称解析与图标查询两个外部协作者的接口，便于渲染层依赖
//! 抽象而非具体实现，支持 mock 测试。两者都被视为阻塞式的外部
//! 调用，具体的数据访问层（数据库、HTTP 客户端）不在本库实现。

use async_trait::async_trait;
use killfeed_shared::error::Result;

/// 图标类别
///
/// 图标服务按实体类别与数字标识定位图片资源。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCategory {
    Character,
    Corporation,
    Alliance,
    Type,
}

impl ImageCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Corporation => "corporation",
            Self::Alliance => "alliance",
            Self::Type => "type",
        }
    }
}

impl std::fmt::Display for ImageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 名称解析接口
///
/// 将角色、军团、联盟、物品类型的数字标识解析为展示名称。
/// 解析失败（标识未知、上游不可用）原样上抛，渲染层不做降级。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdResolver: Send + Sync {
    /// 解析为纯文本展示名称
    async fn resolve(&self, id: i64) -> Result<String>;

    /// 解析为带超链接标记的展示字符串
    async fn resolve_linked(&self, id: i64) -> Result<String>;
}

/// 图标查询接口
///
/// 返回协议相对地址（`//…`），协议由渲染层按投递场景补全。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageLookup: Send + Sync {
    async fn icon_url(&self, category: ImageCategory, id: i64, size: u32) -> Result<String>;
}
