//! 实体基础 trait

use chrono::{DateTime, Utc};

/// 实体 trait
pub trait Entity {
    type Id;

    fn id(&self) -> &Self::Id;
}

/// 聚合根 trait
///
/// `updated_at` 在每次状态变更时前进，形成单调审计轨迹
pub trait AggregateRoot: Entity {
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
}
