use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::usage_logs::InsertUsageLogEntity,
    value_objects::enums::resource_kinds::ResourceKind,
};

#[automock]
#[async_trait]
pub trait UsageRepository {
    /// Rows of `kind` owned by the subscriber, optionally only those created at or
    /// after `since`.
    async fn count(
        &self,
        kind: ResourceKind,
        subscriber_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<i64>;

    async fn record_ai_generation(&self, insert_usage_log_entity: InsertUsageLogEntity)
    -> Result<()>;
}
