use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::posts::{InsertPostEntity, PostEntity, PublishPostEntity, UpdatePostEntity},
    value_objects::schedules::ScheduledCounts,
};

/// Every lookup and write is scoped by `(owner_id, post_id)`. A post owned by someone
/// else is indistinguishable from a missing one.
#[automock]
#[async_trait]
pub trait PostRepository {
    async fn insert(&self, insert_post_entity: InsertPostEntity) -> Result<PostEntity>;

    async fn find_by_id(&self, owner_id: Uuid, post_id: Uuid) -> Result<Option<PostEntity>>;

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<PostEntity>>;

    async fn update(
        &self,
        owner_id: Uuid,
        post_id: Uuid,
        update_post_entity: UpdatePostEntity,
    ) -> Result<Option<PostEntity>>;

    async fn mark_published(
        &self,
        owner_id: Uuid,
        post_id: Uuid,
        publish_post_entity: PublishPostEntity,
    ) -> Result<Option<PostEntity>>;

    /// Returns whether a row was removed.
    async fn delete(&self, owner_id: Uuid, post_id: Uuid) -> Result<bool>;

    /// Posts in `scheduled` status with a non-null `scheduled_at`, earliest due time
    /// first and unparsable ones last, capped at `limit`.
    async fn list_scheduled(&self, owner_id: Uuid, limit: i64) -> Result<Vec<PostEntity>>;

    /// Scheduled posts whose due time is at or before `now`, earliest first.
    async fn list_due(
        &self,
        owner_id: Uuid,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<PostEntity>>;

    async fn count_scheduled(&self, owner_id: Uuid, now: DateTime<Utc>)
    -> Result<ScheduledCounts>;

    /// Owners with at least one due post, ascending by id and strictly after `after`.
    async fn list_owners_with_due(
        &self,
        now: DateTime<Utc>,
        after: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<Uuid>>;
}
