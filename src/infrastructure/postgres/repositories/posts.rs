use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::posts::{InsertPostEntity, PostEntity, PublishPostEntity, UpdatePostEntity},
        repositories::posts::PostRepository,
        value_objects::{enums::post_statuses::PostStatus, schedules::ScheduledCounts},
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::posts},
};

pub struct PostPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PostPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PostRepository for PostPostgres {
    async fn insert(&self, insert_post_entity: InsertPostEntity) -> Result<PostEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(posts::table)
            .values(&insert_post_entity)
            .returning(PostEntity::as_returning())
            .get_result::<PostEntity>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, owner_id: Uuid, post_id: Uuid) -> Result<Option<PostEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = posts::table
            .filter(posts::id.eq(post_id))
            .filter(posts::owner_id.eq(owner_id))
            .select(PostEntity::as_select())
            .first::<PostEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<PostEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = posts::table
            .filter(posts::owner_id.eq(owner_id))
            .order(posts::created_at.desc())
            .select(PostEntity::as_select())
            .load::<PostEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update(
        &self,
        owner_id: Uuid,
        post_id: Uuid,
        update_post_entity: UpdatePostEntity,
    ) -> Result<Option<PostEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(posts::table)
            .filter(posts::id.eq(post_id))
            .filter(posts::owner_id.eq(owner_id))
            .set(&update_post_entity)
            .returning(PostEntity::as_returning())
            .get_result::<PostEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn mark_published(
        &self,
        owner_id: Uuid,
        post_id: Uuid,
        publish_post_entity: PublishPostEntity,
    ) -> Result<Option<PostEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(posts::table)
            .filter(posts::id.eq(post_id))
            .filter(posts::owner_id.eq(owner_id))
            .set(&publish_post_entity)
            .returning(PostEntity::as_returning())
            .get_result::<PostEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn delete(&self, owner_id: Uuid, post_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = delete(posts::table)
            .filter(posts::id.eq(post_id))
            .filter(posts::owner_id.eq(owner_id))
            .execute(&mut conn)?;

        Ok(deleted > 0)
    }

    async fn list_scheduled(&self, owner_id: Uuid, limit: i64) -> Result<Vec<PostEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = posts::table
            .filter(posts::owner_id.eq(owner_id))
            .filter(posts::status.eq(PostStatus::Scheduled.to_string()))
            .filter(posts::scheduled_at.is_not_null())
            .order((posts::scheduled_for.asc().nulls_last(), posts::created_at.asc()))
            .limit(limit)
            .select(PostEntity::as_select())
            .load::<PostEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_due(
        &self,
        owner_id: Uuid,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<PostEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = posts::table
            .filter(posts::owner_id.eq(owner_id))
            .filter(posts::status.eq(PostStatus::Scheduled.to_string()))
            .filter(posts::scheduled_at.is_not_null())
            .filter(posts::scheduled_for.le(now))
            .order((posts::scheduled_for.asc(), posts::created_at.asc()))
            .limit(limit)
            .select(PostEntity::as_select())
            .load::<PostEntity>(&mut conn)?;

        Ok(results)
    }

    async fn count_scheduled(
        &self,
        owner_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ScheduledCounts> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let scheduled = || {
            posts::table
                .filter(posts::owner_id.eq(owner_id))
                .filter(posts::status.eq(PostStatus::Scheduled.to_string()))
                .filter(posts::scheduled_at.is_not_null())
        };

        let total = scheduled().count().get_result::<i64>(&mut conn)?;
        let parsable = scheduled()
            .filter(posts::scheduled_for.is_not_null())
            .count()
            .get_result::<i64>(&mut conn)?;
        let due = scheduled()
            .filter(posts::scheduled_for.le(now))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(ScheduledCounts {
            total,
            parsable,
            due,
        })
    }

    async fn list_owners_with_due(
        &self,
        now: DateTime<Utc>,
        after: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = posts::table
            .filter(posts::status.eq(PostStatus::Scheduled.to_string()))
            .filter(posts::scheduled_at.is_not_null())
            .filter(posts::scheduled_for.le(now))
            .select(posts::owner_id)
            .distinct()
            .order(posts::owner_id.asc())
            .limit(limit)
            .into_boxed();

        if let Some(after) = after {
            query = query.filter(posts::owner_id.gt(after));
        }

        let results = query.load::<Uuid>(&mut conn)?;

        Ok(results)
    }
}
