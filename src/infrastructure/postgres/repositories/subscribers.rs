use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::subscribers::{InsertSubscriberEntity, SubscriberEntity},
        repositories::subscribers::SubscriberRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::subscribers},
};

pub struct SubscriberPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriberPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriberRepository for SubscriberPostgres {
    async fn find_by_id(&self, subscriber_id: Uuid) -> Result<Option<SubscriberEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = subscribers::table
            .filter(subscribers::id.eq(subscriber_id))
            .select(SubscriberEntity::as_select())
            .first::<SubscriberEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn create(&self, insert_subscriber_entity: InsertSubscriberEntity) -> Result<SubscriberEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(subscribers::table)
            .values(&insert_subscriber_entity)
            .returning(SubscriberEntity::as_returning())
            .get_result::<SubscriberEntity>(&mut conn)?;

        Ok(result)
    }

    async fn update_plan(
        &self,
        subscriber_id: Uuid,
        plan_id: String,
        plan_expires_at: Option<DateTime<Utc>>,
        updated_at: DateTime<Utc>,
    ) -> Result<SubscriberEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(subscribers::table)
            .filter(subscribers::id.eq(subscriber_id))
            .set((
                subscribers::plan_id.eq(plan_id),
                subscribers::plan_expires_at.eq(plan_expires_at),
                subscribers::updated_at.eq(updated_at),
            ))
            .returning(SubscriberEntity::as_returning())
            .get_result::<SubscriberEntity>(&mut conn)?;

        Ok(result)
    }
}
