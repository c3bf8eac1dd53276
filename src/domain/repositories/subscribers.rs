use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::subscribers::{InsertSubscriberEntity, SubscriberEntity};

#[automock]
#[async_trait]
pub trait SubscriberRepository {
    async fn find_by_id(&self, subscriber_id: Uuid) -> Result<Option<SubscriberEntity>>;

    async fn create(&self, insert_subscriber_entity: InsertSubscriberEntity)
    -> Result<SubscriberEntity>;

    async fn update_plan(
        &self,
        subscriber_id: Uuid,
        plan_id: String,
        plan_expires_at: Option<DateTime<Utc>>,
        updated_at: DateTime<Utc>,
    ) -> Result<SubscriberEntity>;
}
