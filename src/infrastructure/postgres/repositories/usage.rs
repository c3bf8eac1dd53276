use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::usage_logs::InsertUsageLogEntity, repositories::usage::UsageRepository,
        value_objects::enums::resource_kinds::ResourceKind,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{landing_pages, posts, social_accounts, team_members, templates, usage_log},
    },
};

/// Counts rows straight from the resource tables. Timestamps are compared as
/// `timestamptz`, never as text.
pub struct UsagePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UsagePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

// No window means every row since the epoch.
fn window_start(since: Option<DateTime<Utc>>) -> DateTime<Utc> {
    since.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[async_trait]
impl UsageRepository for UsagePostgres {
    async fn count(
        &self,
        kind: ResourceKind,
        subscriber_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let from = window_start(since);

        let count = match kind {
            ResourceKind::Posts => posts::table
                .filter(posts::owner_id.eq(subscriber_id))
                .filter(posts::created_at.ge(from))
                .count()
                .get_result::<i64>(&mut conn)?,
            ResourceKind::Templates => templates::table
                .filter(templates::owner_id.eq(subscriber_id))
                .filter(templates::created_at.ge(from))
                .count()
                .get_result::<i64>(&mut conn)?,
            ResourceKind::LandingPages => landing_pages::table
                .filter(landing_pages::owner_id.eq(subscriber_id))
                .filter(landing_pages::created_at.ge(from))
                .count()
                .get_result::<i64>(&mut conn)?,
            ResourceKind::AiGenerations => usage_log::table
                .filter(usage_log::subscriber_id.eq(subscriber_id))
                .filter(usage_log::created_at.ge(from))
                .count()
                .get_result::<i64>(&mut conn)?,
            ResourceKind::SocialAccounts => social_accounts::table
                .filter(social_accounts::owner_id.eq(subscriber_id))
                .filter(social_accounts::is_active.eq(true))
                .filter(social_accounts::connected_at.ge(from))
                .count()
                .get_result::<i64>(&mut conn)?,
            ResourceKind::TeamMembers => team_members::table
                .filter(team_members::workspace_id.eq(subscriber_id))
                .filter(team_members::joined_at.ge(from))
                .count()
                .get_result::<i64>(&mut conn)?,
            ResourceKind::LeadCapture => 0,
        };

        Ok(count)
    }

    async fn record_ai_generation(&self, insert_usage_log_entity: InsertUsageLogEntity) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(usage_log::table)
            .values(&insert_usage_log_entity)
            .execute(&mut conn)?;

        Ok(())
    }
}
