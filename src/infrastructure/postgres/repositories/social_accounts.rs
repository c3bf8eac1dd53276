use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::social_accounts::SocialAccountEntity,
        repositories::social_accounts::SocialAccountRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::social_accounts},
};

pub struct SocialAccountPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SocialAccountPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SocialAccountRepository for SocialAccountPostgres {
    async fn list_connected(
        &self,
        owner_id: Uuid,
        platforms: Vec<String>,
    ) -> Result<Vec<SocialAccountEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Oldest connection first, so the first account per platform is stable.
        let results = social_accounts::table
            .filter(social_accounts::owner_id.eq(owner_id))
            .filter(social_accounts::is_active.eq(true))
            .filter(social_accounts::platform.eq_any(platforms))
            .order(social_accounts::connected_at.asc())
            .select(SocialAccountEntity::as_select())
            .load::<SocialAccountEntity>(&mut conn)?;

        Ok(results)
    }
}
