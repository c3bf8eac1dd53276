use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::social_accounts;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = social_accounts)]
pub struct SocialAccountEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub platform: String,
    pub account_name: String,
    pub external_account_id: Option<String>,
    pub is_active: bool,
    pub connected_at: DateTime<Utc>,
}
