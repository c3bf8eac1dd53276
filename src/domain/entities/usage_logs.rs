use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::usage_log;

/// One row per AI generation, counted against the monthly allowance.
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = usage_log)]
pub struct InsertUsageLogEntity {
    pub subscriber_id: Uuid,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}
