use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::warn;
use uuid::Uuid;

use crate::{
    domain::value_objects::posts::PublishResult, infrastructure::postgres::schema::posts,
};

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = posts)]
pub struct PostEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub platforms: Vec<String>,
    pub image_url: Option<String>,
    pub scheduled_at: Option<String>,
    /// `scheduled_at` as parsed on write. `None` when absent or unparsable.
    pub scheduled_for: Option<DateTime<Utc>>,
    pub status: String,
    pub views: i64,
    pub clicks: i64,
    pub likes: i64,
    pub shares: i64,
    pub published_at: Option<DateTime<Utc>>,
    /// Per-platform results of the last publish, kept as JSONB.
    pub publish_results: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostEntity {
    pub fn publish_results(&self) -> Vec<PublishResult> {
        serde_json::from_value(self.publish_results.clone()).unwrap_or_else(|err| {
            warn!(
                post_id = %self.id,
                error = %err,
                "posts: malformed publish_results, returning none"
            );
            Vec::new()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = posts)]
pub struct InsertPostEntity {
    pub owner_id: Uuid,
    pub title: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub platforms: Vec<String>,
    pub image_url: Option<String>,
    pub scheduled_at: Option<String>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub status: String,
    pub views: i64,
    pub clicks: i64,
    pub likes: i64,
    pub shares: i64,
    pub publish_results: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full overwrite of the caller-editable columns. `None` clears the column.
#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = posts)]
#[diesel(treat_none_as_null = true)]
pub struct UpdatePostEntity {
    pub title: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub platforms: Vec<String>,
    pub image_url: Option<String>,
    pub scheduled_at: Option<String>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = posts)]
pub struct PublishPostEntity {
    pub status: String,
    pub published_at: DateTime<Utc>,
    pub publish_results: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}
