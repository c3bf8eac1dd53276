use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::posts::PostEntity, value_objects::enums::post_statuses::PostStatus,
};

/// Display name used when a platform has no connected account.
pub const DEMO_ACCOUNT_NAME: &str = "Demo Account";

pub const SIMULATED_REACH_MIN: i64 = 100;
pub const SIMULATED_REACH_MAX: i64 = 5000;

fn default_status() -> String {
    PostStatus::Draft.to_string()
}

/// Caller payload for create and update. Update overwrites every field, so omitted
/// optionals clear the stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub caption: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub scheduled_at: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishResult {
    pub platform: String,
    pub status: String,
    pub account_name: String,
    pub external_id: String,
    pub external_url: String,
    pub simulated_reach: i64,
    pub published_at: DateTime<Utc>,
}

impl PublishResult {
    /// Mock publication. Nothing leaves the process.
    pub fn simulated(platform: &str, account_name: Option<&str>, now: DateTime<Utc>) -> Self {
        let token = Uuid::new_v4().simple().to_string();
        let external_id = format!("{}_{}", platform, &token[..12]);
        let external_url = format!("https://{}.com/posts/{}", platform, external_id);
        let simulated_reach =
            rand::thread_rng().gen_range(SIMULATED_REACH_MIN..=SIMULATED_REACH_MAX);

        Self {
            platform: platform.to_string(),
            status: PostStatus::Published.to_string(),
            account_name: account_name.unwrap_or(DEMO_ACCOUNT_NAME).to_string(),
            external_id,
            external_url,
            simulated_reach,
            published_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDto {
    pub post_id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub platforms: Vec<String>,
    pub image_url: Option<String>,
    pub scheduled_at: Option<String>,
    pub status: String,
    pub views: i64,
    pub clicks: i64,
    pub likes: i64,
    pub shares: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub publish_results: Vec<PublishResult>,
    pub created_at: DateTime<Utc>,
}

impl From<PostEntity> for PostDto {
    fn from(value: PostEntity) -> Self {
        let publish_results = value.publish_results();

        Self {
            post_id: value.id,
            owner_id: value.owner_id,
            title: value.title,
            caption: value.caption,
            hashtags: value.hashtags,
            platforms: value.platforms,
            image_url: value.image_url,
            scheduled_at: value.scheduled_at,
            status: value.status,
            views: value.views,
            clicks: value.clicks,
            likes: value.likes,
            shares: value.shares,
            published_at: value.published_at,
            publish_results,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishSummary {
    pub message: String,
    pub post_id: Uuid,
    pub published_at: DateTime<Utc>,
    pub results: Vec<PublishResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueEntry {
    pub post_id: Uuid,
    pub title: String,
    pub platforms: Vec<String>,
    pub scheduled_at: DateTime<Utc>,
    pub is_due: bool,
    pub time_until_due_seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueView {
    pub queue: Vec<QueueEntry>,
    pub total_scheduled: usize,
    pub due_now: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedPost {
    pub post_id: Uuid,
    pub title: String,
    pub platforms: Vec<String>,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessSummary {
    pub message: String,
    pub published_count: usize,
    pub skipped_count: usize,
    pub failed_count: usize,
    pub results: Vec<ProcessedPost>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_result_uses_account_name_when_connected() {
        let now = Utc::now();
        let result = PublishResult::simulated("instagram", Some("@brand"), now);

        assert_eq!(result.platform, "instagram");
        assert_eq!(result.status, "published");
        assert_eq!(result.account_name, "@brand");
        assert!(result.external_id.starts_with("instagram_"));
        assert!(result.external_url.ends_with(&result.external_id));
        assert_eq!(result.published_at, now);
    }

    #[test]
    fn simulated_result_falls_back_to_demo_account() {
        let result = PublishResult::simulated("facebook", None, Utc::now());
        assert_eq!(result.account_name, DEMO_ACCOUNT_NAME);
    }

    #[test]
    fn simulated_reach_stays_in_band() {
        for _ in 0..200 {
            let result = PublishResult::simulated("tiktok", None, Utc::now());
            assert!((SIMULATED_REACH_MIN..=SIMULATED_REACH_MAX).contains(&result.simulated_reach));
        }
    }

    #[test]
    fn post_input_defaults_to_draft() {
        let input: PostInput =
            serde_json::from_str(r#"{"title":"Launch","caption":"Soon"}"#).unwrap();
        assert_eq!(input.status, "draft");
        assert!(input.hashtags.is_empty());
        assert!(input.scheduled_at.is_none());
    }

    fn stored_post(publish_results: serde_json::Value) -> PostEntity {
        let created_at = Utc::now();
        PostEntity {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Launch".to_string(),
            caption: "Soon".to_string(),
            hashtags: vec![],
            platforms: vec!["instagram".to_string()],
            image_url: None,
            scheduled_at: None,
            scheduled_for: None,
            status: "published".to_string(),
            views: 0,
            clicks: 0,
            likes: 0,
            shares: 0,
            published_at: Some(created_at),
            publish_results,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn stored_publish_results_are_decoded() {
        let result = PublishResult::simulated("instagram", None, Utc::now());
        let post = stored_post(serde_json::to_value(vec![result.clone()]).unwrap());

        assert_eq!(PostDto::from(post).publish_results, vec![result]);
    }

    #[test]
    fn malformed_publish_results_read_as_empty() {
        let post = stored_post(serde_json::json!({ "platform": 42 }));

        assert!(PostDto::from(post).publish_results.is_empty());
    }
}
