use chrono::{DateTime, Utc};
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::{
        interfaces::clock::Clock,
        usecases::subscription_evaluator::{EntitlementError, SubscriptionEvaluator},
    },
    domain::{
        entities::posts::{InsertPostEntity, PostEntity, PublishPostEntity, UpdatePostEntity},
        repositories::{
            posts::PostRepository, social_accounts::SocialAccountRepository,
            subscribers::SubscriberRepository, usage::UsageRepository,
        },
        value_objects::{
            enums::{post_statuses::PostStatus, resource_kinds::ResourceKind},
            posts::{PostDto, PostInput, PublishResult, PublishSummary},
            schedules::{ParseOutcome, parse_scheduled_at, scheduled_instant},
        },
    },
};

#[derive(Debug, Error)]
pub enum PostError {
    #[error("post not found")]
    NotFound,
    #[error("{0} limit reached for the current plan")]
    QuotaExceeded(ResourceKind),
    #[error(transparent)]
    Entitlement(#[from] EntitlementError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PostError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PostError::NotFound => StatusCode::NOT_FOUND,
            PostError::QuotaExceeded(_) => StatusCode::FORBIDDEN,
            PostError::Entitlement(err) => err.status_code(),
            PostError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, PostError>;

/// Status a new post starts in. A `scheduled_at` strictly in the future forces
/// `scheduled`; anything else keeps what the caller sent.
pub fn resolve_initial_status(
    requested_status: &str,
    scheduled_at: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    let Some(raw) = scheduled_at else {
        return requested_status.to_string();
    };

    match parse_scheduled_at(raw) {
        ParseOutcome::Parsed(at) if at > now => PostStatus::Scheduled.to_string(),
        ParseOutcome::Parsed(_) => requested_status.to_string(),
        ParseOutcome::Skip { raw, reason } => {
            warn!(
                scheduled_at = %raw,
                %reason,
                "posts: unparsable scheduled_at, keeping requested status"
            );
            requested_status.to_string()
        }
    }
}

pub struct PostUseCase<P, A, S, U, C>
where
    P: PostRepository + Send + Sync + 'static,
    A: SocialAccountRepository + Send + Sync + 'static,
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    post_repository: Arc<P>,
    social_account_repository: Arc<A>,
    subscription_evaluator: Arc<SubscriptionEvaluator<S, U, C>>,
    clock: Arc<C>,
}

impl<P, A, S, U, C> PostUseCase<P, A, S, U, C>
where
    P: PostRepository + Send + Sync + 'static,
    A: SocialAccountRepository + Send + Sync + 'static,
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    pub fn new(
        post_repository: Arc<P>,
        social_account_repository: Arc<A>,
        subscription_evaluator: Arc<SubscriptionEvaluator<S, U, C>>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            post_repository,
            social_account_repository,
            subscription_evaluator,
            clock,
        }
    }

    pub async fn create_post(&self, owner_id: Uuid, input: PostInput) -> UseCaseResult<PostDto> {
        let now = self.clock.now();
        let subscriber = self.subscription_evaluator.load_subscriber(owner_id).await?;

        let allowed = self
            .subscription_evaluator
            .can_consume(&subscriber, ResourceKind::Posts, now, None)
            .await?;
        if !allowed {
            warn!(%owner_id, "posts: monthly post quota reached");
            return Err(PostError::QuotaExceeded(ResourceKind::Posts));
        }

        let status = resolve_initial_status(&input.status, input.scheduled_at.as_deref(), now);

        let insert_post_entity = InsertPostEntity {
            owner_id,
            title: input.title,
            caption: input.caption,
            hashtags: input.hashtags,
            platforms: input.platforms,
            image_url: input.image_url,
            scheduled_for: scheduled_instant(input.scheduled_at.as_deref()),
            scheduled_at: input.scheduled_at,
            status,
            views: 0,
            clicks: 0,
            likes: 0,
            shares: 0,
            publish_results: serde_json::Value::Array(Vec::new()),
            created_at: now,
            updated_at: now,
        };

        let post = self
            .post_repository
            .insert(insert_post_entity)
            .await
            .map_err(|err| {
                error!(%owner_id, db_error = ?err, "posts: failed to insert post");
                PostError::Internal(err)
            })?;

        info!(
            %owner_id,
            post_id = %post.id,
            status = %post.status,
            "posts: post created"
        );

        Ok(PostDto::from(post))
    }

    pub async fn list_posts(&self, owner_id: Uuid) -> UseCaseResult<Vec<PostDto>> {
        let posts = self
            .post_repository
            .list_by_owner(owner_id)
            .await
            .map_err(|err| {
                error!(%owner_id, db_error = ?err, "posts: failed to list posts");
                PostError::Internal(err)
            })?;

        Ok(posts.into_iter().map(PostDto::from).collect())
    }

    pub async fn get_post(&self, owner_id: Uuid, post_id: Uuid) -> UseCaseResult<PostDto> {
        self.find_owned(owner_id, post_id).await.map(PostDto::from)
    }

    /// Full overwrite of the editable fields. Status is taken as sent.
    pub async fn update_post(
        &self,
        owner_id: Uuid,
        post_id: Uuid,
        input: PostInput,
    ) -> UseCaseResult<PostDto> {
        let update_post_entity = UpdatePostEntity {
            title: input.title,
            caption: input.caption,
            hashtags: input.hashtags,
            platforms: input.platforms,
            image_url: input.image_url,
            scheduled_for: scheduled_instant(input.scheduled_at.as_deref()),
            scheduled_at: input.scheduled_at,
            status: input.status,
            updated_at: self.clock.now(),
        };

        let updated = self
            .post_repository
            .update(owner_id, post_id, update_post_entity)
            .await
            .map_err(|err| {
                error!(%owner_id, %post_id, db_error = ?err, "posts: failed to update post");
                PostError::Internal(err)
            })?
            .ok_or(PostError::NotFound)?;

        info!(%owner_id, %post_id, "posts: post updated");
        Ok(PostDto::from(updated))
    }

    pub async fn delete_post(&self, owner_id: Uuid, post_id: Uuid) -> UseCaseResult<()> {
        let deleted = self
            .post_repository
            .delete(owner_id, post_id)
            .await
            .map_err(|err| {
                error!(%owner_id, %post_id, db_error = ?err, "posts: failed to delete post");
                PostError::Internal(err)
            })?;

        if !deleted {
            return Err(PostError::NotFound);
        }

        info!(%owner_id, %post_id, "posts: post deleted");
        Ok(())
    }

    pub async fn publish_post(&self, owner_id: Uuid, post_id: Uuid) -> UseCaseResult<PublishSummary> {
        let post = self.find_owned(owner_id, post_id).await?;
        let now = self.clock.now();
        let published = self.publish(&post, now).await?;

        Ok(PublishSummary {
            message: format!("Post published to {} platform(s)", post.platforms.len()),
            post_id: published.id,
            published_at: now,
            results: published.publish_results(),
        })
    }

    /// Simulated fan-out to every target platform. Not idempotent: each call
    /// regenerates the results.
    pub(crate) async fn publish(
        &self,
        post: &PostEntity,
        now: DateTime<Utc>,
    ) -> UseCaseResult<PostEntity> {
        let owner_id = post.owner_id;
        let post_id = post.id;

        let accounts = if post.platforms.is_empty() {
            Vec::new()
        } else {
            self.social_account_repository
                .list_connected(owner_id, post.platforms.clone())
                .await
                .map_err(|err| {
                    error!(
                        %owner_id,
                        %post_id,
                        db_error = ?err,
                        "posts: failed to load connected accounts"
                    );
                    PostError::Internal(err)
                })?
        };

        let mut account_names: HashMap<&str, &str> = HashMap::new();
        for account in &accounts {
            account_names
                .entry(account.platform.as_str())
                .or_insert(account.account_name.as_str());
        }

        let results: Vec<PublishResult> = post
            .platforms
            .iter()
            .map(|platform| {
                PublishResult::simulated(
                    platform,
                    account_names.get(platform.as_str()).copied(),
                    now,
                )
            })
            .collect();

        let publish_results = serde_json::to_value(&results).map_err(anyhow::Error::from)?;

        let publish_post_entity = PublishPostEntity {
            status: PostStatus::Published.to_string(),
            published_at: now,
            publish_results,
            updated_at: now,
        };

        let published = self
            .post_repository
            .mark_published(owner_id, post_id, publish_post_entity)
            .await
            .map_err(|err| {
                error!(%owner_id, %post_id, db_error = ?err, "posts: failed to persist publish");
                PostError::Internal(err)
            })?
            .ok_or(PostError::NotFound)?;

        info!(
            %owner_id,
            %post_id,
            platforms = results.len(),
            "posts: post published"
        );

        Ok(published)
    }

    async fn find_owned(&self, owner_id: Uuid, post_id: Uuid) -> UseCaseResult<PostEntity> {
        self.post_repository
            .find_by_id(owner_id, post_id)
            .await
            .map_err(|err| {
                error!(%owner_id, %post_id, db_error = ?err, "posts: failed to load post");
                PostError::Internal(err)
            })?
            .ok_or(PostError::NotFound)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        application::{interfaces::clock::MockClock, usecases::usage_counter::UsageCounter},
        domain::{
            entities::{social_accounts::SocialAccountEntity, subscribers::SubscriberEntity},
            repositories::{
                posts::MockPostRepository, social_accounts::MockSocialAccountRepository,
                subscribers::MockSubscriberRepository, usage::MockUsageRepository,
            },
            value_objects::posts::DEMO_ACCOUNT_NAME,
        },
    };
    use chrono::{Duration, TimeZone};
    use mockall::predicate::eq;

    pub(crate) type TestPostUseCase = PostUseCase<
        MockPostRepository,
        MockSocialAccountRepository,
        MockSubscriberRepository,
        MockUsageRepository,
        MockClock,
    >;

    pub(crate) fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 18, 10, 0, 0).unwrap()
    }

    pub(crate) fn fixed_clock(at: DateTime<Utc>) -> MockClock {
        let mut clock = MockClock::new();
        clock.expect_now().return_const(at);
        clock
    }

    pub(crate) fn post_entity(owner_id: Uuid, platforms: &[&str]) -> PostEntity {
        PostEntity {
            id: Uuid::new_v4(),
            owner_id,
            title: "Summer launch".to_string(),
            caption: "New collection out now".to_string(),
            hashtags: vec!["#summer".to_string()],
            platforms: platforms.iter().map(|p| p.to_string()).collect(),
            image_url: None,
            scheduled_at: None,
            scheduled_for: None,
            status: "draft".to_string(),
            views: 0,
            clicks: 0,
            likes: 0,
            shares: 0,
            published_at: None,
            publish_results: serde_json::Value::Array(Vec::new()),
            created_at: now() - Duration::days(1),
            updated_at: now() - Duration::days(1),
        }
    }

    pub(crate) fn apply_publish(post: &PostEntity, publish: PublishPostEntity) -> PostEntity {
        PostEntity {
            status: publish.status,
            published_at: Some(publish.published_at),
            publish_results: publish.publish_results,
            updated_at: publish.updated_at,
            ..post.clone()
        }
    }

    pub(crate) fn build_usecase(
        post_repository: MockPostRepository,
        social_account_repository: MockSocialAccountRepository,
        subscriber_repository: MockSubscriberRepository,
        usage_repository: MockUsageRepository,
        at: DateTime<Utc>,
    ) -> TestPostUseCase {
        let evaluator = SubscriptionEvaluator::new(
            Arc::new(subscriber_repository),
            Arc::new(UsageCounter::new(Arc::new(usage_repository))),
            Arc::new(fixed_clock(at)),
        );

        PostUseCase::new(
            Arc::new(post_repository),
            Arc::new(social_account_repository),
            Arc::new(evaluator),
            Arc::new(fixed_clock(at)),
        )
    }

    fn subscriber_repository_with(plan_id: &str, owner_id: Uuid) -> MockSubscriberRepository {
        let subscriber = SubscriberEntity {
            id: owner_id,
            plan_id: plan_id.to_string(),
            plan_expires_at: None,
            created_at: now() - Duration::days(90),
            updated_at: now() - Duration::days(90),
        };

        let mut subscriber_repository = MockSubscriberRepository::new();
        subscriber_repository
            .expect_find_by_id()
            .with(eq(owner_id))
            .returning(move |_| Ok(Some(subscriber.clone())));
        subscriber_repository
    }

    fn usage_repository_with_posts(count: i64) -> MockUsageRepository {
        let mut usage_repository = MockUsageRepository::new();
        usage_repository
            .expect_count()
            .withf(|kind, _, _| *kind == ResourceKind::Posts)
            .returning(move |_, _, _| Ok(count));
        usage_repository
    }

    fn echo_insert(post_repository: &mut MockPostRepository) {
        post_repository.expect_insert().times(1).returning(|insert| {
            Ok(PostEntity {
                id: Uuid::new_v4(),
                owner_id: insert.owner_id,
                title: insert.title,
                caption: insert.caption,
                hashtags: insert.hashtags,
                platforms: insert.platforms,
                image_url: insert.image_url,
                scheduled_at: insert.scheduled_at,
                scheduled_for: insert.scheduled_for,
                status: insert.status,
                views: insert.views,
                clicks: insert.clicks,
                likes: insert.likes,
                shares: insert.shares,
                published_at: None,
                publish_results: insert.publish_results,
                created_at: insert.created_at,
                updated_at: insert.updated_at,
            })
        });
    }

    fn input(scheduled_at: Option<String>, status: &str) -> PostInput {
        PostInput {
            title: "Summer launch".to_string(),
            caption: "New collection out now".to_string(),
            hashtags: vec![],
            platforms: vec!["instagram".to_string()],
            image_url: None,
            scheduled_at,
            status: status.to_string(),
        }
    }

    #[test]
    fn future_schedule_forces_scheduled_status() {
        let future = (now() + Duration::hours(2)).to_rfc3339();
        assert_eq!(
            resolve_initial_status("draft", Some(&future), now()),
            "scheduled"
        );
    }

    #[test]
    fn past_or_missing_schedule_keeps_requested_status() {
        let past = (now() - Duration::hours(2)).to_rfc3339();
        assert_eq!(resolve_initial_status("draft", Some(&past), now()), "draft");
        assert_eq!(resolve_initial_status("draft", None, now()), "draft");
        assert_eq!(resolve_initial_status("review", None, now()), "review");
        // Exactly now is not in the future.
        assert_eq!(
            resolve_initial_status("draft", Some(&now().to_rfc3339()), now()),
            "draft"
        );
    }

    #[test]
    fn unparsable_schedule_keeps_requested_status() {
        assert_eq!(
            resolve_initial_status("draft", Some("next friday"), now()),
            "draft"
        );
    }

    #[tokio::test]
    async fn create_post_with_future_schedule_is_scheduled() {
        let owner_id = Uuid::new_v4();
        let mut post_repository = MockPostRepository::new();
        echo_insert(&mut post_repository);

        let usecase = build_usecase(
            post_repository,
            MockSocialAccountRepository::new(),
            subscriber_repository_with("starter", owner_id),
            usage_repository_with_posts(3),
            now(),
        );

        let scheduled_at = Some("2025-06-18T11:00:00Z".to_string());
        let post = usecase
            .create_post(owner_id, input(scheduled_at.clone(), "draft"))
            .await
            .unwrap();

        assert_eq!(post.status, "scheduled");
        assert_eq!(post.scheduled_at, scheduled_at);
        assert_eq!(post.views, 0);
        assert_eq!(post.clicks, 0);
        assert!(post.publish_results.is_empty());
    }

    #[tokio::test]
    async fn create_post_stores_parsed_due_time_next_to_raw_text() {
        let owner_id = Uuid::new_v4();
        let mut post_repository = MockPostRepository::new();
        post_repository
            .expect_insert()
            .withf(|insert| {
                insert.scheduled_at.as_deref() == Some("2025-06-18 09:30:00")
                    && insert.scheduled_for == Some(now() - Duration::minutes(30))
            })
            .times(1)
            .returning(|insert| {
                Ok(PostEntity {
                    scheduled_at: insert.scheduled_at,
                    scheduled_for: insert.scheduled_for,
                    status: insert.status,
                    ..post_entity(insert.owner_id, &[])
                })
            });
        post_repository
            .expect_insert()
            .withf(|insert| insert.scheduled_at.as_deref() == Some("someday"))
            .times(1)
            .returning(|insert| {
                assert_eq!(insert.scheduled_for, None);
                Ok(PostEntity {
                    scheduled_at: insert.scheduled_at,
                    status: insert.status,
                    ..post_entity(insert.owner_id, &[])
                })
            });

        let usecase = build_usecase(
            post_repository,
            MockSocialAccountRepository::new(),
            subscriber_repository_with("professional", owner_id),
            usage_repository_with_posts(0),
            now(),
        );

        let naive = usecase
            .create_post(owner_id, input(Some("2025-06-18 09:30:00".to_string()), "draft"))
            .await
            .unwrap();
        assert_eq!(naive.status, "draft");

        let unparsable = usecase
            .create_post(owner_id, input(Some("someday".to_string()), "draft"))
            .await
            .unwrap();
        assert_eq!(unparsable.scheduled_at.as_deref(), Some("someday"));
    }

    #[tokio::test]
    async fn create_post_without_schedule_defaults_to_draft() {
        let owner_id = Uuid::new_v4();
        let mut post_repository = MockPostRepository::new();
        echo_insert(&mut post_repository);

        let usecase = build_usecase(
            post_repository,
            MockSocialAccountRepository::new(),
            subscriber_repository_with("free", owner_id),
            usage_repository_with_posts(0),
            now(),
        );

        let post = usecase
            .create_post(owner_id, input(None, "draft"))
            .await
            .unwrap();

        assert_eq!(post.status, "draft");
    }

    #[tokio::test]
    async fn create_post_over_quota_writes_nothing() {
        let owner_id = Uuid::new_v4();
        let mut post_repository = MockPostRepository::new();
        post_repository.expect_insert().never();

        let usecase = build_usecase(
            post_repository,
            MockSocialAccountRepository::new(),
            subscriber_repository_with("starter", owner_id),
            usage_repository_with_posts(100),
            now(),
        );

        let result = usecase.create_post(owner_id, input(None, "draft")).await;

        match result {
            Err(err @ PostError::QuotaExceeded(ResourceKind::Posts)) => {
                assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
            }
            other => panic!("expected quota error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn quota_resets_in_a_new_month() {
        let owner_id = Uuid::new_v4();
        let next_month = Utc.with_ymd_and_hms(2025, 7, 1, 0, 5, 0).unwrap();

        let mut usage_repository = MockUsageRepository::new();
        usage_repository
            .expect_count()
            .with(
                eq(ResourceKind::Posts),
                eq(owner_id),
                eq(Some(Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap())),
            )
            .returning(|_, _, _| Ok(0));

        let mut post_repository = MockPostRepository::new();
        echo_insert(&mut post_repository);

        let usecase = build_usecase(
            post_repository,
            MockSocialAccountRepository::new(),
            subscriber_repository_with("starter", owner_id),
            usage_repository,
            next_month,
        );

        assert!(usecase.create_post(owner_id, input(None, "draft")).await.is_ok());
    }

    #[tokio::test]
    async fn publish_builds_one_result_per_platform() {
        let owner_id = Uuid::new_v4();
        let post = post_entity(owner_id, &["instagram", "facebook"]);
        let post_id = post.id;
        let stored = post.clone();

        let mut post_repository = MockPostRepository::new();
        post_repository
            .expect_find_by_id()
            .with(eq(owner_id), eq(post_id))
            .returning(move |_, _| Ok(Some(stored.clone())));
        let published_source = post.clone();
        post_repository
            .expect_mark_published()
            .withf(move |owner, id, publish| {
                *owner == owner_id && *id == post_id && publish.status == "published"
            })
            .times(1)
            .returning(move |_, _, publish| Ok(Some(apply_publish(&published_source, publish))));

        let mut social_account_repository = MockSocialAccountRepository::new();
        social_account_repository
            .expect_list_connected()
            .with(
                eq(owner_id),
                eq(vec!["instagram".to_string(), "facebook".to_string()]),
            )
            .returning(move |_, _| {
                Ok(vec![SocialAccountEntity {
                    id: Uuid::new_v4(),
                    owner_id,
                    platform: "instagram".to_string(),
                    account_name: "@summer_brand".to_string(),
                    external_account_id: None,
                    is_active: true,
                    connected_at: now() - Duration::days(7),
                }])
            });

        let usecase = build_usecase(
            post_repository,
            social_account_repository,
            MockSubscriberRepository::new(),
            MockUsageRepository::new(),
            now(),
        );

        let summary = usecase.publish_post(owner_id, post_id).await.unwrap();

        assert_eq!(summary.post_id, post_id);
        assert_eq!(summary.published_at, now());
        assert_eq!(summary.results.len(), 2);
        assert_eq!(summary.results[0].platform, "instagram");
        assert_eq!(summary.results[0].account_name, "@summer_brand");
        assert_eq!(summary.results[1].platform, "facebook");
        assert_eq!(summary.results[1].account_name, DEMO_ACCOUNT_NAME);
        assert!(summary.results.iter().all(|r| r.published_at == now()));
    }

    #[tokio::test]
    async fn publish_with_no_platforms_still_marks_published() {
        let owner_id = Uuid::new_v4();
        let post = post_entity(owner_id, &[]);
        let post_id = post.id;
        let stored = post.clone();

        let mut post_repository = MockPostRepository::new();
        post_repository
            .expect_find_by_id()
            .returning(move |_, _| Ok(Some(stored.clone())));
        post_repository
            .expect_mark_published()
            .times(1)
            .returning(move |_, _, publish| Ok(Some(apply_publish(&post, publish))));

        let mut social_account_repository = MockSocialAccountRepository::new();
        social_account_repository.expect_list_connected().never();

        let usecase = build_usecase(
            post_repository,
            social_account_repository,
            MockSubscriberRepository::new(),
            MockUsageRepository::new(),
            now(),
        );

        let summary = usecase.publish_post(owner_id, post_id).await.unwrap();
        assert!(summary.results.is_empty());
    }

    #[tokio::test]
    async fn republishing_regenerates_results() {
        let owner_id = Uuid::new_v4();
        let post = post_entity(owner_id, &["linkedin"]);
        let post_id = post.id;
        let stored = post.clone();

        let mut post_repository = MockPostRepository::new();
        post_repository
            .expect_find_by_id()
            .returning(move |_, _| Ok(Some(stored.clone())));
        post_repository
            .expect_mark_published()
            .times(2)
            .returning(move |_, _, publish| Ok(Some(apply_publish(&post, publish))));

        let mut social_account_repository = MockSocialAccountRepository::new();
        social_account_repository
            .expect_list_connected()
            .returning(|_, _| Ok(vec![]));

        let usecase = build_usecase(
            post_repository,
            social_account_repository,
            MockSubscriberRepository::new(),
            MockUsageRepository::new(),
            now(),
        );

        let first = usecase.publish_post(owner_id, post_id).await.unwrap();
        let second = usecase.publish_post(owner_id, post_id).await.unwrap();

        assert_eq!(first.results.len(), 1);
        assert_eq!(second.results.len(), 1);
        assert_ne!(first.results[0].external_id, second.results[0].external_id);
    }

    #[tokio::test]
    async fn foreign_posts_are_not_found() {
        let owner_id = Uuid::new_v4();
        let post_id = Uuid::new_v4();

        let mut post_repository = MockPostRepository::new();
        post_repository
            .expect_find_by_id()
            .with(eq(owner_id), eq(post_id))
            .returning(|_, _| Ok(None));
        post_repository
            .expect_update()
            .returning(|_, _, _| Ok(None));
        post_repository.expect_delete().returning(|_, _| Ok(false));
        post_repository.expect_mark_published().never();

        let usecase = build_usecase(
            post_repository,
            MockSocialAccountRepository::new(),
            MockSubscriberRepository::new(),
            MockUsageRepository::new(),
            now(),
        );

        assert!(matches!(
            usecase.get_post(owner_id, post_id).await,
            Err(PostError::NotFound)
        ));
        assert!(matches!(
            usecase.publish_post(owner_id, post_id).await,
            Err(PostError::NotFound)
        ));
        assert!(matches!(
            usecase
                .update_post(owner_id, post_id, input(None, "draft"))
                .await,
            Err(PostError::NotFound)
        ));
        assert!(matches!(
            usecase.delete_post(owner_id, post_id).await,
            Err(PostError::NotFound)
        ));
    }

    #[tokio::test]
    async fn update_overwrites_without_recomputing_status() {
        let owner_id = Uuid::new_v4();
        let post = post_entity(owner_id, &["instagram"]);
        let post_id = post.id;

        let mut post_repository = MockPostRepository::new();
        post_repository
            .expect_update()
            .withf(|_, _, update| {
                update.status == "draft"
                    && update.scheduled_at.as_deref() == Some("2099-01-01T00:00:00Z")
                    && update.scheduled_for == Some(Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap())
                    && update.image_url.is_none()
            })
            .times(1)
            .returning(move |_, _, update| {
                Ok(Some(PostEntity {
                    title: update.title,
                    caption: update.caption,
                    hashtags: update.hashtags,
                    platforms: update.platforms,
                    image_url: update.image_url,
                    scheduled_at: update.scheduled_at,
                    scheduled_for: update.scheduled_for,
                    status: update.status,
                    updated_at: update.updated_at,
                    ..post.clone()
                }))
            });

        let usecase = build_usecase(
            post_repository,
            MockSocialAccountRepository::new(),
            MockSubscriberRepository::new(),
            MockUsageRepository::new(),
            now(),
        );

        let updated = usecase
            .update_post(
                owner_id,
                post_id,
                input(Some("2099-01-01T00:00:00Z".to_string()), "draft"),
            )
            .await
            .unwrap();

        assert_eq!(updated.status, "draft");
    }

    #[tokio::test]
    async fn create_post_for_unknown_subscriber_is_not_found() {
        let owner_id = Uuid::new_v4();
        let mut subscriber_repository = MockSubscriberRepository::new();
        subscriber_repository
            .expect_find_by_id()
            .returning(|_| Ok(None));

        let usecase = build_usecase(
            MockPostRepository::new(),
            MockSocialAccountRepository::new(),
            subscriber_repository,
            MockUsageRepository::new(),
            now(),
        );

        let err = usecase
            .create_post(owner_id, input(None, "draft"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }
}
