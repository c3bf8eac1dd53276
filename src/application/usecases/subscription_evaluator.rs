use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    application::{interfaces::clock::Clock, usecases::usage_counter::UsageCounter},
    domain::{
        entities::subscribers::SubscriberEntity,
        repositories::{subscribers::SubscriberRepository, usage::UsageRepository},
        value_objects::{
            enums::resource_kinds::ResourceKind,
            plans::{EXPIRED_PLAN, EffectivePlan, PlanCatalog, UNLIMITED},
        },
    },
};

#[derive(Debug, Error)]
pub enum EntitlementError {
    #[error("subscriber not found")]
    SubscriberNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl EntitlementError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            EntitlementError::SubscriberNotFound => StatusCode::NOT_FOUND,
            EntitlementError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Plan in force at `now`. A lapsed trial or paid period yields the fixed expired tier
/// while the stored `plan_id` is left untouched.
pub fn resolve_effective_plan(subscriber: &SubscriberEntity, now: DateTime<Utc>) -> EffectivePlan {
    match subscriber.plan_expires_at {
        Some(expires_at) if now > expires_at => EffectivePlan {
            plan: EXPIRED_PLAN,
            is_expired: true,
            expires_at: Some(expires_at),
        },
        expires_at => EffectivePlan {
            plan: PlanCatalog::lookup(&subscriber.plan_id),
            is_expired: false,
            expires_at,
        },
    }
}

/// Decides whether a subscriber may consume one more unit of a resource.
pub struct SubscriptionEvaluator<S, U, C>
where
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    subscriber_repository: Arc<S>,
    usage_counter: Arc<UsageCounter<U>>,
    clock: Arc<C>,
}

impl<S, U, C> SubscriptionEvaluator<S, U, C>
where
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    pub fn new(
        subscriber_repository: Arc<S>,
        usage_counter: Arc<UsageCounter<U>>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            subscriber_repository,
            usage_counter,
            clock,
        }
    }

    pub async fn load_subscriber(
        &self,
        subscriber_id: Uuid,
    ) -> Result<SubscriberEntity, EntitlementError> {
        self.subscriber_repository
            .find_by_id(subscriber_id)
            .await
            .map_err(|err| {
                error!(
                    %subscriber_id,
                    db_error = ?err,
                    "entitlements: failed to load subscriber"
                );
                EntitlementError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = EntitlementError::SubscriberNotFound;
                warn!(
                    %subscriber_id,
                    status = err.status_code().as_u16(),
                    "entitlements: subscriber not found"
                );
                err
            })
    }

    /// `current_count` lets a caller that already counted skip the extra read.
    pub async fn can_consume(
        &self,
        subscriber: &SubscriberEntity,
        kind: ResourceKind,
        now: DateTime<Utc>,
        current_count: Option<i64>,
    ) -> Result<bool, EntitlementError> {
        let effective = resolve_effective_plan(subscriber, now);
        let limits = effective.limits();

        if kind == ResourceKind::LeadCapture {
            return Ok(limits.lead_capture);
        }

        if kind == ResourceKind::AiGenerations && !limits.ai_content {
            debug!(
                subscriber_id = %subscriber.id,
                plan_id = %effective.plan.id,
                "entitlements: plan has no ai content"
            );
            return Ok(false);
        }

        let limit = match kind.limit_in(limits) {
            Some(limit) => limit,
            None => return Ok(true),
        };

        if limit == UNLIMITED {
            return Ok(true);
        }

        let count = match current_count {
            Some(count) => count,
            None => self
                .usage_counter
                .count(kind, subscriber.id, now)
                .await
                .map_err(|err| {
                    error!(
                        subscriber_id = %subscriber.id,
                        resource = %kind,
                        db_error = ?err,
                        "entitlements: failed to count usage"
                    );
                    EntitlementError::Internal(err)
                })?,
        };

        let allowed = count < limit;
        debug!(
            subscriber_id = %subscriber.id,
            plan_id = %effective.plan.id,
            resource = %kind,
            count,
            limit,
            allowed,
            "entitlements: quota evaluated"
        );

        Ok(allowed)
    }

    pub async fn resolve_plan(&self, subscriber_id: Uuid) -> Result<EffectivePlan, EntitlementError> {
        let subscriber = self.load_subscriber(subscriber_id).await?;
        let effective = resolve_effective_plan(&subscriber, self.clock.now());

        info!(
            %subscriber_id,
            stored_plan_id = %subscriber.plan_id,
            effective_plan_id = %effective.plan.id,
            is_expired = effective.is_expired,
            "entitlements: effective plan resolved"
        );

        Ok(effective)
    }

    pub async fn check_quota(
        &self,
        subscriber_id: Uuid,
        kind: ResourceKind,
    ) -> Result<bool, EntitlementError> {
        let subscriber = self.load_subscriber(subscriber_id).await?;
        self.can_consume(&subscriber, kind, self.clock.now(), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::interfaces::clock::MockClock,
        domain::{
            repositories::{subscribers::MockSubscriberRepository, usage::MockUsageRepository},
            value_objects::plans::{
                ENTERPRISE_PLAN, FREE_PLAN, PROFESSIONAL_PLAN, PlanId, STARTER_PLAN,
            },
        },
    };
    use chrono::{Duration, TimeZone};
    use mockall::predicate::eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 18, 10, 0, 0).unwrap()
    }

    fn subscriber(plan_id: &str, plan_expires_at: Option<DateTime<Utc>>) -> SubscriberEntity {
        SubscriberEntity {
            id: Uuid::new_v4(),
            plan_id: plan_id.to_string(),
            plan_expires_at,
            created_at: now() - Duration::days(60),
            updated_at: now() - Duration::days(60),
        }
    }

    fn evaluator(
        subscriber_repository: MockSubscriberRepository,
        usage_repository: MockUsageRepository,
    ) -> SubscriptionEvaluator<MockSubscriberRepository, MockUsageRepository, MockClock> {
        let mut clock = MockClock::new();
        clock.expect_now().return_const(now());

        SubscriptionEvaluator::new(
            Arc::new(subscriber_repository),
            Arc::new(UsageCounter::new(Arc::new(usage_repository))),
            Arc::new(clock),
        )
    }

    #[test]
    fn lapsed_expiry_yields_expired_plan_for_every_tier() {
        for plan in [FREE_PLAN, STARTER_PLAN, PROFESSIONAL_PLAN, ENTERPRISE_PLAN] {
            let lapsed = subscriber(&plan.id.to_string(), Some(now() - Duration::seconds(1)));
            let effective = resolve_effective_plan(&lapsed, now());
            assert!(effective.is_expired);
            assert_eq!(effective.plan, EXPIRED_PLAN);

            let current = subscriber(&plan.id.to_string(), Some(now() + Duration::days(1)));
            let effective = resolve_effective_plan(&current, now());
            assert!(!effective.is_expired);
            assert_eq!(effective.plan, plan);
        }
    }

    #[test]
    fn expiry_instant_itself_is_still_active() {
        let at_boundary = subscriber("starter", Some(now()));
        let effective = resolve_effective_plan(&at_boundary, now());
        assert!(!effective.is_expired);
        assert_eq!(effective.plan.id, PlanId::Starter);
    }

    #[test]
    fn missing_expiry_never_expires() {
        let open_ended = subscriber("professional", None);
        let effective = resolve_effective_plan(&open_ended, now() + Duration::days(3650));
        assert!(!effective.is_expired);
        assert_eq!(effective.plan.id, PlanId::Professional);
    }

    #[test]
    fn resolving_does_not_rewrite_stored_plan() {
        let lapsed = subscriber("starter", Some(now() - Duration::days(1)));
        let _ = resolve_effective_plan(&lapsed, now());
        assert_eq!(lapsed.plan_id, "starter");
    }

    #[tokio::test]
    async fn unlimited_limits_allow_any_usage() {
        let evaluator = evaluator(MockSubscriberRepository::new(), MockUsageRepository::new());
        let enterprise = subscriber("enterprise", None);

        for kind in [
            ResourceKind::Posts,
            ResourceKind::Templates,
            ResourceKind::LandingPages,
            ResourceKind::AiGenerations,
            ResourceKind::SocialAccounts,
            ResourceKind::TeamMembers,
        ] {
            for count in [0, 1, 10_000, i64::MAX] {
                assert!(
                    evaluator
                        .can_consume(&enterprise, kind, now(), Some(count))
                        .await
                        .unwrap()
                );
            }
        }
    }

    #[tokio::test]
    async fn unlimited_limits_skip_counting() {
        // No expectation on the usage mock: any count call would panic.
        let evaluator = evaluator(MockSubscriberRepository::new(), MockUsageRepository::new());
        let enterprise = subscriber("enterprise", None);

        assert!(
            evaluator
                .can_consume(&enterprise, ResourceKind::Posts, now(), None)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn finite_limit_is_strict_less_than() {
        let evaluator = evaluator(MockSubscriberRepository::new(), MockUsageRepository::new());
        let starter = subscriber("starter", None);

        for count in 0..100 {
            assert!(
                evaluator
                    .can_consume(&starter, ResourceKind::Posts, now(), Some(count))
                    .await
                    .unwrap(),
                "count {count} should be allowed"
            );
        }
        assert!(
            !evaluator
                .can_consume(&starter, ResourceKind::Posts, now(), Some(100))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn fresh_count_is_used_when_none_supplied() {
        let starter = subscriber("starter", None);
        let mut usage_repository = MockUsageRepository::new();
        usage_repository
            .expect_count()
            .with(
                eq(ResourceKind::Templates),
                eq(starter.id),
                eq(None::<DateTime<Utc>>),
            )
            .times(1)
            .returning(|_, _, _| Ok(20));

        let evaluator = evaluator(MockSubscriberRepository::new(), usage_repository);

        assert!(
            !evaluator
                .can_consume(&starter, ResourceKind::Templates, now(), None)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn ai_generations_require_ai_content_flag() {
        let evaluator = evaluator(MockSubscriberRepository::new(), MockUsageRepository::new());
        let lapsed = subscriber("enterprise", Some(now() - Duration::days(1)));

        assert!(
            !evaluator
                .can_consume(&lapsed, ResourceKind::AiGenerations, now(), Some(0))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn lead_capture_is_flag_only() {
        let evaluator = evaluator(MockSubscriberRepository::new(), MockUsageRepository::new());

        let trial = subscriber("free", Some(now() + Duration::days(10)));
        assert!(
            evaluator
                .can_consume(&trial, ResourceKind::LeadCapture, now(), Some(1_000_000))
                .await
                .unwrap()
        );

        let lapsed = subscriber("free", Some(now() - Duration::days(1)));
        assert!(
            !evaluator
                .can_consume(&lapsed, ResourceKind::LeadCapture, now(), Some(0))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn expired_subscriber_is_held_to_grace_limits() {
        let evaluator = evaluator(MockSubscriberRepository::new(), MockUsageRepository::new());
        let lapsed = subscriber("professional", Some(now() - Duration::days(1)));

        assert!(
            evaluator
                .can_consume(&lapsed, ResourceKind::Posts, now(), Some(9))
                .await
                .unwrap()
        );
        assert!(
            !evaluator
                .can_consume(&lapsed, ResourceKind::Posts, now(), Some(10))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn check_quota_loads_subscriber_and_counts() {
        let starter = subscriber("starter", None);
        let subscriber_id = starter.id;

        let mut subscriber_repository = MockSubscriberRepository::new();
        subscriber_repository
            .expect_find_by_id()
            .with(eq(subscriber_id))
            .times(1)
            .returning(move |_| Ok(Some(starter.clone())));

        let mut usage_repository = MockUsageRepository::new();
        usage_repository
            .expect_count()
            .times(1)
            .returning(|_, _, _| Ok(4));

        let evaluator = evaluator(subscriber_repository, usage_repository);

        assert!(
            evaluator
                .check_quota(subscriber_id, ResourceKind::SocialAccounts)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn check_quota_reports_missing_subscriber() {
        let mut subscriber_repository = MockSubscriberRepository::new();
        subscriber_repository
            .expect_find_by_id()
            .returning(|_| Ok(None));

        let evaluator = evaluator(subscriber_repository, MockUsageRepository::new());
        let result = evaluator
            .check_quota(Uuid::new_v4(), ResourceKind::Posts)
            .await;

        assert!(matches!(result, Err(EntitlementError::SubscriberNotFound)));
    }

    #[tokio::test]
    async fn resolve_plan_uses_clock() {
        let lapsed = subscriber("starter", Some(now() - Duration::hours(1)));
        let subscriber_id = lapsed.id;

        let mut subscriber_repository = MockSubscriberRepository::new();
        subscriber_repository
            .expect_find_by_id()
            .with(eq(subscriber_id))
            .returning(move |_| Ok(Some(lapsed.clone())));

        let evaluator = evaluator(subscriber_repository, MockUsageRepository::new());
        let effective = evaluator.resolve_plan(subscriber_id).await.unwrap();

        assert!(effective.is_expired);
        assert_eq!(effective.plan.id, PlanId::Expired);
    }
}
