use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    repositories::usage::UsageRepository,
    value_objects::{enums::resource_kinds::ResourceKind, schedules::start_of_month},
};

/// Counts consumed units per resource kind. Never cached: every entitlement check
/// reads fresh numbers.
pub struct UsageCounter<U>
where
    U: UsageRepository + Send + Sync + 'static,
{
    usage_repository: Arc<U>,
}

impl<U> UsageCounter<U>
where
    U: UsageRepository + Send + Sync + 'static,
{
    pub fn new(usage_repository: Arc<U>) -> Self {
        Self { usage_repository }
    }

    pub async fn count(
        &self,
        kind: ResourceKind,
        subscriber_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<i64> {
        // Flag-only kind, nothing to count.
        if kind == ResourceKind::LeadCapture {
            return Ok(0);
        }

        let since = kind.is_month_scoped().then(|| start_of_month(now));
        let count = self
            .usage_repository
            .count(kind, subscriber_id, since)
            .await?;

        debug!(
            %subscriber_id,
            resource = %kind,
            since = ?since,
            count,
            "usage_counter: counted resource usage"
        );

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::usage::MockUsageRepository;
    use chrono::TimeZone;
    use mockall::predicate::eq;

    fn mid_month() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 18, 10, 15, 0).unwrap()
    }

    #[tokio::test]
    async fn month_scoped_kinds_count_from_first_of_month() {
        let subscriber_id = Uuid::new_v4();
        let mut usage_repository = MockUsageRepository::new();

        usage_repository
            .expect_count()
            .with(
                eq(ResourceKind::Posts),
                eq(subscriber_id),
                eq(Some(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap())),
            )
            .times(1)
            .returning(|_, _, _| Ok(42));

        let counter = UsageCounter::new(Arc::new(usage_repository));
        let count = counter
            .count(ResourceKind::Posts, subscriber_id, mid_month())
            .await
            .unwrap();

        assert_eq!(count, 42);
    }

    #[tokio::test]
    async fn ai_generations_are_month_scoped() {
        let subscriber_id = Uuid::new_v4();
        let mut usage_repository = MockUsageRepository::new();

        usage_repository
            .expect_count()
            .withf(|kind, _, since| *kind == ResourceKind::AiGenerations && since.is_some())
            .times(1)
            .returning(|_, _, _| Ok(3));

        let counter = UsageCounter::new(Arc::new(usage_repository));
        let count = counter
            .count(ResourceKind::AiGenerations, subscriber_id, mid_month())
            .await
            .unwrap();

        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn lifetime_kinds_count_without_window() {
        let subscriber_id = Uuid::new_v4();
        let mut usage_repository = MockUsageRepository::new();

        for kind in [
            ResourceKind::Templates,
            ResourceKind::LandingPages,
            ResourceKind::SocialAccounts,
            ResourceKind::TeamMembers,
        ] {
            usage_repository
                .expect_count()
                .with(eq(kind), eq(subscriber_id), eq(None::<DateTime<Utc>>))
                .times(1)
                .returning(|_, _, _| Ok(7));
        }

        let counter = UsageCounter::new(Arc::new(usage_repository));
        for kind in [
            ResourceKind::Templates,
            ResourceKind::LandingPages,
            ResourceKind::SocialAccounts,
            ResourceKind::TeamMembers,
        ] {
            assert_eq!(
                counter.count(kind, subscriber_id, mid_month()).await.unwrap(),
                7
            );
        }
    }

    #[tokio::test]
    async fn lead_capture_never_hits_storage() {
        let usage_repository = MockUsageRepository::new();
        let counter = UsageCounter::new(Arc::new(usage_repository));

        let count = counter
            .count(ResourceKind::LeadCapture, Uuid::new_v4(), mid_month())
            .await
            .unwrap();

        assert_eq!(count, 0);
    }
}
