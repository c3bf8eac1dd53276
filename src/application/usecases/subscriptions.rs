use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::{
        interfaces::{checkout::CheckoutGateway, clock::Clock},
        usecases::{
            subscription_evaluator::{
                EntitlementError, SubscriptionEvaluator, resolve_effective_plan,
            },
            usage_counter::UsageCounter,
        },
    },
    domain::{
        entities::{subscribers::InsertSubscriberEntity, usage_logs::InsertUsageLogEntity},
        repositories::{subscribers::SubscriberRepository, usage::UsageRepository},
        value_objects::{
            enums::{payment_modes::PaymentMode, resource_kinds::ResourceKind},
            plans::{EffectivePlan, PAID_PERIOD_DAYS, PlanCatalog, PlanId, trial_expiry},
            subscriptions::{
                CheckoutPaymentStatus, CheckoutSessionDto, CheckoutStatusDto, PlanDto,
                QuotaCheckDto, SubscriptionOverviewDto, SubscriptionStatusDto, UsageDto,
            },
        },
    },
};

/// Generation kinds that draw from the monthly AI allowance.
pub const AI_GENERATION_KINDS: [&str; 3] = ["caption", "hashtags", "image"];

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("subscriber not found")]
    SubscriberNotFound,
    #[error("subscriber already registered")]
    AlreadyRegistered,
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("{0} limit reached for the current plan")]
    QuotaExceeded(ResourceKind),
    #[error("checkout session not found")]
    CheckoutNotFound,
    #[error("payments unavailable: {0}")]
    Unconfigured(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SubscriptionError::SubscriberNotFound | SubscriptionError::CheckoutNotFound => {
                StatusCode::NOT_FOUND
            }
            SubscriptionError::AlreadyRegistered => StatusCode::CONFLICT,
            SubscriptionError::InvalidPlan(_) | SubscriptionError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            SubscriptionError::QuotaExceeded(_) => StatusCode::FORBIDDEN,
            SubscriptionError::Unconfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            SubscriptionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<EntitlementError> for SubscriptionError {
    fn from(value: EntitlementError) -> Self {
        match value {
            EntitlementError::SubscriberNotFound => SubscriptionError::SubscriberNotFound,
            EntitlementError::Internal(err) => SubscriptionError::Internal(err),
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, SubscriptionError>;

pub struct SubscriptionUseCase<S, U, C, G>
where
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
    G: CheckoutGateway + Send + Sync + 'static,
{
    subscriber_repository: Arc<S>,
    usage_repository: Arc<U>,
    usage_counter: Arc<UsageCounter<U>>,
    subscription_evaluator: Arc<SubscriptionEvaluator<S, U, C>>,
    checkout_gateway: Arc<G>,
    clock: Arc<C>,
}

impl<S, U, C, G> SubscriptionUseCase<S, U, C, G>
where
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
    G: CheckoutGateway + Send + Sync + 'static,
{
    pub fn new(
        subscriber_repository: Arc<S>,
        usage_repository: Arc<U>,
        checkout_gateway: Arc<G>,
        clock: Arc<C>,
    ) -> Self {
        let usage_counter = Arc::new(UsageCounter::new(Arc::clone(&usage_repository)));
        let subscription_evaluator = Arc::new(SubscriptionEvaluator::new(
            Arc::clone(&subscriber_repository),
            Arc::clone(&usage_counter),
            Arc::clone(&clock),
        ));

        Self {
            subscriber_repository,
            usage_repository,
            usage_counter,
            subscription_evaluator,
            checkout_gateway,
            clock,
        }
    }

    pub fn list_plans(&self) -> Vec<PlanDto> {
        PlanCatalog::all().iter().copied().map(PlanDto::from).collect()
    }

    /// Starts the free trial for a new subscriber.
    pub async fn register_subscriber(&self, subscriber_id: Uuid) -> UseCaseResult<SubscriptionStatusDto> {
        let existing = self
            .subscriber_repository
            .find_by_id(subscriber_id)
            .await
            .map_err(|err| {
                error!(%subscriber_id, db_error = ?err, "subscriptions: failed to load subscriber");
                SubscriptionError::Internal(err)
            })?;
        if existing.is_some() {
            warn!(%subscriber_id, "subscriptions: subscriber already registered");
            return Err(SubscriptionError::AlreadyRegistered);
        }

        let now = self.clock.now();
        let subscriber = self
            .subscriber_repository
            .create(InsertSubscriberEntity {
                id: subscriber_id,
                plan_id: PlanId::Free.to_string(),
                plan_expires_at: trial_expiry(now),
                created_at: now,
                updated_at: now,
            })
            .await
            .map_err(|err| {
                error!(%subscriber_id, db_error = ?err, "subscriptions: failed to create subscriber");
                SubscriptionError::Internal(err)
            })?;

        info!(
            %subscriber_id,
            expires_at = ?subscriber.plan_expires_at,
            "subscriptions: trial started"
        );

        let effective = resolve_effective_plan(&subscriber, now);
        Ok(status_dto(&subscriber.plan_id, &effective, now))
    }

    pub async fn resolve_plan(&self, subscriber_id: Uuid) -> UseCaseResult<EffectivePlan> {
        Ok(self.subscription_evaluator.resolve_plan(subscriber_id).await?)
    }

    pub async fn check_quota(
        &self,
        subscriber_id: Uuid,
        resource: ResourceKind,
    ) -> UseCaseResult<QuotaCheckDto> {
        let allowed = self
            .subscription_evaluator
            .check_quota(subscriber_id, resource)
            .await?;

        Ok(QuotaCheckDto {
            subscriber_id,
            resource,
            allowed,
        })
    }

    pub async fn subscription_overview(
        &self,
        subscriber_id: Uuid,
    ) -> UseCaseResult<SubscriptionOverviewDto> {
        let subscriber = self
            .subscription_evaluator
            .load_subscriber(subscriber_id)
            .await?;
        let now = self.clock.now();
        let effective = resolve_effective_plan(&subscriber, now);
        let limits = *effective.limits();

        let usage = UsageDto {
            posts_this_month: self.count(ResourceKind::Posts, subscriber_id, now).await?,
            posts_limit: limits.posts_per_month,
            templates_count: self.count(ResourceKind::Templates, subscriber_id, now).await?,
            templates_limit: limits.templates,
            landing_pages_count: self
                .count(ResourceKind::LandingPages, subscriber_id, now)
                .await?,
            landing_pages_limit: limits.landing_pages,
            ai_generations_this_month: self
                .count(ResourceKind::AiGenerations, subscriber_id, now)
                .await?,
            ai_generations_limit: limits.ai_generations_per_month,
            social_accounts_count: self
                .count(ResourceKind::SocialAccounts, subscriber_id, now)
                .await?,
            social_accounts_limit: limits.social_accounts,
            team_members_count: self
                .count(ResourceKind::TeamMembers, subscriber_id, now)
                .await?,
            team_members_limit: limits.team_members,
        };

        Ok(SubscriptionOverviewDto {
            plan: PlanDto::from(effective.plan),
            subscription_status: status_dto(&subscriber.plan_id, &effective, now),
            usage,
            ai_content: limits.ai_content,
            lead_capture: limits.lead_capture,
            analytics: limits.analytics,
        })
    }

    pub async fn create_checkout(
        &self,
        subscriber_id: Uuid,
        plan_id: String,
    ) -> UseCaseResult<CheckoutSessionDto> {
        let plan = PlanId::from_str(&plan_id)
            .filter(PlanId::is_purchasable)
            .ok_or_else(|| SubscriptionError::InvalidPlan(plan_id.clone()))?;

        let mode = self.checkout_gateway.mode();
        if mode == PaymentMode::Live {
            warn!(%subscriber_id, %plan, "subscriptions: live checkout requested without provider");
            return Err(SubscriptionError::Unconfigured(
                "live payment provider is not configured".to_string(),
            ));
        }

        self.subscription_evaluator
            .load_subscriber(subscriber_id)
            .await?;

        let session = self
            .checkout_gateway
            .create_session(subscriber_id, plan.to_string())
            .await
            .map_err(|err| {
                error!(%subscriber_id, %plan, error = ?err, "subscriptions: checkout session failed");
                SubscriptionError::Internal(err)
            })?;

        info!(
            %subscriber_id,
            %plan,
            session_id = %session.session_id,
            "subscriptions: checkout session created"
        );

        Ok(CheckoutSessionDto {
            session_id: session.session_id,
            url: session.url,
            mode,
        })
    }

    /// Reports a checkout session. The first time a paid session is seen the
    /// subscriber is moved to the bought plan for one paid period.
    pub async fn checkout_status(
        &self,
        subscriber_id: Uuid,
        session_id: String,
    ) -> UseCaseResult<CheckoutStatusDto> {
        let session = self
            .checkout_gateway
            .find_session(session_id.clone())
            .await?
            .filter(|session| session.subscriber_id == subscriber_id)
            .ok_or(SubscriptionError::CheckoutNotFound)?;

        let mut plan_expires_at = None;

        if session.payment_status == CheckoutPaymentStatus::Paid {
            let subscriber = if self
                .checkout_gateway
                .mark_fulfilled(session_id.clone())
                .await?
            {
                let now = self.clock.now();
                let updated = match self
                    .subscriber_repository
                    .update_plan(
                        subscriber_id,
                        session.plan_id.clone(),
                        Some(paid_period_end(now)),
                        now,
                    )
                    .await
                {
                    Ok(updated) => updated,
                    Err(err) => {
                        error!(
                            %subscriber_id,
                            %session_id,
                            db_error = ?err,
                            "subscriptions: failed to apply purchased plan"
                        );
                        // Next poll retries the upgrade.
                        if let Err(release_err) = self
                            .checkout_gateway
                            .release_fulfillment(session_id.clone())
                            .await
                        {
                            error!(
                                %session_id,
                                error = ?release_err,
                                "subscriptions: failed to release checkout claim"
                            );
                        }
                        return Err(SubscriptionError::Internal(err));
                    }
                };

                info!(
                    %subscriber_id,
                    plan_id = %updated.plan_id,
                    expires_at = ?updated.plan_expires_at,
                    "subscriptions: plan upgraded"
                );
                updated
            } else {
                self.subscription_evaluator
                    .load_subscriber(subscriber_id)
                    .await?
            };
            plan_expires_at = subscriber.plan_expires_at;
        }

        Ok(CheckoutStatusDto {
            session_id: session.session_id,
            payment_status: session.payment_status,
            plan_id: session.plan_id,
            plan_expires_at,
        })
    }

    /// Counts one AI generation against the monthly allowance.
    pub async fn record_ai_generation(
        &self,
        subscriber_id: Uuid,
        kind: String,
    ) -> UseCaseResult<UsageDto> {
        if !AI_GENERATION_KINDS.contains(&kind.as_str()) {
            return Err(SubscriptionError::InvalidRequest(format!(
                "unsupported generation kind: {}",
                kind
            )));
        }

        let now = self.clock.now();
        let subscriber = self
            .subscription_evaluator
            .load_subscriber(subscriber_id)
            .await?;

        let used = self
            .count(ResourceKind::AiGenerations, subscriber_id, now)
            .await?;
        let allowed = self
            .subscription_evaluator
            .can_consume(&subscriber, ResourceKind::AiGenerations, now, Some(used))
            .await?;
        if !allowed {
            warn!(%subscriber_id, used, "subscriptions: ai generation quota reached");
            return Err(SubscriptionError::QuotaExceeded(ResourceKind::AiGenerations));
        }

        self.usage_repository
            .record_ai_generation(InsertUsageLogEntity {
                subscriber_id,
                kind: kind.clone(),
                created_at: now,
            })
            .await
            .map_err(|err| {
                error!(%subscriber_id, db_error = ?err, "subscriptions: failed to record ai usage");
                SubscriptionError::Internal(err)
            })?;

        info!(%subscriber_id, %kind, "subscriptions: ai generation recorded");

        let limits = *resolve_effective_plan(&subscriber, now).limits();
        Ok(UsageDto {
            ai_generations_this_month: used + 1,
            ai_generations_limit: limits.ai_generations_per_month,
            ..UsageDto::default()
        })
    }

    async fn count(
        &self,
        kind: ResourceKind,
        subscriber_id: Uuid,
        now: DateTime<Utc>,
    ) -> UseCaseResult<i64> {
        self.usage_counter
            .count(kind, subscriber_id, now)
            .await
            .map_err(|err| {
                error!(
                    %subscriber_id,
                    resource = %kind,
                    db_error = ?err,
                    "subscriptions: failed to count usage"
                );
                SubscriptionError::Internal(err)
            })
    }
}

fn paid_period_end(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(PAID_PERIOD_DAYS)
}

fn status_dto(
    stored_plan_id: &str,
    effective: &EffectivePlan,
    now: DateTime<Utc>,
) -> SubscriptionStatusDto {
    SubscriptionStatusDto {
        is_active: !effective.is_expired,
        is_expired: effective.is_expired,
        plan_id: stored_plan_id.to_string(),
        effective_plan_id: effective.plan.id.to_string(),
        expires_at: effective.expires_at,
        days_remaining: effective.days_remaining(now),
    }
}
