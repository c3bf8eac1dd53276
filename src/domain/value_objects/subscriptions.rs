use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{
    enums::{payment_modes::PaymentMode, resource_kinds::ResourceKind},
    plans::{AnalyticsTier, Plan, PlanLimits},
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanDto {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub trial_days: Option<i64>,
    pub limits: PlanLimits,
}

impl From<Plan> for PlanDto {
    fn from(value: Plan) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name.to_string(),
            price: value.price,
            trial_days: value.trial_days,
            limits: value.limits,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubscriptionStatusDto {
    pub is_active: bool,
    pub is_expired: bool,
    /// Plan stored on the subscriber, which stays put after expiry.
    pub plan_id: String,
    pub effective_plan_id: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub days_remaining: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UsageDto {
    pub posts_this_month: i64,
    pub posts_limit: i64,
    pub templates_count: i64,
    pub templates_limit: i64,
    pub landing_pages_count: i64,
    pub landing_pages_limit: i64,
    pub ai_generations_this_month: i64,
    pub ai_generations_limit: i64,
    pub social_accounts_count: i64,
    pub social_accounts_limit: i64,
    pub team_members_count: i64,
    pub team_members_limit: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubscriptionOverviewDto {
    pub plan: PlanDto,
    pub subscription_status: SubscriptionStatusDto,
    pub usage: UsageDto,
    pub ai_content: bool,
    pub lead_capture: bool,
    pub analytics: AnalyticsTier,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QuotaCheckDto {
    pub subscriber_id: Uuid,
    pub resource: ResourceKind,
    pub allowed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCheckoutRequest {
    pub plan_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckoutSessionDto {
    pub session_id: String,
    pub url: String,
    pub mode: PaymentMode,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPaymentStatus {
    Pending,
    Paid,
}

/// What the checkout collaborator knows about a session.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSession {
    pub session_id: String,
    pub subscriber_id: Uuid,
    pub plan_id: String,
    pub url: String,
    pub payment_status: CheckoutPaymentStatus,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckoutStatusDto {
    pub session_id: String,
    pub payment_status: CheckoutPaymentStatus,
    pub plan_id: String,
    pub plan_expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordAiGenerationRequest {
    pub kind: String,
}
