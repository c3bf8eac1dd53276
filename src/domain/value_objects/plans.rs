use std::fmt::Display;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Sentinel used by every numeric limit to mean "no cap".
pub const UNLIMITED: i64 = -1;

/// Length of a paid billing period granted by a completed checkout.
pub const PAID_PERIOD_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlanId {
    Free,
    Starter,
    Professional,
    Enterprise,
    Expired,
}

impl Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plan = match self {
            PlanId::Free => "free",
            PlanId::Starter => "starter",
            PlanId::Professional => "professional",
            PlanId::Enterprise => "enterprise",
            PlanId::Expired => "expired",
        };
        write!(f, "{}", plan)
    }
}

impl PlanId {
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "free" => Some(PlanId::Free),
            "starter" => Some(PlanId::Starter),
            "professional" => Some(PlanId::Professional),
            "enterprise" => Some(PlanId::Enterprise),
            "expired" => Some(PlanId::Expired),
            _ => None,
        }
    }

    /// Tiers that can be bought through checkout.
    pub fn is_purchasable(&self) -> bool {
        matches!(
            self,
            PlanId::Starter | PlanId::Professional | PlanId::Enterprise
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsTier {
    Basic,
    Standard,
    Advanced,
    Full,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PlanLimits {
    pub social_accounts: i64,
    pub posts_per_month: i64,
    pub templates: i64,
    pub landing_pages: i64,
    pub ai_generations_per_month: i64,
    pub ai_content: bool,
    pub lead_capture: bool,
    pub analytics: AnalyticsTier,
    pub team_members: i64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Plan {
    pub id: PlanId,
    pub name: &'static str,
    pub price: f64,
    pub trial_days: Option<i64>,
    pub limits: PlanLimits,
}

pub const FREE_PLAN: Plan = Plan {
    id: PlanId::Free,
    name: "Free Trial",
    price: 0.0,
    trial_days: Some(14),
    limits: PlanLimits {
        social_accounts: 2,
        posts_per_month: 30,
        templates: 5,
        landing_pages: 2,
        ai_generations_per_month: 10,
        ai_content: true,
        lead_capture: true,
        analytics: AnalyticsTier::Basic,
        team_members: 1,
    },
};

pub const STARTER_PLAN: Plan = Plan {
    id: PlanId::Starter,
    name: "Starter",
    price: 19.0,
    trial_days: None,
    limits: PlanLimits {
        social_accounts: 5,
        posts_per_month: 100,
        templates: 20,
        landing_pages: 5,
        ai_generations_per_month: 50,
        ai_content: true,
        lead_capture: true,
        analytics: AnalyticsTier::Standard,
        team_members: 2,
    },
};

pub const PROFESSIONAL_PLAN: Plan = Plan {
    id: PlanId::Professional,
    name: "Professional",
    price: 49.0,
    trial_days: None,
    limits: PlanLimits {
        social_accounts: 15,
        posts_per_month: 500,
        templates: 100,
        landing_pages: 25,
        ai_generations_per_month: 300,
        ai_content: true,
        lead_capture: true,
        analytics: AnalyticsTier::Advanced,
        team_members: 5,
    },
};

pub const ENTERPRISE_PLAN: Plan = Plan {
    id: PlanId::Enterprise,
    name: "Enterprise",
    price: 149.0,
    trial_days: None,
    limits: PlanLimits {
        social_accounts: UNLIMITED,
        posts_per_month: UNLIMITED,
        templates: UNLIMITED,
        landing_pages: UNLIMITED,
        ai_generations_per_month: UNLIMITED,
        ai_content: true,
        lead_capture: true,
        analytics: AnalyticsTier::Full,
        team_members: UNLIMITED,
    },
};

/// Grace tier applied once a trial or paid period has lapsed. Stricter than `free`
/// and never part of the catalog.
pub const EXPIRED_PLAN: Plan = Plan {
    id: PlanId::Expired,
    name: "Expired",
    price: 0.0,
    trial_days: None,
    limits: PlanLimits {
        social_accounts: 1,
        posts_per_month: 10,
        templates: 3,
        landing_pages: 1,
        ai_generations_per_month: 0,
        ai_content: false,
        lead_capture: false,
        analytics: AnalyticsTier::Basic,
        team_members: 1,
    },
};

static CATALOG: [Plan; 4] = [FREE_PLAN, STARTER_PLAN, PROFESSIONAL_PLAN, ENTERPRISE_PLAN];

/// Static tier table, fixed at compile time.
pub struct PlanCatalog;

impl PlanCatalog {
    /// Unrecognized ids fall back to `free`.
    pub fn lookup(plan_id: &str) -> Plan {
        CATALOG
            .iter()
            .find(|plan| plan.id.to_string() == plan_id)
            .copied()
            .unwrap_or(FREE_PLAN)
    }

    pub fn all() -> &'static [Plan] {
        &CATALOG
    }
}

/// Plan in force for a subscriber at a point in time. Derived on every evaluation and
/// never written back to the subscriber row.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct EffectivePlan {
    pub plan: Plan,
    pub is_expired: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl EffectivePlan {
    pub fn limits(&self) -> &PlanLimits {
        &self.plan.limits
    }

    pub fn days_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expires_at
            .map(|expires_at| (expires_at - now).num_days().max(0))
    }
}

pub fn trial_expiry(now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    FREE_PLAN
        .trial_days
        .and_then(|days| now.checked_add_signed(Duration::days(days)))
}
