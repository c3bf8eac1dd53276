use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::domain::value_objects::plans::PlanLimits;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Posts,
    Templates,
    LandingPages,
    AiGenerations,
    SocialAccounts,
    LeadCapture,
    TeamMembers,
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            ResourceKind::Posts => "posts",
            ResourceKind::Templates => "templates",
            ResourceKind::LandingPages => "landing_pages",
            ResourceKind::AiGenerations => "ai_generations",
            ResourceKind::SocialAccounts => "social_accounts",
            ResourceKind::LeadCapture => "lead_capture",
            ResourceKind::TeamMembers => "team_members",
        };
        write!(f, "{}", kind)
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "posts" => Ok(ResourceKind::Posts),
            "templates" => Ok(ResourceKind::Templates),
            "landing_pages" => Ok(ResourceKind::LandingPages),
            "ai_generations" => Ok(ResourceKind::AiGenerations),
            "social_accounts" => Ok(ResourceKind::SocialAccounts),
            "lead_capture" => Ok(ResourceKind::LeadCapture),
            "team_members" => Ok(ResourceKind::TeamMembers),
            other => Err(format!("Unsupported resource kind: {}", other)),
        }
    }
}

impl ResourceKind {
    /// Kinds whose usage resets at the start of every calendar month.
    pub fn is_month_scoped(&self) -> bool {
        matches!(self, ResourceKind::Posts | ResourceKind::AiGenerations)
    }

    /// Numeric cap for this kind. `None` for flag-only kinds.
    pub fn limit_in(&self, limits: &PlanLimits) -> Option<i64> {
        match self {
            ResourceKind::Posts => Some(limits.posts_per_month),
            ResourceKind::Templates => Some(limits.templates),
            ResourceKind::LandingPages => Some(limits.landing_pages),
            ResourceKind::AiGenerations => Some(limits.ai_generations_per_month),
            ResourceKind::SocialAccounts => Some(limits.social_accounts),
            ResourceKind::TeamMembers => Some(limits.team_members),
            ResourceKind::LeadCapture => None,
        }
    }
}
