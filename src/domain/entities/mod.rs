pub mod posts;
pub mod social_accounts;
pub mod subscribers;
pub mod usage_logs;
