pub mod enums;
pub mod plans;
pub mod posts;
pub mod schedules;
pub mod subscriptions;
