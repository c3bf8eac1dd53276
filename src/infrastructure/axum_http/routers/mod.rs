pub mod posts;
pub mod scheduler;
pub mod subscriptions;
