pub mod posts;
pub mod scheduler;
pub mod subscription_evaluator;
pub mod subscriptions;
pub mod usage_counter;
