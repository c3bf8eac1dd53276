pub mod payment_modes;
pub mod post_statuses;
pub mod resource_kinds;
