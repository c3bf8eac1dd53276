pub mod axum_http;
pub mod background_worker;
pub mod observability;
pub mod payments;
pub mod postgres;
