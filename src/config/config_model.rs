use crate::domain::value_objects::enums::payment_modes::PaymentMode;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub payments: Payments,
    pub scheduler: Scheduler,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Payments {
    pub mode: PaymentMode,
    pub checkout_base_url: String,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Zero disables the background loop.
    pub interval_seconds: u64,
    pub batch_size: i64,
}

#[derive(Debug, Clone)]
pub struct UserSecret {
    pub secret: String,
}
