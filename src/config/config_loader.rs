use anyhow::{Context, Result, anyhow};

use crate::{
    config::{
        config_model::{Database, DotEnvyConfig, Payments, Scheduler, Server, UserSecret},
        stage::Stage,
    },
    domain::value_objects::enums::payment_modes::PaymentMode,
};

const DEFAULT_CHECKOUT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_SCHEDULER_BATCH_SIZE: i64 = 100;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: required("SERVER_PORT")?.parse()?,
        body_limit: required("SERVER_BODY_LIMIT")?.parse()?,
        timeout: required("SERVER_TIMEOUT")?.parse()?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
    };

    let payments = Payments {
        mode: match std::env::var("PAYMENT_MODE") {
            Ok(raw) => PaymentMode::from_str(&raw)
                .ok_or_else(|| anyhow!("PAYMENT_MODE is invalid: {}", raw))?,
            Err(_) => PaymentMode::default(),
        },
        checkout_base_url: std::env::var("CHECKOUT_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_CHECKOUT_BASE_URL.to_string()),
    };

    let scheduler = Scheduler {
        interval_seconds: optional("SCHEDULER_INTERVAL_SECONDS")
            .map(|raw| raw.parse::<u64>())
            .transpose()?
            .unwrap_or(0),
        batch_size: optional("SCHEDULER_BATCH_SIZE")
            .map(|raw| raw.parse::<i64>())
            .transpose()?
            .unwrap_or(DEFAULT_SCHEDULER_BATCH_SIZE),
    };

    Ok(DotEnvyConfig {
        server,
        database,
        payments,
        scheduler,
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(&stage_str).unwrap_or_default()
}

pub fn get_user_secret() -> Result<UserSecret> {
    dotenvy::dotenv().ok();

    Ok(UserSecret {
        secret: required("JWT_USER_SECRET")?,
    })
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{} is invalid", key))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
