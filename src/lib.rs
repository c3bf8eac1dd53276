pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use tracing::{error, info};

use crate::infrastructure::{
    axum_http::{http_serve, routers::scheduler},
    background_worker::scheduler_loop,
    observability,
    postgres::postgres_connection,
};

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    observability::init_observability("socialflow-backend")?;

    let dotenvy_env = config::config_loader::load()?;
    info!(
        payment_mode = %dotenvy_env.payments.mode,
        "ENV has been loaded"
    );

    let postgres_pool = Arc::new(postgres_connection::establish_connection(
        &dotenvy_env.database.url,
    )?);
    info!("Postgres connection has been established");

    if dotenvy_env.scheduler.interval_seconds > 0 {
        let usecase = scheduler::scheduler_usecase(
            Arc::clone(&postgres_pool),
            dotenvy_env.scheduler.batch_size,
        );
        let interval = Duration::from_secs(dotenvy_env.scheduler.interval_seconds);

        tokio::spawn(async move {
            if let Err(e) = scheduler_loop::run_scheduler_loop(usecase, interval).await {
                error!("Scheduler loop exited with error: {}", e);
            }
        });
    } else {
        info!("Scheduler loop disabled");
    }

    http_serve::start(Arc::new(dotenvy_env), postgres_pool).await?;

    Ok(())
}
