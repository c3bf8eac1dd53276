use anyhow::Result;
use std::{sync::Arc, time::Duration};
use tracing::{error, info};

use crate::{
    application::{interfaces::clock::Clock, usecases::scheduler::SchedulerUseCase},
    domain::repositories::{
        posts::PostRepository, social_accounts::SocialAccountRepository,
        subscribers::SubscriberRepository, usage::UsageRepository,
    },
};

/// Periodically publishes due posts for every owner. Runs until the process exits.
pub async fn run_scheduler_loop<P, A, S, U, C>(
    usecase: Arc<SchedulerUseCase<P, A, S, U, C>>,
    interval: Duration,
) -> Result<()>
where
    P: PostRepository + Send + Sync + 'static,
    A: SocialAccountRepository + Send + Sync + 'static,
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    info!(interval_seconds = interval.as_secs(), "scheduler loop: started");

    loop {
        match usecase.process_all_due().await {
            Ok(summary) if summary.published_count > 0 || summary.failed_count > 0 => {
                info!(
                    published_count = summary.published_count,
                    failed_count = summary.failed_count,
                    "scheduler loop: tick processed"
                );
            }
            Ok(_) => {}
            Err(e) => error!("scheduler loop: tick failed: {}", e),
        }

        tokio::time::sleep(interval).await;
    }
}
