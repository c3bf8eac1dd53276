use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::info;

use crate::{
    application::{
        interfaces::clock::{Clock, SystemClock},
        usecases::scheduler::SchedulerUseCase,
    },
    domain::repositories::{
        posts::PostRepository, social_accounts::SocialAccountRepository,
        subscribers::SubscriberRepository, usage::UsageRepository,
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::ErrorResponse, routers::posts},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                posts::PostPostgres, social_accounts::SocialAccountPostgres,
                subscribers::SubscriberPostgres, usage::UsagePostgres,
            },
        },
    },
};

pub type PostgresSchedulerUseCase = SchedulerUseCase<
    PostPostgres,
    SocialAccountPostgres,
    SubscriberPostgres,
    UsagePostgres,
    SystemClock,
>;

pub fn scheduler_usecase(
    db_pool: Arc<PgPoolSquad>,
    batch_size: i64,
) -> Arc<PostgresSchedulerUseCase> {
    Arc::new(SchedulerUseCase::new(
        Arc::new(PostPostgres::new(Arc::clone(&db_pool))),
        posts::post_usecase(db_pool),
        Arc::new(SystemClock),
        batch_size,
    ))
}

pub fn routes(db_pool: Arc<PgPoolSquad>, batch_size: i64) -> Router {
    router(scheduler_usecase(db_pool, batch_size))
}

pub fn router<P, A, S, U, C>(usecase: Arc<SchedulerUseCase<P, A, S, U, C>>) -> Router
where
    P: PostRepository + Send + Sync + 'static,
    A: SocialAccountRepository + Send + Sync + 'static,
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/queue", get(scheduler_queue::<P, A, S, U, C>))
        .route("/process", post(scheduler_process::<P, A, S, U, C>))
        .with_state(usecase)
}

pub async fn scheduler_queue<P, A, S, U, C>(
    State(usecase): State<Arc<SchedulerUseCase<P, A, S, U, C>>>,
    AuthUser { user_id }: AuthUser,
) -> impl IntoResponse
where
    P: PostRepository + Send + Sync + 'static,
    A: SocialAccountRepository + Send + Sync + 'static,
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    match usecase.scheduler_queue(user_id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => ErrorResponse::from(err).into_response(),
    }
}

pub async fn scheduler_process<P, A, S, U, C>(
    State(usecase): State<Arc<SchedulerUseCase<P, A, S, U, C>>>,
    AuthUser { user_id }: AuthUser,
) -> impl IntoResponse
where
    P: PostRepository + Send + Sync + 'static,
    A: SocialAccountRepository + Send + Sync + 'static,
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    info!(%user_id, "scheduler: process request received");

    match usecase.scheduler_process(user_id).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => ErrorResponse::from(err).into_response(),
    }
}
