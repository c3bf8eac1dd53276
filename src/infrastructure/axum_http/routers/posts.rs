use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::info;
use uuid::Uuid;

use crate::{
    application::{
        interfaces::clock::{Clock, SystemClock},
        usecases::{
            posts::PostUseCase, scheduler::SchedulerUseCase,
            subscription_evaluator::SubscriptionEvaluator, usage_counter::UsageCounter,
        },
    },
    domain::{
        repositories::{
            posts::PostRepository, social_accounts::SocialAccountRepository,
            subscribers::SubscriberRepository, usage::UsageRepository,
        },
        value_objects::posts::PostInput,
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::ErrorResponse, routers::scheduler},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                posts::PostPostgres, social_accounts::SocialAccountPostgres,
                subscribers::SubscriberPostgres, usage::UsagePostgres,
            },
        },
    },
};

pub type PostgresPostUseCase =
    PostUseCase<PostPostgres, SocialAccountPostgres, SubscriberPostgres, UsagePostgres, SystemClock>;

pub fn post_usecase(db_pool: Arc<PgPoolSquad>) -> Arc<PostgresPostUseCase> {
    let clock = Arc::new(SystemClock);
    let usage_counter = UsageCounter::new(Arc::new(UsagePostgres::new(Arc::clone(&db_pool))));
    let subscription_evaluator = SubscriptionEvaluator::new(
        Arc::new(SubscriberPostgres::new(Arc::clone(&db_pool))),
        Arc::new(usage_counter),
        Arc::clone(&clock),
    );

    Arc::new(PostUseCase::new(
        Arc::new(PostPostgres::new(Arc::clone(&db_pool))),
        Arc::new(SocialAccountPostgres::new(Arc::clone(&db_pool))),
        Arc::new(subscription_evaluator),
        clock,
    ))
}

pub fn routes(db_pool: Arc<PgPoolSquad>, batch_size: i64) -> Router {
    let post_usecase = post_usecase(Arc::clone(&db_pool));
    let scheduler_usecase = scheduler::scheduler_usecase(db_pool, batch_size);

    router(post_usecase, scheduler_usecase)
}

pub fn router<P, A, S, U, C>(
    post_usecase: Arc<PostUseCase<P, A, S, U, C>>,
    scheduler_usecase: Arc<SchedulerUseCase<P, A, S, U, C>>,
) -> Router
where
    P: PostRepository + Send + Sync + 'static,
    A: SocialAccountRepository + Send + Sync + 'static,
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let pending = Router::new()
        .route("/scheduled/pending", get(pending_due_posts::<P, A, S, U, C>))
        .with_state(scheduler_usecase);

    Router::new()
        .route(
            "/",
            post(create_post::<P, A, S, U, C>).get(list_posts::<P, A, S, U, C>),
        )
        .route(
            "/:post_id",
            get(get_post::<P, A, S, U, C>)
                .put(update_post::<P, A, S, U, C>)
                .delete(delete_post::<P, A, S, U, C>),
        )
        .route("/:post_id/publish", post(publish_post::<P, A, S, U, C>))
        .with_state(post_usecase)
        .merge(pending)
}

pub async fn create_post<P, A, S, U, C>(
    State(usecase): State<Arc<PostUseCase<P, A, S, U, C>>>,
    AuthUser { user_id }: AuthUser,
    Json(input): Json<PostInput>,
) -> impl IntoResponse
where
    P: PostRepository + Send + Sync + 'static,
    A: SocialAccountRepository + Send + Sync + 'static,
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    info!(%user_id, "posts: create request received");

    match usecase.create_post(user_id, input).await {
        Ok(post) => (StatusCode::CREATED, Json(post)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_posts<P, A, S, U, C>(
    State(usecase): State<Arc<PostUseCase<P, A, S, U, C>>>,
    AuthUser { user_id }: AuthUser,
) -> impl IntoResponse
where
    P: PostRepository + Send + Sync + 'static,
    A: SocialAccountRepository + Send + Sync + 'static,
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    match usecase.list_posts(user_id).await {
        Ok(posts) => (StatusCode::OK, Json(posts)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_post<P, A, S, U, C>(
    State(usecase): State<Arc<PostUseCase<P, A, S, U, C>>>,
    AuthUser { user_id }: AuthUser,
    Path(post_id): Path<Uuid>,
) -> impl IntoResponse
where
    P: PostRepository + Send + Sync + 'static,
    A: SocialAccountRepository + Send + Sync + 'static,
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    match usecase.get_post(user_id, post_id).await {
        Ok(post) => (StatusCode::OK, Json(post)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_post<P, A, S, U, C>(
    State(usecase): State<Arc<PostUseCase<P, A, S, U, C>>>,
    AuthUser { user_id }: AuthUser,
    Path(post_id): Path<Uuid>,
    Json(input): Json<PostInput>,
) -> impl IntoResponse
where
    P: PostRepository + Send + Sync + 'static,
    A: SocialAccountRepository + Send + Sync + 'static,
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    info!(%user_id, %post_id, "posts: update request received");

    match usecase.update_post(user_id, post_id, input).await {
        Ok(post) => (StatusCode::OK, Json(post)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete_post<P, A, S, U, C>(
    State(usecase): State<Arc<PostUseCase<P, A, S, U, C>>>,
    AuthUser { user_id }: AuthUser,
    Path(post_id): Path<Uuid>,
) -> impl IntoResponse
where
    P: PostRepository + Send + Sync + 'static,
    A: SocialAccountRepository + Send + Sync + 'static,
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    info!(%user_id, %post_id, "posts: delete request received");

    match usecase.delete_post(user_id, post_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Post deleted" })),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn publish_post<P, A, S, U, C>(
    State(usecase): State<Arc<PostUseCase<P, A, S, U, C>>>,
    AuthUser { user_id }: AuthUser,
    Path(post_id): Path<Uuid>,
) -> impl IntoResponse
where
    P: PostRepository + Send + Sync + 'static,
    A: SocialAccountRepository + Send + Sync + 'static,
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    info!(%user_id, %post_id, "posts: publish request received");

    match usecase.publish_post(user_id, post_id).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn pending_due_posts<P, A, S, U, C>(
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
    match usecase.pending_due_posts(user_id).await {
        Ok(posts) => (StatusCode::OK, Json(posts)).into_response(),
        Err(err) => ErrorResponse::from(err).into_response(),
    }
}
