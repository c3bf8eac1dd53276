use std::{str::FromStr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::info;

use crate::{
    application::{
        interfaces::{
            checkout::CheckoutGateway,
            clock::{Clock, SystemClock},
        },
        usecases::subscriptions::{SubscriptionError, SubscriptionUseCase},
    },
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{subscribers::SubscriberRepository, usage::UsageRepository},
        value_objects::{
            enums::resource_kinds::ResourceKind,
            subscriptions::{CreateCheckoutRequest, RecordAiGenerationRequest},
        },
    },
    infrastructure::{
        axum_http::auth::AuthUser,
        payments::simulated_checkout::SimulatedCheckoutGateway,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{subscribers::SubscriberPostgres, usage::UsagePostgres},
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let checkout_gateway = SimulatedCheckoutGateway::new(
        config.payments.mode,
        config.payments.checkout_base_url.clone(),
    );

    let usecase = SubscriptionUseCase::new(
        Arc::new(SubscriberPostgres::new(Arc::clone(&db_pool))),
        Arc::new(UsagePostgres::new(Arc::clone(&db_pool))),
        Arc::new(checkout_gateway),
        Arc::new(SystemClock),
    );

    router(Arc::new(usecase))
}

pub fn router<S, U, C, G>(usecase: Arc<SubscriptionUseCase<S, U, C, G>>) -> Router
where
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
    G: CheckoutGateway + Send + Sync + 'static,
{
    Router::new()
        .route("/plans", get(list_plans::<S, U, C, G>))
        .route("/register", post(register_subscriber::<S, U, C, G>))
        .route("/overview", get(subscription_overview::<S, U, C, G>))
        .route("/plan", get(resolve_plan::<S, U, C, G>))
        .route("/quota/:resource", get(check_quota::<S, U, C, G>))
        .route("/checkout", post(create_checkout::<S, U, C, G>))
        .route("/checkout/:session_id", get(checkout_status::<S, U, C, G>))
        .route(
            "/usage/ai-generations",
            post(record_ai_generation::<S, U, C, G>),
        )
        .with_state(usecase)
}

pub async fn list_plans<S, U, C, G>(
    State(usecase): State<Arc<SubscriptionUseCase<S, U, C, G>>>,
) -> impl IntoResponse
where
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
    G: CheckoutGateway + Send + Sync + 'static,
{
    (StatusCode::OK, Json(usecase.list_plans())).into_response()
}

pub async fn register_subscriber<S, U, C, G>(
    State(usecase): State<Arc<SubscriptionUseCase<S, U, C, G>>>,
    AuthUser { user_id }: AuthUser,
) -> impl IntoResponse
where
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
    G: CheckoutGateway + Send + Sync + 'static,
{
    info!(%user_id, "subscriptions: register request received");

    match usecase.register_subscriber(user_id).await {
        Ok(status) => (StatusCode::CREATED, Json(status)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn subscription_overview<S, U, C, G>(
    State(usecase): State<Arc<SubscriptionUseCase<S, U, C, G>>>,
    AuthUser { user_id }: AuthUser,
) -> impl IntoResponse
where
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
    G: CheckoutGateway + Send + Sync + 'static,
{
    match usecase.subscription_overview(user_id).await {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn resolve_plan<S, U, C, G>(
    State(usecase): State<Arc<SubscriptionUseCase<S, U, C, G>>>,
    AuthUser { user_id }: AuthUser,
) -> impl IntoResponse
where
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
    G: CheckoutGateway + Send + Sync + 'static,
{
    match usecase.resolve_plan(user_id).await {
        Ok(effective) => (StatusCode::OK, Json(effective)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn check_quota<S, U, C, G>(
    State(usecase): State<Arc<SubscriptionUseCase<S, U, C, G>>>,
    AuthUser { user_id }: AuthUser,
    Path(resource): Path<String>,
) -> impl IntoResponse
where
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
    G: CheckoutGateway + Send + Sync + 'static,
{
    let resource = match ResourceKind::from_str(&resource) {
        Ok(resource) => resource,
        Err(message) => return SubscriptionError::InvalidRequest(message).into_response(),
    };

    match usecase.check_quota(user_id, resource).await {
        Ok(quota) => (StatusCode::OK, Json(quota)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn create_checkout<S, U, C, G>(
    State(usecase): State<Arc<SubscriptionUseCase<S, U, C, G>>>,
    AuthUser { user_id }: AuthUser,
    Json(request): Json<CreateCheckoutRequest>,
) -> impl IntoResponse
where
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
    G: CheckoutGateway + Send + Sync + 'static,
{
    info!(%user_id, plan_id = %request.plan_id, "subscriptions: checkout request received");

    match usecase.create_checkout(user_id, request.plan_id).await {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn checkout_status<S, U, C, G>(
    State(usecase): State<Arc<SubscriptionUseCase<S, U, C, G>>>,
    AuthUser { user_id }: AuthUser,
    Path(session_id): Path<String>,
) -> impl IntoResponse
where
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
    G: CheckoutGateway + Send + Sync + 'static,
{
    match usecase.checkout_status(user_id, session_id).await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn record_ai_generation<S, U, C, G>(
    State(usecase): State<Arc<SubscriptionUseCase<S, U, C, G>>>,
    AuthUser { user_id }: AuthUser,
    Json(request): Json<RecordAiGenerationRequest>,
) -> impl IntoResponse
where
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
    G: CheckoutGateway + Send + Sync + 'static,
{
    match usecase.record_ai_generation(user_id, request.kind).await {
        Ok(usage) => (StatusCode::OK, Json(usage)).into_response(),
        Err(err) => err.into_response(),
    }
}
