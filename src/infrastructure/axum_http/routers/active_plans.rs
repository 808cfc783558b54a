use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    application::usecases::active_plans::ActivePlanUseCase,
    auth::AdminUser,
    domain::{
        repositories::active_plans::ActivePlanRepository,
        value_objects::{
            enums::active_plan_statuses::ActivePlanStatus, plans::AssignedProduct,
        },
    },
    infrastructure::{
        axum_http::error_responses::error_response,
        postgres::{
            postgres_connection::PgPoolSquad, repositories::active_plans::ActivePlanPostgres,
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let plan_repository = ActivePlanPostgres::new(Arc::clone(&db_pool));
    let plan_usecase = ActivePlanUseCase::new(Arc::new(plan_repository));

    Router::new()
        .route("/", get(list_by_status))
        .route("/sweep-expired", post(sweep_expired))
        .route("/seller/:seller_id", get(list_by_seller))
        .route("/:plan_id", get(get_by_id))
        .route("/:plan_id/activate", post(activate))
        .route("/:plan_id/schedule", post(schedule))
        .route("/:plan_id/assign-product", post(assign_product))
        .route("/:plan_id/increment-day", post(increment_day))
        .route("/:plan_id/cancel", post(cancel))
        .with_state(Arc::new(plan_usecase))
}

#[derive(Debug, Deserialize)]
pub struct ListPlansQuery {
    pub status: ActivePlanStatus,
}

#[derive(Debug, Deserialize)]
pub struct SchedulePlanRequest {
    pub start_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AssignProductRequest {
    pub product: AssignedProduct,
    #[serde(default)]
    pub activate_immediately: bool,
}

#[derive(Debug, Serialize)]
pub struct SweepExpiredResponse {
    pub expired_count: usize,
    pub expired_ids: Vec<Uuid>,
}

pub async fn get_by_id<T>(
    State(plan_usecase): State<Arc<ActivePlanUseCase<T>>>,
    _admin: AdminUser,
    Path(plan_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: ActivePlanRepository + Send + Sync,
{
    match plan_usecase.get(plan_id).await {
        Ok(plan) => (StatusCode::OK, Json(plan)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_by_status<T>(
    State(plan_usecase): State<Arc<ActivePlanUseCase<T>>>,
    _admin: AdminUser,
    Query(query): Query<ListPlansQuery>,
) -> impl IntoResponse
where
    T: ActivePlanRepository + Send + Sync,
{
    match plan_usecase.list_by_status(query.status).await {
        Ok(plans) => (StatusCode::OK, Json(plans)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_by_seller<T>(
    State(plan_usecase): State<Arc<ActivePlanUseCase<T>>>,
    _admin: AdminUser,
    Path(seller_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: ActivePlanRepository + Send + Sync,
{
    match plan_usecase.list_by_seller(seller_id).await {
        Ok(plans) => (StatusCode::OK, Json(plans)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn activate<T>(
    State(plan_usecase): State<Arc<ActivePlanUseCase<T>>>,
    _admin: AdminUser,
    Path(plan_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: ActivePlanRepository + Send + Sync,
{
    match plan_usecase.activate(plan_id).await {
        Ok(end_date) => (StatusCode::OK, Json(json!({ "end_date": end_date }))).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn schedule<T>(
    State(plan_usecase): State<Arc<ActivePlanUseCase<T>>>,
    _admin: AdminUser,
    Path(plan_id): Path<Uuid>,
    Json(request): Json<SchedulePlanRequest>,
) -> impl IntoResponse
where
    T: ActivePlanRepository + Send + Sync,
{
    match plan_usecase.schedule(plan_id, request.start_date).await {
        Ok(end_date) => (StatusCode::OK, Json(json!({ "end_date": end_date }))).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn assign_product<T>(
    State(plan_usecase): State<Arc<ActivePlanUseCase<T>>>,
    _admin: AdminUser,
    Path(plan_id): Path<Uuid>,
    Json(request): Json<AssignProductRequest>,
) -> impl IntoResponse
where
    T: ActivePlanRepository + Send + Sync,
{
    match plan_usecase
        .assign_product(plan_id, request.product, request.activate_immediately)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn increment_day<T>(
    State(plan_usecase): State<Arc<ActivePlanUseCase<T>>>,
    _admin: AdminUser,
    Path(plan_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: ActivePlanRepository + Send + Sync,
{
    match plan_usecase.increment_days_used(plan_id).await {
        Ok(usage) => (StatusCode::OK, Json(usage)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn cancel<T>(
    State(plan_usecase): State<Arc<ActivePlanUseCase<T>>>,
    _admin: AdminUser,
    Path(plan_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: ActivePlanRepository + Send + Sync,
{
    match plan_usecase.cancel(plan_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn sweep_expired<T>(
    State(plan_usecase): State<Arc<ActivePlanUseCase<T>>>,
    _admin: AdminUser,
) -> impl IntoResponse
where
    T: ActivePlanRepository + Send + Sync,
{
    match plan_usecase.check_and_expire_plans().await {
        Ok(expired_ids) => (
            StatusCode::OK,
            Json(SweepExpiredResponse {
                expired_count: expired_ids.len(),
                expired_ids,
            }),
        )
            .into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
