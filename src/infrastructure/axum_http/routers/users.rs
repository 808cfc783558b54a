use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    application::usecases::users::UserUseCase,
    auth::AdminUser,
    domain::{
        repositories::users::UserRepository,
        value_objects::{
            enums::user_statuses::UserStatus,
            users::{
                CreateUserModel, EditUserModel, ListUsersFilter, RegisterDeviceTokenModel,
            },
        },
    },
    infrastructure::{
        axum_http::error_responses::error_response,
        postgres::{postgres_connection::PgPoolSquad, repositories::users::UserPostgres},
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let user_usecase = UserUseCase::new(Arc::new(user_repository));

    Router::new()
        .route("/", post(create).get(list))
        .route("/device-tokens/:token", delete(remove_device_token))
        .route("/:user_id", get(get_by_id).patch(update).delete(delete_by_id))
        .route("/:user_id/status", patch(set_status))
        .route("/:user_id/device-tokens", post(register_device_token))
        .with_state(Arc::new(user_usecase))
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: UserStatus,
}

pub async fn create<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    _admin: AdminUser,
    Json(model): Json<CreateUserModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync,
{
    match user_usecase.create(model).await {
        Ok(user_id) => (StatusCode::CREATED, Json(json!({ "id": user_id }))).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn get_by_id<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    _admin: AdminUser,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync,
{
    match user_usecase.get(user_id).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    _admin: AdminUser,
    Query(filter): Query<ListUsersFilter>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync,
{
    match user_usecase.list(&filter).await {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn update<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    _admin: AdminUser,
    Path(user_id): Path<Uuid>,
    Json(model): Json<EditUserModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync,
{
    match user_usecase.update(user_id, model).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn set_status<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    _admin: AdminUser,
    Path(user_id): Path<Uuid>,
    Json(request): Json<SetStatusRequest>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync,
{
    match user_usecase.set_status(user_id, request.status).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn delete_by_id<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    admin: AdminUser,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync,
{
    match user_usecase.delete(user_id, admin.admin_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn register_device_token<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    _admin: AdminUser,
    Path(user_id): Path<Uuid>,
    Json(model): Json<RegisterDeviceTokenModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync,
{
    match user_usecase.register_device_token(user_id, model).await {
        Ok(token_id) => (StatusCode::CREATED, Json(json!({ "id": token_id }))).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn remove_device_token<U>(
    State(user_usecase): State<Arc<UserUseCase<U>>>,
    _admin: AdminUser,
    Path(token): Path<String>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync,
{
    match user_usecase.remove_device_token(&token).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
