use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    application::usecases::categories::CategoryUseCase,
    auth::AdminUser,
    domain::{
        repositories::categories::CategoryRepository,
        value_objects::categories::{CreateCategoryModel, EditCategoryModel},
    },
    infrastructure::{
        axum_http::error_responses::error_response,
        postgres::{
            postgres_connection::PgPoolSquad, repositories::categories::CategoryPostgres,
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let category_repository = CategoryPostgres::new(Arc::clone(&db_pool));
    let category_usecase = CategoryUseCase::new(Arc::new(category_repository));

    Router::new()
        .route("/", post(create).get(list))
        .route("/search", get(search))
        .route(
            "/:category_id",
            get(get_by_id).patch(update).delete(delete_by_id),
        )
        .with_state(Arc::new(category_usecase))
}

#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

pub async fn create<T>(
    State(category_usecase): State<Arc<CategoryUseCase<T>>>,
    _admin: AdminUser,
    Json(model): Json<CreateCategoryModel>,
) -> impl IntoResponse
where
    T: CategoryRepository + Send + Sync,
{
    match category_usecase.create(model).await {
        Ok(category_id) => {
            (StatusCode::CREATED, Json(json!({ "id": category_id }))).into_response()
        }
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn get_by_id<T>(
    State(category_usecase): State<Arc<CategoryUseCase<T>>>,
    _admin: AdminUser,
    Path(category_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: CategoryRepository + Send + Sync,
{
    match category_usecase.get(category_id).await {
        Ok(category) => (StatusCode::OK, Json(category)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list<T>(
    State(category_usecase): State<Arc<CategoryUseCase<T>>>,
    _admin: AdminUser,
    Query(query): Query<ListCategoriesQuery>,
) -> impl IntoResponse
where
    T: CategoryRepository + Send + Sync,
{
    match category_usecase.list(query.include_inactive).await {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn update<T>(
    State(category_usecase): State<Arc<CategoryUseCase<T>>>,
    _admin: AdminUser,
    Path(category_id): Path<Uuid>,
    Json(model): Json<EditCategoryModel>,
) -> impl IntoResponse
where
    T: CategoryRepository + Send + Sync,
{
    match category_usecase.update(category_id, model).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn delete_by_id<T>(
    State(category_usecase): State<Arc<CategoryUseCase<T>>>,
    admin: AdminUser,
    Path(category_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: CategoryRepository + Send + Sync,
{
    match category_usecase.delete(category_id, admin.admin_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn search<T>(
    State(category_usecase): State<Arc<CategoryUseCase<T>>>,
    _admin: AdminUser,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse
where
    T: CategoryRepository + Send + Sync,
{
    match category_usecase.search(&query.q).await {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
