use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    application::usecases::subcategories::SubcategoryUseCase,
    auth::AdminUser,
    domain::{
        repositories::{
            categories::CategoryRepository, subcategories::SubcategoryRepository,
        },
        value_objects::subcategories::{CreateSubcategoryModel, EditSubcategoryModel},
    },
    infrastructure::{
        axum_http::{error_responses::error_response, routers::categories::SearchQuery},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                categories::CategoryPostgres, subcategories::SubcategoryPostgres,
            },
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let subcategory_repository = SubcategoryPostgres::new(Arc::clone(&db_pool));
    let category_repository = CategoryPostgres::new(Arc::clone(&db_pool));
    let subcategory_usecase = SubcategoryUseCase::new(
        Arc::new(subcategory_repository),
        Arc::new(category_repository),
    );

    Router::new()
        .route("/", post(create))
        .route("/search", get(search))
        .route("/category/:category_id", get(list_by_category))
        .route(
            "/:subcategory_id",
            get(get_by_id).patch(update).delete(delete_by_id),
        )
        .with_state(Arc::new(subcategory_usecase))
}

pub async fn create<S, C>(
    State(subcategory_usecase): State<Arc<SubcategoryUseCase<S, C>>>,
    _admin: AdminUser,
    Json(model): Json<CreateSubcategoryModel>,
) -> impl IntoResponse
where
    S: SubcategoryRepository + Send + Sync,
    C: CategoryRepository + Send + Sync,
{
    match subcategory_usecase.create(model).await {
        Ok(subcategory_id) => {
            (StatusCode::CREATED, Json(json!({ "id": subcategory_id }))).into_response()
        }
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn get_by_id<S, C>(
    State(subcategory_usecase): State<Arc<SubcategoryUseCase<S, C>>>,
    _admin: AdminUser,
    Path(subcategory_id): Path<Uuid>,
) -> impl IntoResponse
where
    S: SubcategoryRepository + Send + Sync,
    C: CategoryRepository + Send + Sync,
{
    match subcategory_usecase.get(subcategory_id).await {
        Ok(subcategory) => (StatusCode::OK, Json(subcategory)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_by_category<S, C>(
    State(subcategory_usecase): State<Arc<SubcategoryUseCase<S, C>>>,
    _admin: AdminUser,
    Path(category_id): Path<Uuid>,
) -> impl IntoResponse
where
    S: SubcategoryRepository + Send + Sync,
    C: CategoryRepository + Send + Sync,
{
    match subcategory_usecase.list_by_category(category_id).await {
        Ok(subcategories) => (StatusCode::OK, Json(subcategories)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn update<S, C>(
    State(subcategory_usecase): State<Arc<SubcategoryUseCase<S, C>>>,
    _admin: AdminUser,
    Path(subcategory_id): Path<Uuid>,
    Json(model): Json<EditSubcategoryModel>,
) -> impl IntoResponse
where
    S: SubcategoryRepository + Send + Sync,
    C: CategoryRepository + Send + Sync,
{
    match subcategory_usecase.update(subcategory_id, model).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn delete_by_id<S, C>(
    State(subcategory_usecase): State<Arc<SubcategoryUseCase<S, C>>>,
    admin: AdminUser,
    Path(subcategory_id): Path<Uuid>,
) -> impl IntoResponse
where
    S: SubcategoryRepository + Send + Sync,
    C: CategoryRepository + Send + Sync,
{
    match subcategory_usecase
        .delete(subcategory_id, admin.admin_id)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn search<S, C>(
    State(subcategory_usecase): State<Arc<SubcategoryUseCase<S, C>>>,
    _admin: AdminUser,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse
where
    S: SubcategoryRepository + Send + Sync,
    C: CategoryRepository + Send + Sync,
{
    match subcategory_usecase.search(&query.q).await {
        Ok(subcategories) => (StatusCode::OK, Json(subcategories)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
