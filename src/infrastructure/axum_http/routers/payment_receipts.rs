use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    application::usecases::plan_receipts::PlanReceiptUseCase,
    auth::AdminUser,
    domain::{
        repositories::payment_receipts::PaymentReceiptRepository,
        value_objects::{
            enums::receipt_statuses::ReceiptStatusFilter,
            pagination::PageTokenStore,
            receipts::{RejectReceiptModel, SubmitPaymentReceiptModel},
        },
    },
    infrastructure::{
        axum_http::error_responses::error_response,
        postgres::{
            postgres_connection::PgPoolSquad, repositories::payment_receipts::PaymentReceiptPostgres,
        },
    },
};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

pub struct PaymentReceiptRouteState<T>
where
    T: PaymentReceiptRepository + Send + Sync,
{
    usecase: Arc<PlanReceiptUseCase<T>>,
    page_tokens: Arc<Mutex<PageTokenStore>>,
}

impl<T> Clone for PaymentReceiptRouteState<T>
where
    T: PaymentReceiptRepository + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            usecase: Arc::clone(&self.usecase),
            page_tokens: Arc::clone(&self.page_tokens),
        }
    }
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let receipt_repository = PaymentReceiptPostgres::new(Arc::clone(&db_pool));
    let receipt_usecase = PlanReceiptUseCase::new(Arc::new(receipt_repository));

    Router::new()
        .route("/", post(submit).get(list))
        .route("/:receipt_id", get(get_by_id))
        .route("/:receipt_id/approve", post(approve))
        .route("/:receipt_id/reject", post(reject))
        .with_state(PaymentReceiptRouteState {
            usecase: Arc::new(receipt_usecase),
            page_tokens: Arc::new(Mutex::new(PageTokenStore::new())),
        })
}

#[derive(Debug, Deserialize)]
pub struct ListReceiptsQuery {
    pub status: Option<ReceiptStatusFilter>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ApproveReceiptResponse {
    pub active_plan_id: Uuid,
}

pub fn clamp_page_size(page_size: Option<u32>) -> u32 {
    page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE)
}

pub async fn submit<T>(
    State(state): State<PaymentReceiptRouteState<T>>,
    _admin: AdminUser,
    Json(model): Json<SubmitPaymentReceiptModel>,
) -> impl IntoResponse
where
    T: PaymentReceiptRepository + Send + Sync,
{
    match state.usecase.submit(model).await {
        Ok(receipt_id) => {
            (StatusCode::CREATED, Json(json!({ "id": receipt_id }))).into_response()
        }
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn get_by_id<T>(
    State(state): State<PaymentReceiptRouteState<T>>,
    _admin: AdminUser,
    Path(receipt_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: PaymentReceiptRepository + Send + Sync,
{
    match state.usecase.get(receipt_id).await {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list<T>(
    State(state): State<PaymentReceiptRouteState<T>>,
    admin: AdminUser,
    Query(query): Query<ListReceiptsQuery>,
) -> impl IntoResponse
where
    T: PaymentReceiptRepository + Send + Sync,
{
    let filter = query.status.unwrap_or_default();
    let page = query.page.unwrap_or(1).max(1);
    let page_size = clamp_page_size(query.page_size);

    let scope = format!("payment_receipts:{}", filter);
    let mut store = state.page_tokens.lock().await;
    let tokens = store.tokens_mut(admin.admin_id, &scope);

    match state.usecase.list_page(filter, page, page_size, tokens).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn approve<T>(
    State(state): State<PaymentReceiptRouteState<T>>,
    admin: AdminUser,
    Path(receipt_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: PaymentReceiptRepository + Send + Sync,
{
    match state.usecase.approve(receipt_id, admin.admin_id).await {
        Ok(active_plan_id) => {
            (StatusCode::OK, Json(ApproveReceiptResponse { active_plan_id })).into_response()
        }
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn reject<T>(
    State(state): State<PaymentReceiptRouteState<T>>,
    admin: AdminUser,
    Path(receipt_id): Path<Uuid>,
    Json(model): Json<RejectReceiptModel>,
) -> impl IntoResponse
where
    T: PaymentReceiptRepository + Send + Sync,
{
    match state
        .usecase
        .reject(receipt_id, admin.admin_id, model.reason, model.comment)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
