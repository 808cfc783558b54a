use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    application::usecases::wallet_topups::WalletTopUpUseCase,
    auth::AdminUser,
    domain::{
        repositories::wallet_transactions::WalletTransactionRepository,
        value_objects::{
            pagination::PageTokenStore,
            receipts::{RejectReceiptModel, SubmitWalletTopUpModel},
        },
    },
    infrastructure::{
        axum_http::{
            error_responses::error_response,
            routers::payment_receipts::{ListReceiptsQuery, clamp_page_size},
        },
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::wallet_transactions::WalletTransactionPostgres,
        },
    },
};

pub struct WalletTransactionRouteState<T>
where
    T: WalletTransactionRepository + Send + Sync,
{
    usecase: Arc<WalletTopUpUseCase<T>>,
    page_tokens: Arc<Mutex<PageTokenStore>>,
}

impl<T> Clone for WalletTransactionRouteState<T>
where
    T: WalletTransactionRepository + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            usecase: Arc::clone(&self.usecase),
            page_tokens: Arc::clone(&self.page_tokens),
        }
    }
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let transaction_repository = WalletTransactionPostgres::new(Arc::clone(&db_pool));
    let topup_usecase = WalletTopUpUseCase::new(Arc::new(transaction_repository));

    Router::new()
        .route("/", post(submit).get(list))
        .route("/:transaction_id", get(get_by_id))
        .route("/:transaction_id/approve", post(approve))
        .route("/:transaction_id/reject", post(reject))
        .with_state(WalletTransactionRouteState {
            usecase: Arc::new(topup_usecase),
            page_tokens: Arc::new(Mutex::new(PageTokenStore::new())),
        })
}

#[derive(Debug, Serialize)]
pub struct ApproveTopUpResponse {
    pub wallet_balance_minor: i64,
}

pub async fn submit<T>(
    State(state): State<WalletTransactionRouteState<T>>,
    _admin: AdminUser,
    Json(model): Json<SubmitWalletTopUpModel>,
) -> impl IntoResponse
where
    T: WalletTransactionRepository + Send + Sync,
{
    match state.usecase.submit(model).await {
        Ok(transaction_id) => {
            (StatusCode::CREATED, Json(json!({ "id": transaction_id }))).into_response()
        }
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn get_by_id<T>(
    State(state): State<WalletTransactionRouteState<T>>,
    _admin: AdminUser,
    Path(transaction_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: WalletTransactionRepository + Send + Sync,
{
    match state.usecase.get(transaction_id).await {
        Ok(transaction) => (StatusCode::OK, Json(transaction)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list<T>(
    State(state): State<WalletTransactionRouteState<T>>,
    admin: AdminUser,
    Query(query): Query<ListReceiptsQuery>,
) -> impl IntoResponse
where
    T: WalletTransactionRepository + Send + Sync,
{
    let filter = query.status.unwrap_or_default();
    let page = query.page.unwrap_or(1).max(1);
    let page_size = clamp_page_size(query.page_size);

    let scope = format!("wallet_transactions:{}", filter);
    let mut store = state.page_tokens.lock().await;
    let tokens = store.tokens_mut(admin.admin_id, &scope);

    match state.usecase.list_page(filter, page, page_size, tokens).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn approve<T>(
    State(state): State<WalletTransactionRouteState<T>>,
    admin: AdminUser,
    Path(transaction_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: WalletTransactionRepository + Send + Sync,
{
    match state.usecase.approve(transaction_id, admin.admin_id).await {
        Ok(wallet_balance_minor) => (
            StatusCode::OK,
            Json(ApproveTopUpResponse {
                wallet_balance_minor,
            }),
        )
            .into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn reject<T>(
    State(state): State<WalletTransactionRouteState<T>>,
    admin: AdminUser,
    Path(transaction_id): Path<Uuid>,
    Json(model): Json<RejectReceiptModel>,
) -> impl IntoResponse
where
    T: WalletTransactionRepository + Send + Sync,
{
    match state
        .usecase
        .reject(transaction_id, admin.admin_id, model.reason, model.comment)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
