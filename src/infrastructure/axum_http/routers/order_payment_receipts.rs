use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    application::usecases::order_receipts::{OrderGateway, OrderReceiptUseCase},
    auth::AdminUser,
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::order_payment_receipts::OrderPaymentReceiptRepository,
        value_objects::{
            pagination::PageTokenStore,
            receipts::{RejectReceiptModel, SubmitOrderPaymentReceiptModel},
        },
    },
    infrastructure::{
        axum_http::{
            error_responses::error_response,
            routers::payment_receipts::{ListReceiptsQuery, clamp_page_size},
        },
        gateways::order_service::OrderServiceClient,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::order_payment_receipts::OrderPaymentReceiptPostgres,
        },
    },
};

pub struct OrderReceiptRouteState<T, G>
where
    T: OrderPaymentReceiptRepository + Send + Sync,
    G: OrderGateway + Send + Sync,
{
    usecase: Arc<OrderReceiptUseCase<T, G>>,
    page_tokens: Arc<Mutex<PageTokenStore>>,
}

impl<T, G> Clone for OrderReceiptRouteState<T, G>
where
    T: OrderPaymentReceiptRepository + Send + Sync,
    G: OrderGateway + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            usecase: Arc::clone(&self.usecase),
            page_tokens: Arc::clone(&self.page_tokens),
        }
    }
}

pub fn routes(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Router {
    let receipt_repository = OrderPaymentReceiptPostgres::new(Arc::clone(&db_pool));
    let order_gateway = OrderServiceClient::new(
        config.order_service.base_url.clone(),
        config.order_service.api_key.clone(),
    );
    let receipt_usecase =
        OrderReceiptUseCase::new(Arc::new(receipt_repository), Arc::new(order_gateway));

    Router::new()
        .route("/", post(submit).get(list))
        .route("/:receipt_id", get(get_by_id))
        .route("/:receipt_id/approve", post(approve))
        .route("/:receipt_id/reject", post(reject))
        .with_state(OrderReceiptRouteState {
            usecase: Arc::new(receipt_usecase),
            page_tokens: Arc::new(Mutex::new(PageTokenStore::new())),
        })
}

pub async fn submit<T, G>(
    State(state): State<OrderReceiptRouteState<T, G>>,
    _admin: AdminUser,
    Json(model): Json<SubmitOrderPaymentReceiptModel>,
) -> impl IntoResponse
where
    T: OrderPaymentReceiptRepository + Send + Sync,
    G: OrderGateway + Send + Sync,
{
    match state.usecase.submit(model).await {
        Ok(receipt_id) => {
            (StatusCode::CREATED, Json(json!({ "id": receipt_id }))).into_response()
        }
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn get_by_id<T, G>(
    State(state): State<OrderReceiptRouteState<T, G>>,
    _admin: AdminUser,
    Path(receipt_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: OrderPaymentReceiptRepository + Send + Sync,
    G: OrderGateway + Send + Sync,
{
    match state.usecase.get(receipt_id).await {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list<T, G>(
    State(state): State<OrderReceiptRouteState<T, G>>,
    admin: AdminUser,
    Query(query): Query<ListReceiptsQuery>,
) -> impl IntoResponse
where
    T: OrderPaymentReceiptRepository + Send + Sync,
    G: OrderGateway + Send + Sync,
{
    let filter = query.status.unwrap_or_default();
    let page = query.page.unwrap_or(1).max(1);
    let page_size = clamp_page_size(query.page_size);

    let scope = format!("order_payment_receipts:{}", filter);
    let mut store = state.page_tokens.lock().await;
    let tokens = store.tokens_mut(admin.admin_id, &scope);

    match state.usecase.list_page(filter, page, page_size, tokens).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn approve<T, G>(
    State(state): State<OrderReceiptRouteState<T, G>>,
    admin: AdminUser,
    Path(receipt_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: OrderPaymentReceiptRepository + Send + Sync,
    G: OrderGateway + Send + Sync,
{
    match state.usecase.approve(receipt_id, admin.admin_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn reject<T, G>(
    State(state): State<OrderReceiptRouteState<T, G>>,
    admin: AdminUser,
    Path(receipt_id): Path<Uuid>,
    Json(model): Json<RejectReceiptModel>,
) -> impl IntoResponse
where
    T: OrderPaymentReceiptRepository + Send + Sync,
    G: OrderGateway + Send + Sync,
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
