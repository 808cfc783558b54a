use std::sync::Arc;

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use mockall::automock;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::application::usecases::plan_receipts::{
    ReceiptError, ReceiptResult, normalize_rejection_comment,
};
use crate::domain::{
    entities::order_payment_receipts::InsertOrderPaymentReceiptEntity,
    repositories::order_payment_receipts::OrderPaymentReceiptRepository,
    value_objects::{
        enums::{
            receipt_statuses::{ReceiptStatus, ReceiptStatusFilter},
            rejection_reasons::RejectionReason,
        },
        pagination::{CursorLookup, PageCursor, PageTokens},
        receipts::{OrderPaymentReceiptModel, ReceiptPage, SubmitOrderPaymentReceiptModel},
    },
};

/// External order service; approving an order-payment receipt moves the
/// referenced order to its paid state over there.
#[async_trait]
#[automock]
pub trait OrderGateway: Send + Sync {
    async fn mark_order_paid(&self, order_id: Uuid) -> AnyResult<()>;
}

pub struct OrderReceiptUseCase<R, G>
where
    R: OrderPaymentReceiptRepository + Send + Sync,
    G: OrderGateway + Send + Sync,
{
    receipt_repo: Arc<R>,
    order_gateway: Arc<G>,
}

impl<R, G> OrderReceiptUseCase<R, G>
where
    R: OrderPaymentReceiptRepository + Send + Sync,
    G: OrderGateway + Send + Sync,
{
    pub fn new(receipt_repo: Arc<R>, order_gateway: Arc<G>) -> Self {
        Self {
            receipt_repo,
            order_gateway,
        }
    }

    /// Records a newly uploaded order-payment receipt as `pending`.
    pub async fn submit(&self, model: SubmitOrderPaymentReceiptModel) -> ReceiptResult<Uuid> {
        let insert = InsertOrderPaymentReceiptEntity {
            buyer_id: model.buyer.id,
            buyer_name: model.buyer.name.clone(),
            buyer_avatar_url: model.buyer.avatar_url,
            order_id: model.order_id,
            order_number: model.order_number,
            amount_minor: model.amount_minor,
            image_url: model.image.url,
            image_path: model.image.path,
            image_size_bytes: model.image.size_bytes,
            image_mime: model.image.mime,
            status: ReceiptStatus::Pending.to_string(),
            created_by: model.buyer.id,
        };

        let receipt_id = self.receipt_repo.create(insert).await.map_err(|err| {
            error!(db_error = ?err, "order_receipts: submission failed");
            ReceiptError::Internal(err)
        })?;

        info!(%receipt_id, buyer_id = %model.buyer.id, "order_receipts: receipt submitted");
        Ok(receipt_id)
    }

    pub async fn get(&self, receipt_id: Uuid) -> ReceiptResult<OrderPaymentReceiptModel> {
        let entity = self
            .receipt_repo
            .find_by_id(receipt_id)
            .await
            .map_err(|err| {
                error!(%receipt_id, db_error = ?err, "order_receipts: lookup failed");
                ReceiptError::Internal(err)
            })?
            .ok_or(ReceiptError::NotFound)?;

        OrderPaymentReceiptModel::try_from(entity).map_err(ReceiptError::Internal)
    }

    /// Approves a pending order-payment receipt, then tells the order
    /// service to mark the order paid. The order service lives outside our
    /// database, so the two writes cannot share a transaction; a gateway
    /// failure triggers a best-effort revert of the receipt instead.
    pub async fn approve(&self, receipt_id: Uuid, approver_id: Uuid) -> ReceiptResult<()> {
        info!(%receipt_id, %approver_id, "order_receipts: approval requested");

        let receipt = self
            .receipt_repo
            .find_by_id(receipt_id)
            .await
            .map_err(|err| {
                error!(%receipt_id, db_error = ?err, "order_receipts: failed to load receipt");
                ReceiptError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%receipt_id, "order_receipts: receipt not found");
                ReceiptError::NotFound
            })?;

        let approved = self
            .receipt_repo
            .approve_pending(receipt_id, approver_id)
            .await
            .map_err(|err| {
                error!(%receipt_id, db_error = ?err, "order_receipts: approval update failed");
                ReceiptError::Internal(err)
            })?;

        if !approved {
            warn!(%receipt_id, "order_receipts: receipt already resolved");
            return Err(ReceiptError::NotPending);
        }

        if let Err(err) = self.order_gateway.mark_order_paid(receipt.order_id).await {
            error!(
                %receipt_id,
                order_id = %receipt.order_id,
                error = ?err,
                "order_receipts: order service rejected paid transition; reverting receipt"
            );
            if let Err(revert_err) = self.receipt_repo.revert_to_pending(receipt_id).await {
                error!(
                    %receipt_id,
                    db_error = ?revert_err,
                    "order_receipts: compensating revert failed; receipt left approved"
                );
            }
            return Err(ReceiptError::Internal(err));
        }

        info!(
            %receipt_id,
            %approver_id,
            order_id = %receipt.order_id,
            "order_receipts: receipt approved and order marked paid"
        );
        Ok(())
    }

    pub async fn reject(
        &self,
        receipt_id: Uuid,
        rejecter_id: Uuid,
        reason: RejectionReason,
        comment: Option<String>,
    ) -> ReceiptResult<()> {
        info!(%receipt_id, %rejecter_id, reason = %reason, "order_receipts: rejection requested");

        let comment = normalize_rejection_comment(reason, comment)?;

        if self
            .receipt_repo
            .find_by_id(receipt_id)
            .await
            .map_err(ReceiptError::Internal)?
            .is_none()
        {
            warn!(%receipt_id, "order_receipts: receipt not found");
            return Err(ReceiptError::NotFound);
        }

        let rejected = self
            .receipt_repo
            .reject_pending(receipt_id, rejecter_id, reason, comment)
            .await
            .map_err(|err| {
                error!(%receipt_id, db_error = ?err, "order_receipts: rejection failed");
                ReceiptError::Internal(err)
            })?;

        if !rejected {
            warn!(%receipt_id, "order_receipts: receipt already resolved");
            return Err(ReceiptError::NotPending);
        }

        info!(%receipt_id, %rejecter_id, reason = %reason, "order_receipts: receipt rejected");
        Ok(())
    }

    pub async fn list_page(
        &self,
        filter: ReceiptStatusFilter,
        page: u32,
        page_size: u32,
        tokens: &mut PageTokens,
    ) -> ReceiptResult<ReceiptPage<OrderPaymentReceiptModel>> {
        let cursor = match tokens.cursor_for_page(page) {
            CursorLookup::FirstPage => None,
            CursorLookup::Cursor(cursor) => Some(cursor),
            CursorLookup::Unknown => {
                warn!(page, "order_receipts: page requested beyond known frontier");
                return Err(ReceiptError::PageOutOfRange(page));
            }
        };

        let rows = self
            .receipt_repo
            .list_page(filter.as_status(), cursor, i64::from(page_size) + 1)
            .await
            .map_err(|err| {
                error!(page, db_error = ?err, "order_receipts: failed to list receipts");
                ReceiptError::Internal(err)
            })?;

        let has_more = rows.len() > page_size as usize;
        let rows: Vec<_> = rows.into_iter().take(page_size as usize).collect();

        if let Some(last) = rows.last() {
            tokens.record_boundary(
                page,
                PageCursor {
                    created_at: last.created_at,
                    id: last.id,
                },
            );
        }

        let items = rows
            .into_iter()
            .map(OrderPaymentReceiptModel::try_from)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(ReceiptError::Internal)?;

        Ok(ReceiptPage {
            items,
            page,
            has_more,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::Utc;
    use mockall::predicate::eq;

    use crate::domain::{
        entities::order_payment_receipts::OrderPaymentReceiptEntity,
        repositories::order_payment_receipts::MockOrderPaymentReceiptRepository,
        value_objects::enums::receipt_statuses::ReceiptStatus,
    };

    fn sample_receipt(receipt_id: Uuid, order_id: Uuid) -> OrderPaymentReceiptEntity {
        OrderPaymentReceiptEntity {
            id: receipt_id,
            buyer_id: Uuid::new_v4(),
            buyer_name: "Carla M.".to_string(),
            buyer_avatar_url: None,
            order_id,
            order_number: "ORD-2026-0142".to_string(),
            amount_minor: 73_500,
            image_url: "https://cdn.example/receipts/o1.jpg".to_string(),
            image_path: "receipts/o1.jpg".to_string(),
            image_size_bytes: 51_002,
            image_mime: "image/jpeg".to_string(),
            status: ReceiptStatus::Pending.to_string(),
            approved_by: None,
            approved_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            rejection_comment: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn approval_marks_order_paid() {
        let receipt_id = Uuid::new_v4();
        let order_id = Uuid::new_v4();

        let mut receipt_repo = MockOrderPaymentReceiptRepository::new();
        let receipt = sample_receipt(receipt_id, order_id);
        receipt_repo.expect_find_by_id().returning(move |_| {
            let receipt = receipt.clone();
            Box::pin(async move { Ok(Some(receipt)) })
        });
        receipt_repo
            .expect_approve_pending()
            .returning(|_, _| Box::pin(async { Ok(true) }));

        let mut gateway = MockOrderGateway::new();
        gateway
            .expect_mark_order_paid()
            .with(eq(order_id))
            .returning(|_| Box::pin(async { Ok(()) }));

        let usecase = OrderReceiptUseCase::new(Arc::new(receipt_repo), Arc::new(gateway));
        usecase.approve(receipt_id, Uuid::new_v4()).await.unwrap();
    }

    #[tokio::test]
    async fn gateway_failure_reverts_the_receipt() {
        let receipt_id = Uuid::new_v4();
        let order_id = Uuid::new_v4();

        let mut receipt_repo = MockOrderPaymentReceiptRepository::new();
        let receipt = sample_receipt(receipt_id, order_id);
        receipt_repo.expect_find_by_id().returning(move |_| {
            let receipt = receipt.clone();
            Box::pin(async move { Ok(Some(receipt)) })
        });
        receipt_repo
            .expect_approve_pending()
            .returning(|_, _| Box::pin(async { Ok(true) }));
        receipt_repo
            .expect_revert_to_pending()
            .with(eq(receipt_id))
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));

        let mut gateway = MockOrderGateway::new();
        gateway
            .expect_mark_order_paid()
            .returning(|_| Box::pin(async { Err(anyhow!("order service unavailable")) }));

        let usecase = OrderReceiptUseCase::new(Arc::new(receipt_repo), Arc::new(gateway));
        let result = usecase.approve(receipt_id, Uuid::new_v4()).await;

        assert!(matches!(result, Err(ReceiptError::Internal(_))));
    }

    #[tokio::test]
    async fn rejection_after_revert_carries_no_approval_metadata() {
        let receipt_id = Uuid::new_v4();
        let order_id = Uuid::new_v4();
        let row = Arc::new(std::sync::Mutex::new(sample_receipt(receipt_id, order_id)));

        let mut receipt_repo = MockOrderPaymentReceiptRepository::new();
        {
            let row = Arc::clone(&row);
            receipt_repo.expect_find_by_id().returning(move |_| {
                let receipt = row.lock().unwrap().clone();
                Box::pin(async move { Ok(Some(receipt)) })
            });
        }
        {
            let row = Arc::clone(&row);
            receipt_repo
                .expect_approve_pending()
                .returning(move |_, approver_id| {
                    let mut receipt = row.lock().unwrap();
                    receipt.status = ReceiptStatus::Approved.to_string();
                    receipt.approved_by = Some(approver_id);
                    receipt.approved_at = Some(Utc::now());
                    Box::pin(async { Ok(true) })
                });
        }
        {
            let row = Arc::clone(&row);
            receipt_repo
                .expect_revert_to_pending()
                .times(1)
                .returning(move |_| {
                    let mut receipt = row.lock().unwrap();
                    receipt.status = ReceiptStatus::Pending.to_string();
                    receipt.approved_by = None;
                    receipt.approved_at = None;
                    Box::pin(async { Ok(()) })
                });
        }
        {
            let row = Arc::clone(&row);
            receipt_repo
                .expect_reject_pending()
                .returning(move |_, rejecter_id, reason, comment| {
                    let mut receipt = row.lock().unwrap();
                    receipt.status = ReceiptStatus::Rejected.to_string();
                    receipt.rejected_by = Some(rejecter_id);
                    receipt.rejected_at = Some(Utc::now());
                    receipt.rejection_reason = Some(reason.to_string());
                    receipt.rejection_comment = comment;
                    // the rejection update clears any stale approval columns
                    receipt.approved_by = None;
                    receipt.approved_at = None;
                    Box::pin(async { Ok(true) })
                });
        }

        let mut gateway = MockOrderGateway::new();
        gateway
            .expect_mark_order_paid()
            .returning(|_| Box::pin(async { Err(anyhow!("order service unavailable")) }));

        let usecase = OrderReceiptUseCase::new(Arc::new(receipt_repo), Arc::new(gateway));

        let result = usecase.approve(receipt_id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(ReceiptError::Internal(_))));

        usecase
            .reject(receipt_id, Uuid::new_v4(), RejectionReason::Illegible, None)
            .await
            .unwrap();

        let model = usecase.get(receipt_id).await.unwrap();
        assert_eq!(model.status, ReceiptStatus::Rejected);
        assert!(model.approval.is_none());
        assert!(model.rejection.is_some());
    }

    #[tokio::test]
    async fn resolved_receipt_cannot_be_rejected_again() {
        let receipt_id = Uuid::new_v4();

        let mut receipt_repo = MockOrderPaymentReceiptRepository::new();
        let mut receipt = sample_receipt(receipt_id, Uuid::new_v4());
        receipt.status = ReceiptStatus::Rejected.to_string();
        receipt_repo.expect_find_by_id().returning(move |_| {
            let receipt = receipt.clone();
            Box::pin(async move { Ok(Some(receipt)) })
        });
        receipt_repo
            .expect_reject_pending()
            .returning(|_, _, _, _| Box::pin(async { Ok(false) }));

        let gateway = MockOrderGateway::new();
        let usecase = OrderReceiptUseCase::new(Arc::new(receipt_repo), Arc::new(gateway));
        let result = usecase
            .reject(
                receipt_id,
                Uuid::new_v4(),
                RejectionReason::Duplicate,
                None,
            )
            .await;

        assert!(matches!(result, Err(ReceiptError::NotPending)));
    }
}
