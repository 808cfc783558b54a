use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::order_payment_receipts::{
        InsertOrderPaymentReceiptEntity, OrderPaymentReceiptEntity,
    },
    value_objects::{
        enums::{receipt_statuses::ReceiptStatus, rejection_reasons::RejectionReason},
        pagination::PageCursor,
    },
};

#[async_trait]
#[automock]
pub trait OrderPaymentReceiptRepository {
    async fn create(&self, receipt: InsertOrderPaymentReceiptEntity) -> Result<Uuid>;

    async fn find_by_id(&self, receipt_id: Uuid) -> Result<Option<OrderPaymentReceiptEntity>>;

    /// Conditional `pending -> approved` update; `false` means the receipt
    /// was not pending.
    async fn approve_pending(&self, receipt_id: Uuid, approver_id: Uuid) -> Result<bool>;

    /// Compensating action when the order service rejects the downstream
    /// status change after the receipt was already approved.
    async fn revert_to_pending(&self, receipt_id: Uuid) -> Result<()>;

    async fn reject_pending(
        &self,
        receipt_id: Uuid,
        rejecter_id: Uuid,
        reason: RejectionReason,
        comment: Option<String>,
    ) -> Result<bool>;

    async fn list_page(
        &self,
        status: Option<ReceiptStatus>,
        cursor: Option<PageCursor>,
        page_size: i64,
    ) -> Result<Vec<OrderPaymentReceiptEntity>>;
}
