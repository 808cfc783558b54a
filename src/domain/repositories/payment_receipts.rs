use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::{
        active_plans::InsertActivePlanEntity,
        payment_receipts::{InsertPaymentReceiptEntity, PaymentReceiptEntity},
    },
    value_objects::{
        enums::{receipt_statuses::ReceiptStatus, rejection_reasons::RejectionReason},
        pagination::PageCursor,
    },
};

#[async_trait]
#[automock]
pub trait PaymentReceiptRepository {
    async fn create(&self, receipt: InsertPaymentReceiptEntity) -> Result<Uuid>;

    async fn find_by_id(&self, receipt_id: Uuid) -> Result<Option<PaymentReceiptEntity>>;

    /// Approves a pending receipt and creates its ActivePlan in one
    /// transaction, stamping the plan id back onto the receipt. Returns the
    /// plan id, or `None` when the receipt was not pending (nothing written).
    async fn approve_pending_and_create_plan(
        &self,
        receipt_id: Uuid,
        approver_id: Uuid,
        plan: InsertActivePlanEntity,
    ) -> Result<Option<Uuid>>;

    /// Marks a pending receipt rejected. Returns `false` when the receipt
    /// was not pending.
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
    ) -> Result<Vec<PaymentReceiptEntity>>;
}
