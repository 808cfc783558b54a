use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::wallet_transactions::{InsertWalletTransactionEntity, WalletTransactionEntity},
    value_objects::{
        enums::{rejection_reasons::RejectionReason, wallet_statuses::WalletTransactionStatus},
        pagination::PageCursor,
    },
};

#[async_trait]
#[automock]
pub trait WalletTransactionRepository {
    async fn create(&self, transaction: InsertWalletTransactionEntity) -> Result<Uuid>;

    async fn find_by_id(&self, transaction_id: Uuid) -> Result<Option<WalletTransactionEntity>>;

    /// Marks a pending top-up completed and credits the user's wallet
    /// balance in the same transaction. Returns the new balance, or `None`
    /// when the top-up was not pending (nothing written).
    async fn complete_pending_and_credit(
        &self,
        transaction_id: Uuid,
        approver_id: Uuid,
    ) -> Result<Option<i64>>;

    /// Marks a pending top-up failed. `false` means it was not pending.
    async fn fail_pending(
        &self,
        transaction_id: Uuid,
        rejecter_id: Uuid,
        reason: RejectionReason,
        comment: Option<String>,
    ) -> Result<bool>;

    async fn list_page(
        &self,
        status: Option<WalletTransactionStatus>,
        cursor: Option<PageCursor>,
        page_size: i64,
    ) -> Result<Vec<WalletTransactionEntity>>;
}
