use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::application::usecases::plan_receipts::{
    ReceiptError, ReceiptResult, normalize_rejection_comment,
};
use crate::domain::{
    entities::wallet_transactions::InsertWalletTransactionEntity,
    repositories::wallet_transactions::WalletTransactionRepository,
    value_objects::{
        enums::{
            receipt_statuses::ReceiptStatusFilter, rejection_reasons::RejectionReason,
            wallet_statuses::WalletTransactionStatus,
        },
        pagination::{CursorLookup, PageCursor, PageTokens},
        receipts::{ReceiptPage, SubmitWalletTopUpModel, WalletTransactionModel},
    },
};

fn wallet_status_filter(filter: ReceiptStatusFilter) -> Option<WalletTransactionStatus> {
    // The wallet table uses completed/failed where the other receipt tables
    // use approved/rejected.
    match filter {
        ReceiptStatusFilter::All => None,
        ReceiptStatusFilter::Pending => Some(WalletTransactionStatus::Pending),
        ReceiptStatusFilter::Approved => Some(WalletTransactionStatus::Completed),
        ReceiptStatusFilter::Rejected => Some(WalletTransactionStatus::Failed),
    }
}

pub struct WalletTopUpUseCase<R>
where
    R: WalletTransactionRepository + Send + Sync,
{
    transaction_repo: Arc<R>,
}

impl<R> WalletTopUpUseCase<R>
where
    R: WalletTransactionRepository + Send + Sync,
{
    pub fn new(transaction_repo: Arc<R>) -> Self {
        Self { transaction_repo }
    }

    /// Records a newly uploaded top-up receipt as `pending`.
    pub async fn submit(&self, model: SubmitWalletTopUpModel) -> ReceiptResult<Uuid> {
        let insert = InsertWalletTransactionEntity {
            user_id: model.user.id,
            user_name: model.user.name.clone(),
            user_avatar_url: model.user.avatar_url,
            description: model.description,
            amount_minor: model.amount_minor,
            image_url: model.image.url,
            image_path: model.image.path,
            image_size_bytes: model.image.size_bytes,
            image_mime: model.image.mime,
            status: WalletTransactionStatus::Pending.to_string(),
            created_by: model.user.id,
        };

        let transaction_id = self.transaction_repo.create(insert).await.map_err(|err| {
            error!(db_error = ?err, "wallet_topups: submission failed");
            ReceiptError::Internal(err)
        })?;

        info!(%transaction_id, user_id = %model.user.id, "wallet_topups: top-up submitted");
        Ok(transaction_id)
    }

    pub async fn get(&self, transaction_id: Uuid) -> ReceiptResult<WalletTransactionModel> {
        let entity = self
            .transaction_repo
            .find_by_id(transaction_id)
            .await
            .map_err(|err| {
                error!(%transaction_id, db_error = ?err, "wallet_topups: lookup failed");
                ReceiptError::Internal(err)
            })?
            .ok_or(ReceiptError::NotFound)?;

        WalletTransactionModel::try_from(entity).map_err(ReceiptError::Internal)
    }

    /// Approves a pending top-up: the status change and the wallet balance
    /// credit run in one repository transaction. Returns the new balance.
    pub async fn approve(&self, transaction_id: Uuid, approver_id: Uuid) -> ReceiptResult<i64> {
        info!(%transaction_id, %approver_id, "wallet_topups: approval requested");

        if self
            .transaction_repo
            .find_by_id(transaction_id)
            .await
            .map_err(ReceiptError::Internal)?
            .is_none()
        {
            warn!(%transaction_id, "wallet_topups: transaction not found");
            return Err(ReceiptError::NotFound);
        }

        match self
            .transaction_repo
            .complete_pending_and_credit(transaction_id, approver_id)
            .await
            .map_err(|err| {
                error!(
                    %transaction_id,
                    db_error = ?err,
                    "wallet_topups: credit transaction failed"
                );
                ReceiptError::Internal(err)
            })? {
            Some(new_balance) => {
                info!(
                    %transaction_id,
                    %approver_id,
                    new_balance,
                    "wallet_topups: top-up completed and wallet credited"
                );
                Ok(new_balance)
            }
            None => {
                warn!(%transaction_id, "wallet_topups: transaction already resolved");
                Err(ReceiptError::NotPending)
            }
        }
    }

    pub async fn reject(
        &self,
        transaction_id: Uuid,
        rejecter_id: Uuid,
        reason: RejectionReason,
        comment: Option<String>,
    ) -> ReceiptResult<()> {
        info!(%transaction_id, %rejecter_id, reason = %reason, "wallet_topups: rejection requested");

        let comment = normalize_rejection_comment(reason, comment)?;

        if self
            .transaction_repo
            .find_by_id(transaction_id)
            .await
            .map_err(ReceiptError::Internal)?
            .is_none()
        {
            warn!(%transaction_id, "wallet_topups: transaction not found");
            return Err(ReceiptError::NotFound);
        }

        let rejected = self
            .transaction_repo
            .fail_pending(transaction_id, rejecter_id, reason, comment)
            .await
            .map_err(|err| {
                error!(%transaction_id, db_error = ?err, "wallet_topups: rejection failed");
                ReceiptError::Internal(err)
            })?;

        if !rejected {
            warn!(%transaction_id, "wallet_topups: transaction already resolved");
            return Err(ReceiptError::NotPending);
        }

        info!(%transaction_id, %rejecter_id, reason = %reason, "wallet_topups: top-up failed");
        Ok(())
    }

    pub async fn list_page(
        &self,
        filter: ReceiptStatusFilter,
        page: u32,
        page_size: u32,
        tokens: &mut PageTokens,
    ) -> ReceiptResult<ReceiptPage<WalletTransactionModel>> {
        let cursor = match tokens.cursor_for_page(page) {
            CursorLookup::FirstPage => None,
            CursorLookup::Cursor(cursor) => Some(cursor),
            CursorLookup::Unknown => {
                warn!(page, "wallet_topups: page requested beyond known frontier");
                return Err(ReceiptError::PageOutOfRange(page));
            }
        };

        let rows = self
            .transaction_repo
            .list_page(wallet_status_filter(filter), cursor, i64::from(page_size) + 1)
            .await
            .map_err(|err| {
                error!(page, db_error = ?err, "wallet_topups: failed to list transactions");
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
            .map(WalletTransactionModel::try_from)
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
    use chrono::Utc;
    use mockall::predicate::eq;

    use crate::domain::{
        entities::wallet_transactions::WalletTransactionEntity,
        repositories::wallet_transactions::MockWalletTransactionRepository,
    };

    fn sample_transaction(transaction_id: Uuid) -> WalletTransactionEntity {
        WalletTransactionEntity {
            id: transaction_id,
            user_id: Uuid::new_v4(),
            user_name: "Luis P.".to_string(),
            user_avatar_url: None,
            description: Some("Recarga de saldo".to_string()),
            amount_minor: 50_000,
            image_url: "https://cdn.example/receipts/w1.jpg".to_string(),
            image_path: "receipts/w1.jpg".to_string(),
            image_size_bytes: 40_120,
            image_mime: "image/jpeg".to_string(),
            status: WalletTransactionStatus::Pending.to_string(),
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
    async fn approval_returns_the_credited_balance() {
        let transaction_id = Uuid::new_v4();
        let approver_id = Uuid::new_v4();

        let mut transaction_repo = MockWalletTransactionRepository::new();
        let transaction = sample_transaction(transaction_id);
        transaction_repo.expect_find_by_id().returning(move |_| {
            let transaction = transaction.clone();
            Box::pin(async move { Ok(Some(transaction)) })
        });
        transaction_repo
            .expect_complete_pending_and_credit()
            .with(eq(transaction_id), eq(approver_id))
            .returning(|_, _| Box::pin(async { Ok(Some(125_000)) }));

        let usecase = WalletTopUpUseCase::new(Arc::new(transaction_repo));
        let balance = usecase.approve(transaction_id, approver_id).await.unwrap();

        assert_eq!(balance, 125_000);
    }

    #[tokio::test]
    async fn resolved_transaction_cannot_be_approved_again() {
        let transaction_id = Uuid::new_v4();

        let mut transaction_repo = MockWalletTransactionRepository::new();
        let mut transaction = sample_transaction(transaction_id);
        transaction.status = WalletTransactionStatus::Completed.to_string();
        transaction_repo.expect_find_by_id().returning(move |_| {
            let transaction = transaction.clone();
            Box::pin(async move { Ok(Some(transaction)) })
        });
        transaction_repo
            .expect_complete_pending_and_credit()
            .returning(|_, _| Box::pin(async { Ok(None) }));

        let usecase = WalletTopUpUseCase::new(Arc::new(transaction_repo));
        let result = usecase.approve(transaction_id, Uuid::new_v4()).await;

        assert!(matches!(result, Err(ReceiptError::NotPending)));
    }

    #[test]
    fn status_filter_maps_to_wallet_synonyms() {
        assert_eq!(
            wallet_status_filter(ReceiptStatusFilter::Approved),
            Some(WalletTransactionStatus::Completed)
        );
        assert_eq!(
            wallet_status_filter(ReceiptStatusFilter::Rejected),
            Some(WalletTransactionStatus::Failed)
        );
        assert_eq!(wallet_status_filter(ReceiptStatusFilter::All), None);
    }
}
