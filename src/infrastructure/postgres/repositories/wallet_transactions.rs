use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{insert_into, prelude::*, update};
use uuid::Uuid;

use crate::domain::{
    entities::wallet_transactions::{InsertWalletTransactionEntity, WalletTransactionEntity},
    repositories::wallet_transactions::WalletTransactionRepository,
    value_objects::{
        enums::{rejection_reasons::RejectionReason, wallet_statuses::WalletTransactionStatus},
        pagination::PageCursor,
    },
};
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad,
    schema::{users, wallet_transactions},
};

pub struct WalletTransactionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl WalletTransactionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl WalletTransactionRepository for WalletTransactionPostgres {
    async fn create(&self, transaction: InsertWalletTransactionEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(wallet_transactions::table)
            .values(&transaction)
            .returning(wallet_transactions::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, transaction_id: Uuid) -> Result<Option<WalletTransactionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = wallet_transactions::table
            .filter(wallet_transactions::id.eq(transaction_id))
            .select(WalletTransactionEntity::as_select())
            .first::<WalletTransactionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn complete_pending_and_credit(
        &self,
        transaction_id: Uuid,
        approver_id: Uuid,
    ) -> Result<Option<i64>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<Option<i64>, diesel::result::Error, _>(|tx| {
            let claimed = update(wallet_transactions::table)
                .filter(wallet_transactions::id.eq(transaction_id))
                .filter(
                    wallet_transactions::status
                        .eq(WalletTransactionStatus::Pending.to_string()),
                )
                .set((
                    wallet_transactions::status
                        .eq(WalletTransactionStatus::Completed.to_string()),
                    wallet_transactions::approved_by.eq(approver_id),
                    wallet_transactions::approved_at.eq(Utc::now()),
                    wallet_transactions::rejected_by.eq(None::<Uuid>),
                    wallet_transactions::rejected_at.eq(None::<chrono::DateTime<Utc>>),
                    wallet_transactions::rejection_reason.eq(None::<String>),
                    wallet_transactions::rejection_comment.eq(None::<String>),
                ))
                .returning((wallet_transactions::user_id, wallet_transactions::amount_minor))
                .get_result::<(Uuid, i64)>(tx)
                .optional()?;

            let Some((user_id, amount_minor)) = claimed else {
                return Ok(None);
            };

            let new_balance: i64 = update(users::table)
                .filter(users::id.eq(user_id))
                .set(
                    users::wallet_balance_minor
                        .eq(users::wallet_balance_minor + amount_minor),
                )
                .returning(users::wallet_balance_minor)
                .get_result::<i64>(tx)?;

            Ok(Some(new_balance))
        })?;

        Ok(result)
    }

    async fn fail_pending(
        &self,
        transaction_id: Uuid,
        rejecter_id: Uuid,
        reason: RejectionReason,
        comment: Option<String>,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let failed = update(wallet_transactions::table)
            .filter(wallet_transactions::id.eq(transaction_id))
            .filter(
                wallet_transactions::status.eq(WalletTransactionStatus::Pending.to_string()),
            )
            .set((
                wallet_transactions::status.eq(WalletTransactionStatus::Failed.to_string()),
                wallet_transactions::rejected_by.eq(rejecter_id),
                wallet_transactions::rejected_at.eq(Utc::now()),
                wallet_transactions::rejection_reason.eq(reason.to_string()),
                wallet_transactions::rejection_comment.eq(comment),
                wallet_transactions::approved_by.eq(None::<Uuid>),
                wallet_transactions::approved_at.eq(None::<chrono::DateTime<Utc>>),
            ))
            .execute(&mut conn)?;

        Ok(failed > 0)
    }

    async fn list_page(
        &self,
        status: Option<WalletTransactionStatus>,
        cursor: Option<PageCursor>,
        page_size: i64,
    ) -> Result<Vec<WalletTransactionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = wallet_transactions::table
            .select(WalletTransactionEntity::as_select())
            .into_boxed();

        if let Some(status) = status {
            query = query.filter(wallet_transactions::status.eq(status.to_string()));
        }

        if let Some(cursor) = cursor {
            query = query.filter(
                wallet_transactions::created_at.lt(cursor.created_at).or(
                    wallet_transactions::created_at
                        .eq(cursor.created_at)
                        .and(wallet_transactions::id.lt(cursor.id)),
                ),
            );
        }

        let results = query
            .order((
                wallet_transactions::created_at.desc(),
                wallet_transactions::id.desc(),
            ))
            .limit(page_size)
            .load::<WalletTransactionEntity>(&mut conn)?;

        Ok(results)
    }
}
