use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{insert_into, prelude::*, update};
use uuid::Uuid;

use crate::domain::{
    entities::order_payment_receipts::{
        InsertOrderPaymentReceiptEntity, OrderPaymentReceiptEntity,
    },
    repositories::order_payment_receipts::OrderPaymentReceiptRepository,
    value_objects::{
        enums::{receipt_statuses::ReceiptStatus, rejection_reasons::RejectionReason},
        pagination::PageCursor,
    },
};
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad, schema::order_payment_receipts,
};

pub struct OrderPaymentReceiptPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl OrderPaymentReceiptPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl OrderPaymentReceiptRepository for OrderPaymentReceiptPostgres {
    async fn create(&self, receipt: InsertOrderPaymentReceiptEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(order_payment_receipts::table)
            .values(&receipt)
            .returning(order_payment_receipts::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, receipt_id: Uuid) -> Result<Option<OrderPaymentReceiptEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = order_payment_receipts::table
            .filter(order_payment_receipts::id.eq(receipt_id))
            .select(OrderPaymentReceiptEntity::as_select())
            .first::<OrderPaymentReceiptEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn approve_pending(&self, receipt_id: Uuid, approver_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let approved = update(order_payment_receipts::table)
            .filter(order_payment_receipts::id.eq(receipt_id))
            .filter(order_payment_receipts::status.eq(ReceiptStatus::Pending.to_string()))
            .set((
                order_payment_receipts::status.eq(ReceiptStatus::Approved.to_string()),
                order_payment_receipts::approved_by.eq(approver_id),
                order_payment_receipts::approved_at.eq(Utc::now()),
                order_payment_receipts::rejected_by.eq(None::<Uuid>),
                order_payment_receipts::rejected_at.eq(None::<chrono::DateTime<Utc>>),
                order_payment_receipts::rejection_reason.eq(None::<String>),
                order_payment_receipts::rejection_comment.eq(None::<String>),
            ))
            .execute(&mut conn)?;

        Ok(approved > 0)
    }

    async fn revert_to_pending(&self, receipt_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(order_payment_receipts::table)
            .filter(order_payment_receipts::id.eq(receipt_id))
            .filter(order_payment_receipts::status.eq(ReceiptStatus::Approved.to_string()))
            .set((
                order_payment_receipts::status.eq(ReceiptStatus::Pending.to_string()),
                order_payment_receipts::approved_by.eq(None::<Uuid>),
                order_payment_receipts::approved_at.eq(None::<chrono::DateTime<Utc>>),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn reject_pending(
        &self,
        receipt_id: Uuid,
        rejecter_id: Uuid,
        reason: RejectionReason,
        comment: Option<String>,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rejected = update(order_payment_receipts::table)
            .filter(order_payment_receipts::id.eq(receipt_id))
            .filter(order_payment_receipts::status.eq(ReceiptStatus::Pending.to_string()))
            .set((
                order_payment_receipts::status.eq(ReceiptStatus::Rejected.to_string()),
                order_payment_receipts::rejected_by.eq(rejecter_id),
                order_payment_receipts::rejected_at.eq(Utc::now()),
                order_payment_receipts::rejection_reason.eq(reason.to_string()),
                order_payment_receipts::rejection_comment.eq(comment),
                order_payment_receipts::approved_by.eq(None::<Uuid>),
                order_payment_receipts::approved_at.eq(None::<chrono::DateTime<Utc>>),
            ))
            .execute(&mut conn)?;

        Ok(rejected > 0)
    }

    async fn list_page(
        &self,
        status: Option<ReceiptStatus>,
        cursor: Option<PageCursor>,
        page_size: i64,
    ) -> Result<Vec<OrderPaymentReceiptEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = order_payment_receipts::table
            .select(OrderPaymentReceiptEntity::as_select())
            .into_boxed();

        if let Some(status) = status {
            query = query.filter(order_payment_receipts::status.eq(status.to_string()));
        }

        if let Some(cursor) = cursor {
            query = query.filter(
                order_payment_receipts::created_at.lt(cursor.created_at).or(
                    order_payment_receipts::created_at
                        .eq(cursor.created_at)
                        .and(order_payment_receipts::id.lt(cursor.id)),
                ),
            );
        }

        let results = query
            .order((
                order_payment_receipts::created_at.desc(),
                order_payment_receipts::id.desc(),
            ))
            .limit(page_size)
            .load::<OrderPaymentReceiptEntity>(&mut conn)?;

        Ok(results)
    }
}
