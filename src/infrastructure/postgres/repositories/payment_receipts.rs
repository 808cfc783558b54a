use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{insert_into, prelude::*, update};
use uuid::Uuid;

use crate::domain::{
    entities::{
        active_plans::InsertActivePlanEntity,
        payment_receipts::{InsertPaymentReceiptEntity, PaymentReceiptEntity},
    },
    repositories::payment_receipts::PaymentReceiptRepository,
    value_objects::{
        enums::{receipt_statuses::ReceiptStatus, rejection_reasons::RejectionReason},
        pagination::PageCursor,
    },
};
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad,
    schema::{active_plans, payment_receipts},
};

pub struct PaymentReceiptPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentReceiptPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentReceiptRepository for PaymentReceiptPostgres {
    async fn create(&self, receipt: InsertPaymentReceiptEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(payment_receipts::table)
            .values(&receipt)
            .returning(payment_receipts::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, receipt_id: Uuid) -> Result<Option<PaymentReceiptEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = payment_receipts::table
            .filter(payment_receipts::id.eq(receipt_id))
            .select(PaymentReceiptEntity::as_select())
            .first::<PaymentReceiptEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn approve_pending_and_create_plan(
        &self,
        receipt_id: Uuid,
        approver_id: Uuid,
        plan: InsertActivePlanEntity,
    ) -> Result<Option<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();

        let result = conn.transaction::<Option<Uuid>, diesel::result::Error, _>(|tx| {
            // The pending guard doubles as the idempotency check: a receipt
            // resolved by a concurrent admin matches zero rows here and no
            // plan is created.
            let claimed = update(payment_receipts::table)
                .filter(payment_receipts::id.eq(receipt_id))
                .filter(payment_receipts::status.eq(ReceiptStatus::Pending.to_string()))
                .set((
                    payment_receipts::status.eq(ReceiptStatus::Approved.to_string()),
                    payment_receipts::approved_by.eq(approver_id),
                    payment_receipts::approved_at.eq(now),
                    payment_receipts::rejected_by.eq(None::<Uuid>),
                    payment_receipts::rejected_at.eq(None::<chrono::DateTime<Utc>>),
                    payment_receipts::rejection_reason.eq(None::<String>),
                    payment_receipts::rejection_comment.eq(None::<String>),
                ))
                .execute(tx)?;

            if claimed == 0 {
                return Ok(None);
            }

            let plan_id: Uuid = insert_into(active_plans::table)
                .values(&plan)
                .returning(active_plans::id)
                .get_result::<Uuid>(tx)?;

            update(payment_receipts::table)
                .filter(payment_receipts::id.eq(receipt_id))
                .set(payment_receipts::active_plan_id.eq(plan_id))
                .execute(tx)?;

            Ok(Some(plan_id))
        })?;

        Ok(result)
    }

    async fn reject_pending(
        &self,
        receipt_id: Uuid,
        rejecter_id: Uuid,
        reason: RejectionReason,
        comment: Option<String>,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rejected = update(payment_receipts::table)
            .filter(payment_receipts::id.eq(receipt_id))
            .filter(payment_receipts::status.eq(ReceiptStatus::Pending.to_string()))
            .set((
                payment_receipts::status.eq(ReceiptStatus::Rejected.to_string()),
                payment_receipts::rejected_by.eq(rejecter_id),
                payment_receipts::rejected_at.eq(Utc::now()),
                payment_receipts::rejection_reason.eq(reason.to_string()),
                payment_receipts::rejection_comment.eq(comment),
                payment_receipts::approved_by.eq(None::<Uuid>),
                payment_receipts::approved_at.eq(None::<chrono::DateTime<Utc>>),
            ))
            .execute(&mut conn)?;

        Ok(rejected > 0)
    }

    async fn list_page(
        &self,
        status: Option<ReceiptStatus>,
        cursor: Option<PageCursor>,
        page_size: i64,
    ) -> Result<Vec<PaymentReceiptEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = payment_receipts::table
            .select(PaymentReceiptEntity::as_select())
            .into_boxed();

        if let Some(status) = status {
            query = query.filter(payment_receipts::status.eq(status.to_string()));
        }

        if let Some(cursor) = cursor {
            query = query.filter(
                payment_receipts::created_at.lt(cursor.created_at).or(
                    payment_receipts::created_at
                        .eq(cursor.created_at)
                        .and(payment_receipts::id.lt(cursor.id)),
                ),
            );
        }

        let results = query
            .order((
                payment_receipts::created_at.desc(),
                payment_receipts::id.desc(),
            ))
            .limit(page_size)
            .load::<PaymentReceiptEntity>(&mut conn)?;

        Ok(results)
    }
}
