use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{prelude::*, update};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{
    entities::active_plans::ActivePlanEntity,
    repositories::active_plans::ActivePlanRepository,
    value_objects::{
        active_plans::UsageIncrement,
        enums::{active_plan_statuses::ActivePlanStatus, plan_types::PlanType},
    },
};
use crate::infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::active_plans};

pub struct ActivePlanPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ActivePlanPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn startable_statuses() -> [String; 2] {
    [
        ActivePlanStatus::PendingAssignment.to_string(),
        ActivePlanStatus::Scheduled.to_string(),
    ]
}

#[async_trait]
impl ActivePlanRepository for ActivePlanPostgres {
    async fn find_by_id(&self, plan_id: Uuid) -> Result<Option<ActivePlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = active_plans::table
            .filter(active_plans::id.eq(plan_id))
            .select(ActivePlanEntity::as_select())
            .first::<ActivePlanEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_by_seller(&self, seller_id: Uuid) -> Result<Vec<ActivePlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = active_plans::table
            .filter(active_plans::seller_id.eq(seller_id))
            .select(ActivePlanEntity::as_select())
            .order(active_plans::created_at.desc())
            .load::<ActivePlanEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_by_status(&self, status: ActivePlanStatus) -> Result<Vec<ActivePlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = active_plans::table
            .filter(active_plans::status.eq(status.to_string()))
            .select(ActivePlanEntity::as_select())
            .order(active_plans::created_at.desc())
            .load::<ActivePlanEntity>(&mut conn)?;

        Ok(results)
    }

    async fn set_active(
        &self,
        plan_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let activated = update(active_plans::table)
            .filter(active_plans::id.eq(plan_id))
            .filter(active_plans::status.eq_any(startable_statuses()))
            .set((
                active_plans::status.eq(ActivePlanStatus::Active.to_string()),
                active_plans::start_date.eq(start_date),
                active_plans::end_date.eq(end_date),
            ))
            .execute(&mut conn)?;

        Ok(activated > 0)
    }

    async fn set_scheduled(
        &self,
        plan_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let scheduled = update(active_plans::table)
            .filter(active_plans::id.eq(plan_id))
            .filter(active_plans::status.eq_any(startable_statuses()))
            .set((
                active_plans::status.eq(ActivePlanStatus::Scheduled.to_string()),
                active_plans::start_date.eq(start_date),
                active_plans::end_date.eq(end_date),
            ))
            .execute(&mut conn)?;

        Ok(scheduled > 0)
    }

    async fn set_assigned_product(
        &self,
        plan_id: Uuid,
        product: Value,
        status: ActivePlanStatus,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let assigned = update(active_plans::table)
            .filter(active_plans::id.eq(plan_id))
            .filter(active_plans::status.eq_any(startable_statuses()))
            .set((
                active_plans::assigned_product.eq(product),
                active_plans::status.eq(status.to_string()),
                active_plans::start_date.eq(start_date),
                active_plans::end_date.eq(end_date),
            ))
            .execute(&mut conn)?;

        Ok(assigned > 0)
    }

    async fn increment_days_used(&self, plan_id: Uuid) -> Result<Option<UsageIncrement>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<Option<UsageIncrement>, diesel::result::Error, _>(|tx| {
            // Guarded by `days_used < days_enabled` so a plan already at the
            // cap never overshoots.
            let counters = update(active_plans::table)
                .filter(active_plans::id.eq(plan_id))
                .filter(active_plans::status.eq(ActivePlanStatus::Active.to_string()))
                .filter(active_plans::plan_type.eq(PlanType::Advertising.to_string()))
                .filter(active_plans::days_used.lt(active_plans::days_enabled))
                .set(active_plans::days_used.eq(active_plans::days_used + 1))
                .returning((active_plans::days_used, active_plans::days_enabled))
                .get_result::<(Option<i32>, Option<i32>)>(tx)
                .optional()?;

            let Some((days_used, days_enabled)) = counters else {
                return Ok(None);
            };
            let days_used = days_used.unwrap_or(0);
            let days_enabled = days_enabled.unwrap_or(0);

            let expired = days_used >= days_enabled;
            if expired {
                update(active_plans::table)
                    .filter(active_plans::id.eq(plan_id))
                    .set(active_plans::status.eq(ActivePlanStatus::Expired.to_string()))
                    .execute(tx)?;
            }

            Ok(Some(UsageIncrement {
                days_used,
                days_enabled,
                expired,
            }))
        })?;

        Ok(result)
    }

    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let expired = update(active_plans::table)
            .filter(active_plans::status.eq(ActivePlanStatus::Active.to_string()))
            .filter(active_plans::end_date.le(now))
            .set(active_plans::status.eq(ActivePlanStatus::Expired.to_string()))
            .returning(active_plans::id)
            .get_results::<Uuid>(&mut conn)?;

        Ok(expired)
    }

    async fn cancel(&self, plan_id: Uuid, now: DateTime<Utc>) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let terminal = [
            ActivePlanStatus::Expired.to_string(),
            ActivePlanStatus::Cancelled.to_string(),
        ];
        let cancelled = update(active_plans::table)
            .filter(active_plans::id.eq(plan_id))
            .filter(active_plans::status.ne_all(terminal))
            .set((
                active_plans::status.eq(ActivePlanStatus::Cancelled.to_string()),
                active_plans::cancelled_at.eq(now),
            ))
            .execute(&mut conn)?;

        Ok(cancelled > 0)
    }
}
