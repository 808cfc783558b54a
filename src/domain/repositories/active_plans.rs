use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{
    entities::active_plans::ActivePlanEntity,
    value_objects::{active_plans::UsageIncrement, enums::active_plan_statuses::ActivePlanStatus},
};

#[async_trait]
#[automock]
pub trait ActivePlanRepository {
    async fn find_by_id(&self, plan_id: Uuid) -> Result<Option<ActivePlanEntity>>;

    async fn list_by_seller(&self, seller_id: Uuid) -> Result<Vec<ActivePlanEntity>>;

    async fn list_by_status(&self, status: ActivePlanStatus) -> Result<Vec<ActivePlanEntity>>;

    /// Moves an advertising plan to `active` with the given window. Only
    /// valid from `pending_assignment` or `scheduled`; `false` otherwise.
    async fn set_active(
        &self,
        plan_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<bool>;

    /// Same window computation but for a future start; status `scheduled`.
    async fn set_scheduled(
        &self,
        plan_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<bool>;

    async fn set_assigned_product(
        &self,
        plan_id: Uuid,
        product: Value,
        status: ActivePlanStatus,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<bool>;

    /// Atomically increments `days_used`; forces `expired` in the same
    /// transaction once the cap is reached. `None` when the plan is not an
    /// active advertising plan.
    async fn increment_days_used(&self, plan_id: Uuid) -> Result<Option<UsageIncrement>>;

    /// Sweep: every active advertising plan whose end date has passed is
    /// forced to `expired`. Returns the ids of the plans that transitioned.
    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>>;

    /// `cancelled` from any non-terminal state; `false` when terminal or
    /// missing.
    async fn cancel(&self, plan_id: Uuid, now: DateTime<Utc>) -> Result<bool>;
}
