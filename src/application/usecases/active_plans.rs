use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::active_plans::ActivePlanEntity,
    repositories::active_plans::ActivePlanRepository,
    value_objects::{
        active_plans::{ActivePlanModel, UsageIncrement},
        enums::{
            active_plan_statuses::ActivePlanStatus,
            plan_types::{AdvertisingType, PlanType},
        },
        plans::AssignedProduct,
    },
};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("plan not found")]
    NotFound,
    #[error("plan is not an advertising plan")]
    NotAdvertising,
    #[error("plan cannot be activated from its current state")]
    NotActivatable,
    #[error("product assignment requires a product advertising plan")]
    NotProductAdvertising,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PlanError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PlanError::NotFound => StatusCode::NOT_FOUND,
            PlanError::NotActivatable => StatusCode::CONFLICT,
            PlanError::NotAdvertising | PlanError::NotProductAdvertising => {
                StatusCode::BAD_REQUEST
            }
            PlanError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type PlanResult<T> = std::result::Result<T, PlanError>;

pub struct ActivePlanUseCase<A>
where
    A: ActivePlanRepository + Send + Sync,
{
    plan_repo: Arc<A>,
}

impl<A> ActivePlanUseCase<A>
where
    A: ActivePlanRepository + Send + Sync,
{
    pub fn new(plan_repo: Arc<A>) -> Self {
        Self { plan_repo }
    }

    pub async fn get(&self, plan_id: Uuid) -> PlanResult<ActivePlanModel> {
        let entity = self.load(plan_id).await?;
        ActivePlanModel::try_from(entity).map_err(PlanError::Internal)
    }

    pub async fn list_by_seller(&self, seller_id: Uuid) -> PlanResult<Vec<ActivePlanModel>> {
        let entities = self
            .plan_repo
            .list_by_seller(seller_id)
            .await
            .map_err(|err| {
                error!(%seller_id, db_error = ?err, "active_plans: failed to list seller plans");
                PlanError::Internal(err)
            })?;
        entities
            .into_iter()
            .map(ActivePlanModel::try_from)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(PlanError::Internal)
    }

    pub async fn list_by_status(
        &self,
        status: ActivePlanStatus,
    ) -> PlanResult<Vec<ActivePlanModel>> {
        let entities = self
            .plan_repo
            .list_by_status(status)
            .await
            .map_err(|err| {
                error!(%status, db_error = ?err, "active_plans: failed to list plans by status");
                PlanError::Internal(err)
            })?;
        entities
            .into_iter()
            .map(ActivePlanModel::try_from)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(PlanError::Internal)
    }

    /// Starts an advertising plan now: `end_date = now + days_enabled` days,
    /// status `active`.
    pub async fn activate(&self, plan_id: Uuid) -> PlanResult<DateTime<Utc>> {
        let start = Utc::now();
        let end = self.advertising_window(plan_id, start).await?;

        let activated = self
            .plan_repo
            .set_active(plan_id, start, end)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "active_plans: activation failed");
                PlanError::Internal(err)
            })?;

        if !activated {
            warn!(%plan_id, "active_plans: plan not activatable from current state");
            return Err(PlanError::NotActivatable);
        }

        info!(%plan_id, end_date = %end, "active_plans: plan activated");
        Ok(end)
    }

    /// Same window computation as [`activate`] but against a future start.
    pub async fn schedule(
        &self,
        plan_id: Uuid,
        start_date: DateTime<Utc>,
    ) -> PlanResult<DateTime<Utc>> {
        let end = self.advertising_window(plan_id, start_date).await?;

        let scheduled = self
            .plan_repo
            .set_scheduled(plan_id, start_date, end)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "active_plans: scheduling failed");
                PlanError::Internal(err)
            })?;

        if !scheduled {
            warn!(%plan_id, "active_plans: plan not schedulable from current state");
            return Err(PlanError::NotActivatable);
        }

        info!(%plan_id, start_date = %start_date, end_date = %end, "active_plans: plan scheduled");
        Ok(end)
    }

    /// Attaches the advertised product to a product-advertising plan, then
    /// either activates it immediately or leaves it scheduled for later.
    pub async fn assign_product(
        &self,
        plan_id: Uuid,
        product: AssignedProduct,
        activate_immediately: bool,
    ) -> PlanResult<()> {
        let entity = self.load(plan_id).await?;
        self.ensure_advertising(&entity)?;

        let advertising_type = entity
            .advertising_type
            .as_deref()
            .and_then(AdvertisingType::from_str);
        if advertising_type != Some(AdvertisingType::Product) {
            warn!(%plan_id, "active_plans: product assignment on non-product plan");
            return Err(PlanError::NotProductAdvertising);
        }

        let product_value =
            serde_json::to_value(&product).map_err(|err| PlanError::Internal(err.into()))?;

        let (status, start, end) = if activate_immediately {
            let start = Utc::now();
            let end = window_end(start, entity.days_enabled.unwrap_or(0));
            (ActivePlanStatus::Active, Some(start), Some(end))
        } else {
            (ActivePlanStatus::Scheduled, None, None)
        };

        let assigned = self
            .plan_repo
            .set_assigned_product(plan_id, product_value, status, start, end)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "active_plans: product assignment failed");
                PlanError::Internal(err)
            })?;

        if !assigned {
            warn!(%plan_id, "active_plans: plan not assignable from current state");
            return Err(PlanError::NotActivatable);
        }

        info!(
            %plan_id,
            product_id = %product.id,
            status = %status,
            "active_plans: product assigned"
        );
        Ok(())
    }

    /// Burns one advertising day. The repository increments and, once the
    /// cap is reached, expires the plan in the same transaction.
    pub async fn increment_days_used(&self, plan_id: Uuid) -> PlanResult<UsageIncrement> {
        let usage = self
            .plan_repo
            .increment_days_used(plan_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "active_plans: usage increment failed");
                PlanError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%plan_id, "active_plans: no active advertising plan to increment");
                PlanError::NotActivatable
            })?;

        info!(
            %plan_id,
            days_used = usage.days_used,
            days_enabled = usage.days_enabled,
            expired = usage.expired,
            "active_plans: day consumed"
        );
        Ok(usage)
    }

    /// Sweep over active advertising plans whose window has closed. Only
    /// fires when invoked; plans past their end date stay `active` until the
    /// next call.
    pub async fn check_and_expire_plans(&self) -> PlanResult<Vec<Uuid>> {
        let now = Utc::now();
        let expired = self.plan_repo.expire_overdue(now).await.map_err(|err| {
            error!(db_error = ?err, "active_plans: expiry sweep failed");
            PlanError::Internal(err)
        })?;

        info!(expired_count = expired.len(), "active_plans: expiry sweep completed");
        Ok(expired)
    }

    pub async fn cancel(&self, plan_id: Uuid) -> PlanResult<()> {
        self.load(plan_id).await?;

        let cancelled = self
            .plan_repo
            .cancel(plan_id, Utc::now())
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "active_plans: cancellation failed");
                PlanError::Internal(err)
            })?;

        if !cancelled {
            warn!(%plan_id, "active_plans: plan already terminal");
            return Err(PlanError::NotActivatable);
        }

        info!(%plan_id, "active_plans: plan cancelled");
        Ok(())
    }

    async fn load(&self, plan_id: Uuid) -> PlanResult<ActivePlanEntity> {
        self.plan_repo
            .find_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "active_plans: failed to load plan");
                PlanError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%plan_id, "active_plans: plan not found");
                PlanError::NotFound
            })
    }

    fn ensure_advertising(&self, entity: &ActivePlanEntity) -> PlanResult<()> {
        match PlanType::from_str(&entity.plan_type) {
            Some(PlanType::Advertising) => Ok(()),
            Some(PlanType::Video) | Some(PlanType::Lives) | None => {
                warn!(plan_id = %entity.id, plan_type = %entity.plan_type, "active_plans: not an advertising plan");
                Err(PlanError::NotAdvertising)
            }
        }
    }

    async fn advertising_window(
        &self,
        plan_id: Uuid,
        start: DateTime<Utc>,
    ) -> PlanResult<DateTime<Utc>> {
        let entity = self.load(plan_id).await?;
        self.ensure_advertising(&entity)?;
        Ok(window_end(start, entity.days_enabled.unwrap_or(0)))
    }
}

fn window_end(start: DateTime<Utc>, days_enabled: i32) -> DateTime<Utc> {
    start + Duration::days(i64::from(days_enabled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn advertising_plan(plan_id: Uuid, days_enabled: i32, days_used: i32) -> ActivePlanEntity {
        ActivePlanEntity {
            id: plan_id,
            seller_id: Uuid::new_v4(),
            seller_name: "Tienda Flor".to_string(),
            receipt_id: Uuid::new_v4(),
            plan_name: "Destacado".to_string(),
            plan_type: "advertising".to_string(),
            amount_minor: 150_000,
            status: ActivePlanStatus::PendingAssignment.to_string(),
            advertising_type: Some("product".to_string()),
            advertising_position: Some("home_top".to_string()),
            days_enabled: Some(days_enabled),
            days_used: Some(days_used),
            banner_image: None,
            assigned_product: None,
            start_date: None,
            end_date: None,
            video_mode: None,
            video_count: None,
            videos_used: None,
            total_duration_seconds: None,
            total_seconds_used: None,
            lives_duration_minutes: None,
            lives_used: None,
            cancelled_at: None,
            created_at: Utc::now(),
        }
    }

    use crate::domain::repositories::active_plans::MockActivePlanRepository;

    #[tokio::test]
    async fn activation_computes_a_days_enabled_window() {
        let plan_id = Uuid::new_v4();
        let mut plan_repo = MockActivePlanRepository::new();

        let plan = advertising_plan(plan_id, 7, 0);
        plan_repo.expect_find_by_id().returning(move |_| {
            let plan = plan.clone();
            Box::pin(async move { Ok(Some(plan)) })
        });
        plan_repo
            .expect_set_active()
            .withf(|_, start, end| *end == *start + Duration::days(7))
            .returning(|_, _, _| Box::pin(async { Ok(true) }));

        let usecase = ActivePlanUseCase::new(Arc::new(plan_repo));
        usecase.activate(plan_id).await.unwrap();
    }

    #[tokio::test]
    async fn video_plan_cannot_be_activated() {
        let plan_id = Uuid::new_v4();
        let mut plan_repo = MockActivePlanRepository::new();

        let mut plan = advertising_plan(plan_id, 0, 0);
        plan.plan_type = "video".to_string();
        plan.video_mode = Some("video_count".to_string());
        plan_repo.expect_find_by_id().returning(move |_| {
            let plan = plan.clone();
            Box::pin(async move { Ok(Some(plan)) })
        });

        let usecase = ActivePlanUseCase::new(Arc::new(plan_repo));
        let result = usecase.activate(plan_id).await;

        assert!(matches!(result, Err(PlanError::NotAdvertising)));
    }

    #[tokio::test]
    async fn increment_passes_through_expiry_at_the_cap() {
        let plan_id = Uuid::new_v4();
        let mut plan_repo = MockActivePlanRepository::new();

        plan_repo
            .expect_increment_days_used()
            .with(eq(plan_id))
            .returning(|_| {
                Box::pin(async {
                    Ok(Some(UsageIncrement {
                        days_used: 30,
                        days_enabled: 30,
                        expired: true,
                    }))
                })
            });

        let usecase = ActivePlanUseCase::new(Arc::new(plan_repo));
        let usage = usecase.increment_days_used(plan_id).await.unwrap();

        assert_eq!(usage.days_used, 30);
        assert!(usage.days_used <= usage.days_enabled);
        assert!(usage.expired);
    }

    #[tokio::test]
    async fn banner_plan_rejects_product_assignment() {
        let plan_id = Uuid::new_v4();
        let mut plan_repo = MockActivePlanRepository::new();

        let mut plan = advertising_plan(plan_id, 7, 0);
        plan.advertising_type = Some("banner".to_string());
        plan_repo.expect_find_by_id().returning(move |_| {
            let plan = plan.clone();
            Box::pin(async move { Ok(Some(plan)) })
        });

        let usecase = ActivePlanUseCase::new(Arc::new(plan_repo));
        let product = AssignedProduct {
            id: Uuid::new_v4(),
            name: "Cafetera".to_string(),
            image_url: None,
        };
        let result = usecase.assign_product(plan_id, product, true).await;

        assert!(matches!(result, Err(PlanError::NotProductAdvertising)));
    }

    #[tokio::test]
    async fn sweep_returns_only_expired_plan_ids() {
        let overdue = vec![Uuid::new_v4(), Uuid::new_v4()];
        let expected = overdue.clone();

        let mut plan_repo = MockActivePlanRepository::new();
        plan_repo.expect_expire_overdue().returning(move |_| {
            let overdue = overdue.clone();
            Box::pin(async move { Ok(overdue) })
        });

        let usecase = ActivePlanUseCase::new(Arc::new(plan_repo));
        let expired = usecase.check_and_expire_plans().await.unwrap();

        assert_eq!(expired, expected);
    }
}
