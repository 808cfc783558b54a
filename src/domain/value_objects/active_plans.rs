use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::active_plans::ActivePlanEntity,
    value_objects::{
        enums::{
            active_plan_statuses::ActivePlanStatus,
            plan_types::{AdvertisingType, PlanType, VideoMode},
        },
        plans::AssignedProduct,
        receipts::EvidenceImage,
    },
};

/// Percentage of an advertising plan consumed, rounded and clamped to
/// [0, 100]. Zero-day plans report 0 rather than dividing by zero.
pub fn advertising_progress(days_used: i32, days_enabled: i32) -> u8 {
    if days_enabled <= 0 {
        return 0;
    }
    let ratio = f64::from(days_used.max(0)) / f64::from(days_enabled);
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Counters returned by an atomic `days_used` increment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageIncrement {
    pub days_used: i32,
    pub days_enabled: i32,
    pub expired: bool,
}

/// Type-specific entitlement state of an active plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "plan_type", rename_all = "snake_case")]
pub enum PlanUsage {
    Advertising {
        advertising_type: AdvertisingType,
        advertising_position: String,
        days_enabled: i32,
        days_used: i32,
        banner_image: Option<EvidenceImage>,
        assigned_product: Option<AssignedProduct>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    },
    Video {
        video_mode: VideoMode,
        video_count: Option<i32>,
        videos_used: Option<i32>,
        total_duration_seconds: Option<i32>,
        total_seconds_used: Option<i32>,
    },
    Lives {
        lives_duration_minutes: i32,
        lives_used: i32,
    },
}

impl PlanUsage {
    pub fn plan_type(&self) -> PlanType {
        match self {
            PlanUsage::Advertising { .. } => PlanType::Advertising,
            PlanUsage::Video { .. } => PlanType::Video,
            PlanUsage::Lives { .. } => PlanType::Lives,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivePlanModel {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub seller_name: String,
    pub receipt_id: Uuid,
    pub plan_name: String,
    pub amount_minor: i64,
    pub status: ActivePlanStatus,
    pub usage: PlanUsage,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ActivePlanModel {
    pub fn progress(&self) -> Option<u8> {
        match &self.usage {
            PlanUsage::Advertising {
                days_used,
                days_enabled,
                ..
            } => Some(advertising_progress(*days_used, *days_enabled)),
            PlanUsage::Video { .. } | PlanUsage::Lives { .. } => None,
        }
    }
}

impl TryFrom<ActivePlanEntity> for ActivePlanModel {
    type Error = anyhow::Error;

    fn try_from(entity: ActivePlanEntity) -> Result<Self, Self::Error> {
        let plan_type = PlanType::from_str(&entity.plan_type)
            .with_context(|| format!("unknown plan type: {}", entity.plan_type))?;
        let status = ActivePlanStatus::from_str(&entity.status)
            .with_context(|| format!("unknown active plan status: {}", entity.status))?;

        let usage = match plan_type {
            PlanType::Advertising => PlanUsage::Advertising {
                advertising_type: entity
                    .advertising_type
                    .as_deref()
                    .and_then(AdvertisingType::from_str)
                    .ok_or_else(|| anyhow!("advertising plan missing advertising type"))?,
                advertising_position: entity
                    .advertising_position
                    .ok_or_else(|| anyhow!("advertising plan missing position"))?,
                days_enabled: entity
                    .days_enabled
                    .ok_or_else(|| anyhow!("advertising plan missing days_enabled"))?,
                days_used: entity.days_used.unwrap_or(0),
                banner_image: entity
                    .banner_image
                    .map(serde_json::from_value)
                    .transpose()
                    .context("malformed banner image on active plan")?,
                assigned_product: entity
                    .assigned_product
                    .map(serde_json::from_value)
                    .transpose()
                    .context("malformed assigned product on active plan")?,
                start_date: entity.start_date,
                end_date: entity.end_date,
            },
            PlanType::Video => PlanUsage::Video {
                video_mode: entity
                    .video_mode
                    .as_deref()
                    .and_then(VideoMode::from_str)
                    .ok_or_else(|| anyhow!("video plan missing video mode"))?,
                video_count: entity.video_count,
                videos_used: entity.videos_used,
                total_duration_seconds: entity.total_duration_seconds,
                total_seconds_used: entity.total_seconds_used,
            },
            PlanType::Lives => PlanUsage::Lives {
                lives_duration_minutes: entity
                    .lives_duration_minutes
                    .ok_or_else(|| anyhow!("lives plan missing duration"))?,
                lives_used: entity.lives_used.unwrap_or(0),
            },
        };

        Ok(ActivePlanModel {
            id: entity.id,
            seller_id: entity.seller_id,
            seller_name: entity.seller_name,
            receipt_id: entity.receipt_id,
            plan_name: entity.plan_name,
            amount_minor: entity.amount_minor,
            status,
            usage,
            cancelled_at: entity.cancelled_at,
            created_at: entity.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_rounds_and_clamps() {
        assert_eq!(advertising_progress(0, 30), 0);
        assert_eq!(advertising_progress(15, 30), 50);
        assert_eq!(advertising_progress(29, 30), 97);
        assert_eq!(advertising_progress(30, 30), 100);
        assert_eq!(advertising_progress(45, 30), 100);
        assert_eq!(advertising_progress(-3, 30), 0);
    }

    #[test]
    fn progress_of_zero_day_plan_is_zero() {
        assert_eq!(advertising_progress(0, 0), 0);
        assert_eq!(advertising_progress(5, 0), 0);
    }
}
