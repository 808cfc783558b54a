use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::enums::plan_types::{AdvertisingType, PlanType, VideoMode};

/// Type-specific plan terms, tagged by `plan_type`. This is the snapshot of
/// the plan catalog entry that gets embedded on a receipt at purchase time
/// and copied onto the ActivePlan at approval time, so later catalog edits
/// never affect sold plans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "plan_type", rename_all = "snake_case")]
pub enum PlanTerms {
    Advertising {
        advertising_type: AdvertisingType,
        advertising_position: String,
        days_enabled: i32,
    },
    Video {
        #[serde(flatten)]
        mode: VideoTerms,
    },
    Lives {
        lives_duration_minutes: i32,
    },
}

impl PlanTerms {
    pub fn plan_type(&self) -> PlanType {
        match self {
            PlanTerms::Advertising { .. } => PlanType::Advertising,
            PlanTerms::Video { .. } => PlanType::Video,
            PlanTerms::Lives { .. } => PlanType::Lives,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "video_mode", rename_all = "snake_case")]
pub enum VideoTerms {
    VideoCount { video_count: i32 },
    TimePool { total_duration_seconds: i32 },
}

impl VideoTerms {
    pub fn mode(&self) -> VideoMode {
        match self {
            VideoTerms::VideoCount { .. } => VideoMode::VideoCount,
            VideoTerms::TimePool { .. } => VideoMode::TimePool,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanSummary {
    pub name: String,
    pub price_minor: i64,
    #[serde(flatten)]
    pub terms: PlanTerms,
}

/// Product snapshot attached to a product-advertising plan on assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignedProduct {
    pub id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
}
