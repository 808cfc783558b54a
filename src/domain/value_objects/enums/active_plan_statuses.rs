use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivePlanStatus {
    #[default]
    PendingAssignment,
    Scheduled,
    Active,
    Expired,
    Cancelled,
}

impl ActivePlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivePlanStatus::PendingAssignment => "pending_assignment",
            ActivePlanStatus::Scheduled => "scheduled",
            ActivePlanStatus::Active => "active",
            ActivePlanStatus::Expired => "expired",
            ActivePlanStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending_assignment" => Some(ActivePlanStatus::PendingAssignment),
            "scheduled" => Some(ActivePlanStatus::Scheduled),
            "active" => Some(ActivePlanStatus::Active),
            "expired" => Some(ActivePlanStatus::Expired),
            "cancelled" => Some(ActivePlanStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ActivePlanStatus::Expired | ActivePlanStatus::Cancelled)
    }
}

impl Display for ActivePlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
