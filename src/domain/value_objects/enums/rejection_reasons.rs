use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    Illegible,
    IncorrectData,
    Duplicate,
    AmountMismatch,
    Other,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::Illegible => "illegible",
            RejectionReason::IncorrectData => "incorrect_data",
            RejectionReason::Duplicate => "duplicate",
            RejectionReason::AmountMismatch => "amount_mismatch",
            RejectionReason::Other => "other",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "illegible" => Some(RejectionReason::Illegible),
            "incorrect_data" => Some(RejectionReason::IncorrectData),
            "duplicate" => Some(RejectionReason::Duplicate),
            "amount_mismatch" => Some(RejectionReason::AmountMismatch),
            "other" => Some(RejectionReason::Other),
            _ => None,
        }
    }

    /// `other` must be accompanied by a free-text comment.
    pub fn requires_comment(&self) -> bool {
        matches!(self, RejectionReason::Other)
    }
}

impl Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
