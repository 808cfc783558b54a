use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ReceiptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptStatus::Pending => "pending",
            ReceiptStatus::Approved => "approved",
            ReceiptStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ReceiptStatus::Pending),
            "approved" => Some(ReceiptStatus::Approved),
            "rejected" => Some(ReceiptStatus::Rejected),
            _ => None,
        }
    }
}

impl Display for ReceiptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status filter accepted by the paginated receipt listings ("all" selects
/// every status).
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatusFilter {
    #[default]
    All,
    Pending,
    Approved,
    Rejected,
}

impl ReceiptStatusFilter {
    pub fn as_status(&self) -> Option<ReceiptStatus> {
        match self {
            ReceiptStatusFilter::All => None,
            ReceiptStatusFilter::Pending => Some(ReceiptStatus::Pending),
            ReceiptStatusFilter::Approved => Some(ReceiptStatus::Approved),
            ReceiptStatusFilter::Rejected => Some(ReceiptStatus::Rejected),
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "all" => Some(ReceiptStatusFilter::All),
            "pending" => Some(ReceiptStatusFilter::Pending),
            "approved" => Some(ReceiptStatusFilter::Approved),
            "rejected" => Some(ReceiptStatusFilter::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptStatusFilter::All => "all",
            ReceiptStatusFilter::Pending => "pending",
            ReceiptStatusFilter::Approved => "approved",
            ReceiptStatusFilter::Rejected => "rejected",
        }
    }
}

impl Display for ReceiptStatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
