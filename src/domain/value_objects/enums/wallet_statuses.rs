use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Wallet top-ups expose `completed`/`failed` as the approved/rejected
/// equivalents, plus `refunded` for credits that were later reversed.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WalletTransactionStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl WalletTransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletTransactionStatus::Pending => "pending",
            WalletTransactionStatus::Completed => "completed",
            WalletTransactionStatus::Failed => "failed",
            WalletTransactionStatus::Refunded => "refunded",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(WalletTransactionStatus::Pending),
            "completed" => Some(WalletTransactionStatus::Completed),
            "failed" => Some(WalletTransactionStatus::Failed),
            "refunded" => Some(WalletTransactionStatus::Refunded),
            _ => None,
        }
    }
}

impl Display for WalletTransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
