use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{
        order_payment_receipts::OrderPaymentReceiptEntity,
        payment_receipts::PaymentReceiptEntity, wallet_transactions::WalletTransactionEntity,
    },
    value_objects::{
        enums::{
            receipt_statuses::ReceiptStatus, rejection_reasons::RejectionReason,
            wallet_statuses::WalletTransactionStatus,
        },
        plans::PlanSummary,
    },
};

/// Embedded snapshot of the paying party (seller or customer).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartySummary {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Uploaded proof-of-payment image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvidenceImage {
    pub url: String,
    pub path: String,
    pub size_bytes: i64,
    pub mime: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RejectionDetails {
    pub rejected_by: Uuid,
    pub rejected_at: DateTime<Utc>,
    pub reason: RejectionReason,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApprovalDetails {
    pub approved_by: Uuid,
    pub approved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReceiptModel {
    pub id: Uuid,
    pub buyer: PartySummary,
    pub plan: PlanSummary,
    pub amount_minor: i64,
    pub image: EvidenceImage,
    pub banner_image: Option<EvidenceImage>,
    pub status: ReceiptStatus,
    pub approval: Option<ApprovalDetails>,
    pub rejection: Option<RejectionDetails>,
    pub active_plan_id: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPaymentReceiptModel {
    pub id: Uuid,
    pub buyer: PartySummary,
    pub order_id: Uuid,
    pub order_number: String,
    pub amount_minor: i64,
    pub image: EvidenceImage,
    pub status: ReceiptStatus,
    pub approval: Option<ApprovalDetails>,
    pub rejection: Option<RejectionDetails>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletTransactionModel {
    pub id: Uuid,
    pub user: PartySummary,
    pub description: Option<String>,
    pub amount_minor: i64,
    pub image: EvidenceImage,
    pub status: WalletTransactionStatus,
    pub approval: Option<ApprovalDetails>,
    pub rejection: Option<RejectionDetails>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Request body for a new plan-purchase receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitPaymentReceiptModel {
    pub buyer: PartySummary,
    pub plan: PlanSummary,
    pub image: EvidenceImage,
    pub banner_image: Option<EvidenceImage>,
}

/// Request body for a new order-payment receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitOrderPaymentReceiptModel {
    pub buyer: PartySummary,
    pub order_id: Uuid,
    pub order_number: String,
    pub amount_minor: i64,
    pub image: EvidenceImage,
}

/// Request body for a new wallet top-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitWalletTopUpModel {
    pub user: PartySummary,
    pub description: Option<String>,
    pub amount_minor: i64,
    pub image: EvidenceImage,
}

/// Request body shared by the reject endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectReceiptModel {
    pub reason: RejectionReason,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptPage<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub has_more: bool,
}

fn rejection_details(
    rejected_by: Option<Uuid>,
    rejected_at: Option<DateTime<Utc>>,
    reason: Option<&str>,
    comment: Option<String>,
) -> Option<RejectionDetails> {
    let (rejected_by, rejected_at) = rejected_by.zip(rejected_at)?;
    let reason = reason.and_then(RejectionReason::from_str)?;
    Some(RejectionDetails {
        rejected_by,
        rejected_at,
        reason,
        comment,
    })
}

fn approval_details(
    approved_by: Option<Uuid>,
    approved_at: Option<DateTime<Utc>>,
) -> Option<ApprovalDetails> {
    let (approved_by, approved_at) = approved_by.zip(approved_at)?;
    Some(ApprovalDetails {
        approved_by,
        approved_at,
    })
}

impl TryFrom<PaymentReceiptEntity> for PaymentReceiptModel {
    type Error = anyhow::Error;

    fn try_from(entity: PaymentReceiptEntity) -> Result<Self, Self::Error> {
        let plan: PlanSummary = serde_json::from_value(entity.plan_summary)
            .context("malformed plan summary on payment receipt")?;
        let banner_image = entity
            .banner_image
            .map(serde_json::from_value)
            .transpose()
            .context("malformed banner image on payment receipt")?;
        let status = ReceiptStatus::from_str(&entity.status)
            .with_context(|| format!("unknown receipt status: {}", entity.status))?;

        Ok(PaymentReceiptModel {
            id: entity.id,
            buyer: PartySummary {
                id: entity.buyer_id,
                name: entity.buyer_name,
                avatar_url: entity.buyer_avatar_url,
            },
            plan,
            amount_minor: entity.amount_minor,
            image: EvidenceImage {
                url: entity.image_url,
                path: entity.image_path,
                size_bytes: entity.image_size_bytes,
                mime: entity.image_mime,
            },
            banner_image,
            status,
            approval: approval_details(entity.approved_by, entity.approved_at),
            rejection: rejection_details(
                entity.rejected_by,
                entity.rejected_at,
                entity.rejection_reason.as_deref(),
                entity.rejection_comment,
            ),
            active_plan_id: entity.active_plan_id,
            created_by: entity.created_by,
            created_at: entity.created_at,
        })
    }
}

impl TryFrom<OrderPaymentReceiptEntity> for OrderPaymentReceiptModel {
    type Error = anyhow::Error;

    fn try_from(entity: OrderPaymentReceiptEntity) -> Result<Self, Self::Error> {
        let status = ReceiptStatus::from_str(&entity.status)
            .with_context(|| format!("unknown receipt status: {}", entity.status))?;

        Ok(OrderPaymentReceiptModel {
            id: entity.id,
            buyer: PartySummary {
                id: entity.buyer_id,
                name: entity.buyer_name,
                avatar_url: entity.buyer_avatar_url,
            },
            order_id: entity.order_id,
            order_number: entity.order_number,
            amount_minor: entity.amount_minor,
            image: EvidenceImage {
                url: entity.image_url,
                path: entity.image_path,
                size_bytes: entity.image_size_bytes,
                mime: entity.image_mime,
            },
            status,
            approval: approval_details(entity.approved_by, entity.approved_at),
            rejection: rejection_details(
                entity.rejected_by,
                entity.rejected_at,
                entity.rejection_reason.as_deref(),
                entity.rejection_comment,
            ),
            created_by: entity.created_by,
            created_at: entity.created_at,
        })
    }
}

impl TryFrom<WalletTransactionEntity> for WalletTransactionModel {
    type Error = anyhow::Error;

    fn try_from(entity: WalletTransactionEntity) -> Result<Self, Self::Error> {
        let status = WalletTransactionStatus::from_str(&entity.status)
            .with_context(|| format!("unknown wallet transaction status: {}", entity.status))?;

        Ok(WalletTransactionModel {
            id: entity.id,
            user: PartySummary {
                id: entity.user_id,
                name: entity.user_name,
                avatar_url: entity.user_avatar_url,
            },
            description: entity.description,
            amount_minor: entity.amount_minor,
            image: EvidenceImage {
                url: entity.image_url,
                path: entity.image_path,
                size_bytes: entity.image_size_bytes,
                mime: entity.image_mime,
            },
            status,
            approval: approval_details(entity.approved_by, entity.approved_at),
            rejection: rejection_details(
                entity.rejected_by,
                entity.rejected_at,
                entity.rejection_reason.as_deref(),
                entity.rejection_comment,
            ),
            created_by: entity.created_by,
            created_at: entity.created_at,
        })
    }
}
