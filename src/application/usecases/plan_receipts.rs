use std::sync::Arc;

use anyhow::anyhow;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::{
        active_plans::InsertActivePlanEntity,
        payment_receipts::{InsertPaymentReceiptEntity, PaymentReceiptEntity},
    },
    repositories::payment_receipts::PaymentReceiptRepository,
    value_objects::{
        enums::{
            active_plan_statuses::ActivePlanStatus,
            receipt_statuses::{ReceiptStatus, ReceiptStatusFilter},
            rejection_reasons::RejectionReason,
        },
        pagination::{CursorLookup, PageCursor, PageTokens},
        plans::{PlanSummary, PlanTerms, VideoTerms},
        receipts::{PaymentReceiptModel, ReceiptPage, SubmitPaymentReceiptModel},
    },
};

#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("receipt not found")]
    NotFound,
    #[error("receipt has already been resolved")]
    NotPending,
    #[error("rejection reason `other` requires a comment")]
    MissingRejectionComment,
    #[error("page {0} has not been reached yet")]
    PageOutOfRange(u32),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ReceiptError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ReceiptError::NotFound => StatusCode::NOT_FOUND,
            ReceiptError::NotPending => StatusCode::CONFLICT,
            ReceiptError::MissingRejectionComment | ReceiptError::PageOutOfRange(_) => {
                StatusCode::BAD_REQUEST
            }
            ReceiptError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type ReceiptResult<T> = std::result::Result<T, ReceiptError>;

/// Validates the reason/comment pairing of a rejection. `other` demands a
/// non-empty comment; every other reason stores no comment at all.
pub fn normalize_rejection_comment(
    reason: RejectionReason,
    comment: Option<String>,
) -> ReceiptResult<Option<String>> {
    if !reason.requires_comment() {
        return Ok(None);
    }
    match comment.map(|c| c.trim().to_string()) {
        Some(trimmed) if !trimmed.is_empty() => Ok(Some(trimmed)),
        _ => Err(ReceiptError::MissingRejectionComment),
    }
}

pub struct PlanReceiptUseCase<R>
where
    R: PaymentReceiptRepository + Send + Sync,
{
    receipt_repo: Arc<R>,
}

impl<R> PlanReceiptUseCase<R>
where
    R: PaymentReceiptRepository + Send + Sync,
{
    pub fn new(receipt_repo: Arc<R>) -> Self {
        Self { receipt_repo }
    }

    /// Records a newly uploaded plan-purchase receipt as `pending`.
    pub async fn submit(&self, model: SubmitPaymentReceiptModel) -> ReceiptResult<Uuid> {
        let plan_summary =
            serde_json::to_value(&model.plan).map_err(|err| ReceiptError::Internal(err.into()))?;
        let banner_image = model
            .banner_image
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|err| ReceiptError::Internal(err.into()))?;

        let insert = InsertPaymentReceiptEntity {
            buyer_id: model.buyer.id,
            buyer_name: model.buyer.name.clone(),
            buyer_avatar_url: model.buyer.avatar_url,
            plan_summary,
            amount_minor: model.plan.price_minor,
            image_url: model.image.url,
            image_path: model.image.path,
            image_size_bytes: model.image.size_bytes,
            image_mime: model.image.mime,
            banner_image,
            status: ReceiptStatus::Pending.to_string(),
            created_by: model.buyer.id,
        };

        let receipt_id = self.receipt_repo.create(insert).await.map_err(|err| {
            error!(db_error = ?err, "plan_receipts: submission failed");
            ReceiptError::Internal(err)
        })?;

        info!(%receipt_id, buyer_id = %model.buyer.id, "plan_receipts: receipt submitted");
        Ok(receipt_id)
    }

    pub async fn get(&self, receipt_id: Uuid) -> ReceiptResult<PaymentReceiptModel> {
        let entity = self
            .receipt_repo
            .find_by_id(receipt_id)
            .await
            .map_err(|err| {
                error!(%receipt_id, db_error = ?err, "plan_receipts: lookup failed");
                ReceiptError::Internal(err)
            })?
            .ok_or(ReceiptError::NotFound)?;

        PaymentReceiptModel::try_from(entity).map_err(ReceiptError::Internal)
    }

    /// Approves a pending plan-purchase receipt. The receipt update and the
    /// derived ActivePlan creation happen in one repository transaction;
    /// returns the id of the created plan.
    pub async fn approve(&self, receipt_id: Uuid, approver_id: Uuid) -> ReceiptResult<Uuid> {
        info!(%receipt_id, %approver_id, "plan_receipts: approval requested");

        let receipt = self
            .receipt_repo
            .find_by_id(receipt_id)
            .await
            .map_err(|err| {
                error!(%receipt_id, db_error = ?err, "plan_receipts: failed to load receipt");
                ReceiptError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%receipt_id, "plan_receipts: receipt not found");
                ReceiptError::NotFound
            })?;

        let summary: PlanSummary =
            serde_json::from_value(receipt.plan_summary.clone()).map_err(|err| {
                error!(
                    %receipt_id,
                    error = %err,
                    "plan_receipts: malformed plan summary on receipt"
                );
                ReceiptError::Internal(anyhow!("malformed plan summary: {err}"))
            })?;

        let plan = derive_plan(&receipt, &summary);

        match self
            .receipt_repo
            .approve_pending_and_create_plan(receipt_id, approver_id, plan)
            .await
            .map_err(|err| {
                error!(
                    %receipt_id,
                    %approver_id,
                    db_error = ?err,
                    "plan_receipts: approval transaction failed"
                );
                ReceiptError::Internal(err)
            })? {
            Some(plan_id) => {
                info!(
                    %receipt_id,
                    %approver_id,
                    %plan_id,
                    plan_type = %summary.terms.plan_type(),
                    "plan_receipts: receipt approved and plan created"
                );
                Ok(plan_id)
            }
            None => {
                warn!(%receipt_id, "plan_receipts: receipt already resolved");
                Err(ReceiptError::NotPending)
            }
        }
    }

    pub async fn reject(
        &self,
        receipt_id: Uuid,
        rejecter_id: Uuid,
        reason: RejectionReason,
        comment: Option<String>,
    ) -> ReceiptResult<()> {
        info!(%receipt_id, %rejecter_id, reason = %reason, "plan_receipts: rejection requested");

        let comment = normalize_rejection_comment(reason, comment).map_err(|err| {
            warn!(%receipt_id, reason = %reason, "plan_receipts: rejection comment missing");
            err
        })?;

        if self
            .receipt_repo
            .find_by_id(receipt_id)
            .await
            .map_err(ReceiptError::Internal)?
            .is_none()
        {
            warn!(%receipt_id, "plan_receipts: receipt not found");
            return Err(ReceiptError::NotFound);
        }

        let rejected = self
            .receipt_repo
            .reject_pending(receipt_id, rejecter_id, reason, comment)
            .await
            .map_err(|err| {
                error!(%receipt_id, db_error = ?err, "plan_receipts: rejection failed");
                ReceiptError::Internal(err)
            })?;

        if !rejected {
            warn!(%receipt_id, "plan_receipts: receipt already resolved");
            return Err(ReceiptError::NotPending);
        }

        info!(%receipt_id, %rejecter_id, reason = %reason, "plan_receipts: receipt rejected");
        Ok(())
    }

    pub async fn list_page(
        &self,
        filter: ReceiptStatusFilter,
        page: u32,
        page_size: u32,
        tokens: &mut PageTokens,
    ) -> ReceiptResult<ReceiptPage<PaymentReceiptModel>> {
        let cursor = match tokens.cursor_for_page(page) {
            CursorLookup::FirstPage => None,
            CursorLookup::Cursor(cursor) => Some(cursor),
            CursorLookup::Unknown => {
                warn!(page, "plan_receipts: page requested beyond known frontier");
                return Err(ReceiptError::PageOutOfRange(page));
            }
        };

        // One extra row tells us whether a further page exists.
        let rows = self
            .receipt_repo
            .list_page(filter.as_status(), cursor, i64::from(page_size) + 1)
            .await
            .map_err(|err| {
                error!(page, db_error = ?err, "plan_receipts: failed to list receipts");
                ReceiptError::Internal(err)
            })?;

        let has_more = rows.len() > page_size as usize;
        let rows: Vec<_> = rows.into_iter().take(page_size as usize).collect();

        if let Some(last) = rows.last() {
            tokens.record_boundary(
                page,
                PageCursor {
                    created_at: last.created_at,
                    id: last.id,
                },
            );
        }

        let items = rows
            .into_iter()
            .map(PaymentReceiptModel::try_from)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(ReceiptError::Internal)?;

        Ok(ReceiptPage {
            items,
            page,
            has_more,
        })
    }
}

/// Builds the ActivePlan row derived from an approved receipt: status
/// `pending_assignment`, usage counters zeroed, terms copied from the plan
/// summary snapshot.
fn derive_plan(receipt: &PaymentReceiptEntity, summary: &PlanSummary) -> InsertActivePlanEntity {
    let mut plan = InsertActivePlanEntity {
        seller_id: receipt.buyer_id,
        seller_name: receipt.buyer_name.clone(),
        receipt_id: receipt.id,
        plan_name: summary.name.clone(),
        plan_type: summary.terms.plan_type().to_string(),
        amount_minor: receipt.amount_minor,
        status: ActivePlanStatus::PendingAssignment.to_string(),
        advertising_type: None,
        advertising_position: None,
        days_enabled: None,
        days_used: None,
        banner_image: None,
        assigned_product: None,
        video_mode: None,
        video_count: None,
        videos_used: None,
        total_duration_seconds: None,
        total_seconds_used: None,
        lives_duration_minutes: None,
        lives_used: None,
    };

    match &summary.terms {
        PlanTerms::Advertising {
            advertising_type,
            advertising_position,
            days_enabled,
        } => {
            plan.advertising_type = Some(advertising_type.to_string());
            plan.advertising_position = Some(advertising_position.clone());
            plan.days_enabled = Some(*days_enabled);
            plan.days_used = Some(0);
            plan.banner_image = receipt.banner_image.clone();
        }
        PlanTerms::Video { mode } => {
            plan.video_mode = Some(mode.mode().to_string());
            match mode {
                VideoTerms::VideoCount { video_count } => {
                    plan.video_count = Some(*video_count);
                    plan.videos_used = Some(0);
                }
                VideoTerms::TimePool {
                    total_duration_seconds,
                } => {
                    plan.total_duration_seconds = Some(*total_duration_seconds);
                    plan.total_seconds_used = Some(0);
                }
            }
        }
        PlanTerms::Lives {
            lives_duration_minutes,
        } => {
            plan.lives_duration_minutes = Some(*lives_duration_minutes);
            plan.lives_used = Some(0);
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use mockall::predicate::{always, eq};
    use serde_json::json;

    use crate::domain::{
        repositories::payment_receipts::MockPaymentReceiptRepository,
        value_objects::enums::receipt_statuses::ReceiptStatus,
    };

    fn sample_receipt(receipt_id: Uuid, plan_summary: serde_json::Value) -> PaymentReceiptEntity {
        PaymentReceiptEntity {
            id: receipt_id,
            buyer_id: Uuid::new_v4(),
            buyer_name: "Tienda Flor".to_string(),
            buyer_avatar_url: None,
            plan_summary,
            amount_minor: 150_000,
            image_url: "https://cdn.example/receipts/r1.jpg".to_string(),
            image_path: "receipts/r1.jpg".to_string(),
            image_size_bytes: 84_213,
            image_mime: "image/jpeg".to_string(),
            banner_image: None,
            status: ReceiptStatus::Pending.to_string(),
            approved_by: None,
            approved_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            rejection_comment: None,
            active_plan_id: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    fn advertising_summary(days_enabled: i32) -> serde_json::Value {
        json!({
            "name": "Destacado 30 días",
            "price_minor": 150_000,
            "plan_type": "advertising",
            "advertising_type": "product",
            "advertising_position": "home_top",
            "days_enabled": days_enabled,
        })
    }

    #[tokio::test]
    async fn approving_advertising_receipt_creates_pending_assignment_plan() {
        let receipt_id = Uuid::new_v4();
        let approver_id = Uuid::new_v4();
        let plan_id = Uuid::new_v4();

        let mut receipt_repo = MockPaymentReceiptRepository::new();
        let receipt = sample_receipt(receipt_id, advertising_summary(30));

        receipt_repo
            .expect_find_by_id()
            .with(eq(receipt_id))
            .returning(move |_| {
                let receipt = receipt.clone();
                Box::pin(async move { Ok(Some(receipt)) })
            });

        receipt_repo
            .expect_approve_pending_and_create_plan()
            .withf(move |id, approver, plan| {
                *id == receipt_id
                    && *approver == approver_id
                    && plan.status == "pending_assignment"
                    && plan.plan_type == "advertising"
                    && plan.days_enabled == Some(30)
                    && plan.days_used == Some(0)
            })
            .returning(move |_, _, _| Box::pin(async move { Ok(Some(plan_id)) }));

        let usecase = PlanReceiptUseCase::new(Arc::new(receipt_repo));
        let created = usecase.approve(receipt_id, approver_id).await.unwrap();

        assert_eq!(created, plan_id);
    }

    #[tokio::test]
    async fn approving_resolved_receipt_is_a_conflict() {
        let receipt_id = Uuid::new_v4();

        let mut receipt_repo = MockPaymentReceiptRepository::new();
        let mut receipt = sample_receipt(receipt_id, advertising_summary(7));
        receipt.status = ReceiptStatus::Approved.to_string();

        receipt_repo.expect_find_by_id().returning(move |_| {
            let receipt = receipt.clone();
            Box::pin(async move { Ok(Some(receipt)) })
        });
        receipt_repo
            .expect_approve_pending_and_create_plan()
            .returning(|_, _, _| Box::pin(async { Ok(None) }));

        let usecase = PlanReceiptUseCase::new(Arc::new(receipt_repo));
        let result = usecase.approve(receipt_id, Uuid::new_v4()).await;

        assert!(matches!(result, Err(ReceiptError::NotPending)));
    }

    #[tokio::test]
    async fn approving_missing_receipt_is_not_found() {
        let mut receipt_repo = MockPaymentReceiptRepository::new();
        receipt_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = PlanReceiptUseCase::new(Arc::new(receipt_repo));
        let result = usecase.approve(Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(matches!(result, Err(ReceiptError::NotFound)));
    }

    #[tokio::test]
    async fn rejecting_with_other_reason_requires_comment() {
        let receipt_repo = MockPaymentReceiptRepository::new();
        let usecase = PlanReceiptUseCase::new(Arc::new(receipt_repo));

        let result = usecase
            .reject(Uuid::new_v4(), Uuid::new_v4(), RejectionReason::Other, None)
            .await;
        assert!(matches!(result, Err(ReceiptError::MissingRejectionComment)));

        let result = usecase
            .reject(
                Uuid::new_v4(),
                Uuid::new_v4(),
                RejectionReason::Other,
                Some("   ".to_string()),
            )
            .await;
        assert!(matches!(result, Err(ReceiptError::MissingRejectionComment)));
    }

    #[tokio::test]
    async fn rejecting_with_enumerated_reason_stores_no_comment() {
        let receipt_id = Uuid::new_v4();

        let mut receipt_repo = MockPaymentReceiptRepository::new();
        let receipt = sample_receipt(receipt_id, advertising_summary(7));
        receipt_repo.expect_find_by_id().returning(move |_| {
            let receipt = receipt.clone();
            Box::pin(async move { Ok(Some(receipt)) })
        });
        receipt_repo
            .expect_reject_pending()
            .with(
                eq(receipt_id),
                always(),
                eq(RejectionReason::Illegible),
                eq(None::<String>),
            )
            .returning(|_, _, _, _| Box::pin(async { Ok(true) }));

        let usecase = PlanReceiptUseCase::new(Arc::new(receipt_repo));
        usecase
            .reject(
                receipt_id,
                Uuid::new_v4(),
                RejectionReason::Illegible,
                Some("se ignora".to_string()),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn revisited_page_is_fetched_with_the_same_cursor() {
        let now = Utc::now();
        let mut rows = Vec::new();
        for offset in 0..5 {
            let mut receipt = sample_receipt(Uuid::new_v4(), advertising_summary(7));
            receipt.created_at = now - Duration::minutes(offset);
            rows.push(receipt);
        }

        let mut receipt_repo = MockPaymentReceiptRepository::new();
        let all = rows.clone();
        receipt_repo
            .expect_list_page()
            .returning(move |_, cursor, limit| {
                let all = all.clone();
                Box::pin(async move {
                    let start = match cursor {
                        None => 0,
                        Some(c) => {
                            all.iter().position(|r| r.id == c.id).map(|i| i + 1).unwrap_or(all.len())
                        }
                    };
                    Ok(all
                        .into_iter()
                        .skip(start)
                        .take(limit as usize)
                        .collect::<Vec<_>>())
                })
            });

        let usecase = PlanReceiptUseCase::new(Arc::new(receipt_repo));
        let mut tokens = PageTokens::new();

        let first = usecase
            .list_page(ReceiptStatusFilter::All, 1, 2, &mut tokens)
            .await
            .unwrap();
        assert!(first.has_more);
        let first_ids: Vec<_> = first.items.iter().map(|r| r.id).collect();

        let second = usecase
            .list_page(ReceiptStatusFilter::All, 2, 2, &mut tokens)
            .await
            .unwrap();
        assert!(second.has_more);

        let first_again = usecase
            .list_page(ReceiptStatusFilter::All, 1, 2, &mut tokens)
            .await
            .unwrap();
        let again_ids: Vec<_> = first_again.items.iter().map(|r| r.id).collect();
        assert_eq!(first_ids, again_ids);

        let third = usecase
            .list_page(ReceiptStatusFilter::All, 3, 2, &mut tokens)
            .await
            .unwrap();
        assert_eq!(third.items.len(), 1);
        assert!(!third.has_more);
    }

    #[tokio::test]
    async fn page_beyond_frontier_is_rejected() {
        let receipt_repo = MockPaymentReceiptRepository::new();
        let usecase = PlanReceiptUseCase::new(Arc::new(receipt_repo));
        let mut tokens = PageTokens::new();

        let result = usecase
            .list_page(ReceiptStatusFilter::Pending, 4, 10, &mut tokens)
            .await;
        assert!(matches!(result, Err(ReceiptError::PageOutOfRange(4))));
    }
}
