use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::payment_receipts;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payment_receipts)]
pub struct PaymentReceiptEntity {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub buyer_name: String,
    pub buyer_avatar_url: Option<String>,
    pub plan_summary: Value,
    pub amount_minor: i64,
    pub image_url: String,
    pub image_path: String,
    pub image_size_bytes: i64,
    pub image_mime: String,
    pub banner_image: Option<Value>,
    pub status: String,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<Uuid>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub rejection_comment: Option<String>,
    pub active_plan_id: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payment_receipts)]
pub struct InsertPaymentReceiptEntity {
    pub buyer_id: Uuid,
    pub buyer_name: String,
    pub buyer_avatar_url: Option<String>,
    pub plan_summary: Value,
    pub amount_minor: i64,
    pub image_url: String,
    pub image_path: String,
    pub image_size_bytes: i64,
    pub image_mime: String,
    pub banner_image: Option<Value>,
    pub status: String,
    pub created_by: Uuid,
}
