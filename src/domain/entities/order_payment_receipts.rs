use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::order_payment_receipts;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = order_payment_receipts)]
pub struct OrderPaymentReceiptEntity {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub buyer_name: String,
    pub buyer_avatar_url: Option<String>,
    pub order_id: Uuid,
    pub order_number: String,
    pub amount_minor: i64,
    pub image_url: String,
    pub image_path: String,
    pub image_size_bytes: i64,
    pub image_mime: String,
    pub status: String,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<Uuid>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub rejection_comment: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_payment_receipts)]
pub struct InsertOrderPaymentReceiptEntity {
    pub buyer_id: Uuid,
    pub buyer_name: String,
    pub buyer_avatar_url: Option<String>,
    pub order_id: Uuid,
    pub order_number: String,
    pub amount_minor: i64,
    pub image_url: String,
    pub image_path: String,
    pub image_size_bytes: i64,
    pub image_mime: String,
    pub status: String,
    pub created_by: Uuid,
}
