use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::wallet_transactions;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = wallet_transactions)]
pub struct WalletTransactionEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_avatar_url: Option<String>,
    pub description: Option<String>,
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
#[diesel(table_name = wallet_transactions)]
pub struct InsertWalletTransactionEntity {
    pub user_id: Uuid,
    pub user_name: String,
    pub user_avatar_url: Option<String>,
    pub description: Option<String>,
    pub amount_minor: i64,
    pub image_url: String,
    pub image_path: String,
    pub image_size_bytes: i64,
    pub image_mime: String,
    pub status: String,
    pub created_by: Uuid,
}
