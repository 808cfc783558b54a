use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::{device_tokens, users};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = users)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub active_role: String,
    pub role_profile: Value,
    pub status: String,
    pub wallet_balance_minor: i64,
    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct InsertUserEntity {
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub active_role: String,
    pub role_profile: Value,
    pub status: String,
    pub wallet_balance_minor: i64,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub struct EditUserEntity {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub active_role: Option<String>,
    pub role_profile: Option<Value>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = device_tokens)]
pub struct DeviceTokenEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub platform: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = device_tokens)]
pub struct InsertDeviceTokenEntity {
    pub user_id: Uuid,
    pub token: String,
    pub platform: String,
}
