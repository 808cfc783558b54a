use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::active_plans;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = active_plans)]
pub struct ActivePlanEntity {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub seller_name: String,
    pub receipt_id: Uuid,
    pub plan_name: String,
    pub plan_type: String,
    pub amount_minor: i64,
    pub status: String,
    pub advertising_type: Option<String>,
    pub advertising_position: Option<String>,
    pub days_enabled: Option<i32>,
    pub days_used: Option<i32>,
    pub banner_image: Option<Value>,
    pub assigned_product: Option<Value>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub video_mode: Option<String>,
    pub video_count: Option<i32>,
    pub videos_used: Option<i32>,
    pub total_duration_seconds: Option<i32>,
    pub total_seconds_used: Option<i32>,
    pub lives_duration_minutes: Option<i32>,
    pub lives_used: Option<i32>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = active_plans)]
pub struct InsertActivePlanEntity {
    pub seller_id: Uuid,
    pub seller_name: String,
    pub receipt_id: Uuid,
    pub plan_name: String,
    pub plan_type: String,
    pub amount_minor: i64,
    pub status: String,
    pub advertising_type: Option<String>,
    pub advertising_position: Option<String>,
    pub days_enabled: Option<i32>,
    pub days_used: Option<i32>,
    pub banner_image: Option<Value>,
    pub assigned_product: Option<Value>,
    pub video_mode: Option<String>,
    pub video_count: Option<i32>,
    pub videos_used: Option<i32>,
    pub total_duration_seconds: Option<i32>,
    pub total_seconds_used: Option<i32>,
    pub lives_duration_minutes: Option<i32>,
    pub lives_used: Option<i32>,
}
