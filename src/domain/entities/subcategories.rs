use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::subcategories;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subcategories)]
pub struct SubcategoryEntity {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub feature_definitions: Value,
    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subcategories)]
pub struct InsertSubcategoryEntity {
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub feature_definitions: Value,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = subcategories)]
pub struct EditSubcategoryEntity {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
    pub feature_definitions: Option<Value>,
    pub updated_at: DateTime<Utc>,
}
