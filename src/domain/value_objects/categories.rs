use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::categories::CategoryEntity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryModel {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CategoryEntity> for CategoryModel {
    fn from(entity: CategoryEntity) -> Self {
        CategoryModel {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            image_url: entity.image_url,
            display_order: entity.display_order,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryModel {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditCategoryModel {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}
