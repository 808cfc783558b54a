use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::subcategories::SubcategoryEntity;

/// One entry of the product schema a subcategory imposes on its products.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureDefinition {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FeatureFieldType,
    pub required: bool,
    pub order: i32,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeatureFieldType {
    Text,
    Number,
    Boolean,
    Select,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubcategoryModel {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub feature_definitions: Vec<FeatureDefinition>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SubcategoryEntity> for SubcategoryModel {
    type Error = anyhow::Error;

    fn try_from(entity: SubcategoryEntity) -> Result<Self, Self::Error> {
        let feature_definitions: Vec<FeatureDefinition> =
            serde_json::from_value(entity.feature_definitions)
                .context("malformed feature definitions on subcategory")?;

        Ok(SubcategoryModel {
            id: entity.id,
            category_id: entity.category_id,
            name: entity.name,
            description: entity.description,
            image_url: entity.image_url,
            display_order: entity.display_order,
            is_active: entity.is_active,
            feature_definitions,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubcategoryModel {
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
    #[serde(default)]
    pub feature_definitions: Vec<FeatureDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditSubcategoryModel {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
    pub feature_definitions: Option<Vec<FeatureDefinition>>,
}
