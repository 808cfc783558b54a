use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::subcategories::{EditSubcategoryEntity, InsertSubcategoryEntity},
    repositories::{categories::CategoryRepository, subcategories::SubcategoryRepository},
    value_objects::subcategories::{
        CreateSubcategoryModel, EditSubcategoryModel, FeatureDefinition, SubcategoryModel,
    },
};

#[derive(Debug, Error)]
pub enum SubcategoryError {
    #[error("subcategory not found")]
    NotFound,
    #[error("parent category not found")]
    CategoryNotFound,
    #[error("subcategory name must not be empty")]
    EmptyName,
    #[error("duplicate feature key: {0}")]
    DuplicateFeatureKey(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubcategoryError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SubcategoryError::NotFound | SubcategoryError::CategoryNotFound => {
                StatusCode::NOT_FOUND
            }
            SubcategoryError::EmptyName | SubcategoryError::DuplicateFeatureKey(_) => {
                StatusCode::BAD_REQUEST
            }
            SubcategoryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type SubcategoryResult<T> = std::result::Result<T, SubcategoryError>;

pub struct SubcategoryUseCase<S, C>
where
    S: SubcategoryRepository + Send + Sync,
    C: CategoryRepository + Send + Sync,
{
    subcategory_repo: Arc<S>,
    category_repo: Arc<C>,
}

impl<S, C> SubcategoryUseCase<S, C>
where
    S: SubcategoryRepository + Send + Sync,
    C: CategoryRepository + Send + Sync,
{
    pub fn new(subcategory_repo: Arc<S>, category_repo: Arc<C>) -> Self {
        Self {
            subcategory_repo,
            category_repo,
        }
    }

    pub async fn create(&self, model: CreateSubcategoryModel) -> SubcategoryResult<Uuid> {
        let name = model.name.trim();
        if name.is_empty() {
            return Err(SubcategoryError::EmptyName);
        }
        validate_feature_keys(&model.feature_definitions)?;

        let parent = self
            .category_repo
            .find_by_id(model.category_id)
            .await
            .map_err(|err| {
                error!(category_id = %model.category_id, db_error = ?err, "subcategories: parent lookup failed");
                SubcategoryError::Internal(err)
            })?;
        if parent.is_none() {
            warn!(category_id = %model.category_id, "subcategories: parent category not found");
            return Err(SubcategoryError::CategoryNotFound);
        }

        let feature_definitions = serde_json::to_value(&model.feature_definitions)
            .map_err(|err| SubcategoryError::Internal(err.into()))?;

        let insert = InsertSubcategoryEntity {
            category_id: model.category_id,
            name: name.to_string(),
            description: model.description,
            image_url: model.image_url,
            display_order: model.display_order.unwrap_or(0),
            is_active: true,
            feature_definitions,
        };

        let subcategory_id = self.subcategory_repo.create(insert).await.map_err(|err| {
            error!(db_error = ?err, "subcategories: creation failed");
            SubcategoryError::Internal(err)
        })?;

        info!(%subcategory_id, category_id = %model.category_id, "subcategories: subcategory created");
        Ok(subcategory_id)
    }

    pub async fn get(&self, subcategory_id: Uuid) -> SubcategoryResult<SubcategoryModel> {
        let entity = self
            .subcategory_repo
            .find_by_id(subcategory_id)
            .await
            .map_err(|err| {
                error!(%subcategory_id, db_error = ?err, "subcategories: lookup failed");
                SubcategoryError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%subcategory_id, "subcategories: subcategory not found");
                SubcategoryError::NotFound
            })?;

        SubcategoryModel::try_from(entity).map_err(SubcategoryError::Internal)
    }

    pub async fn list_by_category(
        &self,
        category_id: Uuid,
    ) -> SubcategoryResult<Vec<SubcategoryModel>> {
        let entities = self
            .subcategory_repo
            .list_by_category(category_id)
            .await
            .map_err(|err| {
                error!(%category_id, db_error = ?err, "subcategories: listing failed");
                SubcategoryError::Internal(err)
            })?;

        entities
            .into_iter()
            .map(SubcategoryModel::try_from)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(SubcategoryError::Internal)
    }

    pub async fn update(
        &self,
        subcategory_id: Uuid,
        model: EditSubcategoryModel,
    ) -> SubcategoryResult<()> {
        if let Some(name) = &model.name {
            if name.trim().is_empty() {
                return Err(SubcategoryError::EmptyName);
            }
        }
        if let Some(definitions) = &model.feature_definitions {
            validate_feature_keys(definitions)?;
        }

        let feature_definitions = match model.feature_definitions {
            Some(definitions) => Some(
                serde_json::to_value(&definitions)
                    .map_err(|err| SubcategoryError::Internal(err.into()))?,
            ),
            None => None,
        };

        let changes = EditSubcategoryEntity {
            name: model.name.map(|name| name.trim().to_string()),
            description: model.description,
            image_url: model.image_url,
            display_order: model.display_order,
            is_active: model.is_active,
            feature_definitions,
            updated_at: Utc::now(),
        };

        let updated = self
            .subcategory_repo
            .update(subcategory_id, changes)
            .await
            .map_err(|err| {
                error!(%subcategory_id, db_error = ?err, "subcategories: update failed");
                SubcategoryError::Internal(err)
            })?;

        if !updated {
            warn!(%subcategory_id, "subcategories: subcategory not found for update");
            return Err(SubcategoryError::NotFound);
        }

        info!(%subcategory_id, "subcategories: subcategory updated");
        Ok(())
    }

    pub async fn delete(&self, subcategory_id: Uuid, deleted_by: Uuid) -> SubcategoryResult<()> {
        let deleted = self
            .subcategory_repo
            .soft_delete(subcategory_id, deleted_by)
            .await
            .map_err(|err| {
                error!(%subcategory_id, db_error = ?err, "subcategories: deletion failed");
                SubcategoryError::Internal(err)
            })?;

        if !deleted {
            warn!(%subcategory_id, "subcategories: subcategory not found for deletion");
            return Err(SubcategoryError::NotFound);
        }

        info!(%subcategory_id, %deleted_by, "subcategories: subcategory soft-deleted");
        Ok(())
    }

    pub async fn search(&self, term: &str) -> SubcategoryResult<Vec<SubcategoryModel>> {
        let entities = self
            .subcategory_repo
            .search(term.trim())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "subcategories: search failed");
                SubcategoryError::Internal(err)
            })?;

        entities
            .into_iter()
            .map(SubcategoryModel::try_from)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(SubcategoryError::Internal)
    }
}

fn validate_feature_keys(definitions: &[FeatureDefinition]) -> SubcategoryResult<()> {
    let mut seen = HashSet::new();
    for definition in definitions {
        if !seen.insert(definition.key.as_str()) {
            return Err(SubcategoryError::DuplicateFeatureKey(
                definition.key.clone(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::categories::CategoryEntity,
        repositories::{
            categories::MockCategoryRepository, subcategories::MockSubcategoryRepository,
        },
        value_objects::subcategories::FeatureFieldType,
    };

    fn parent_category(category_id: Uuid) -> CategoryEntity {
        CategoryEntity {
            id: category_id,
            name: "Electrónica".to_string(),
            description: None,
            image_url: None,
            display_order: 0,
            is_active: true,
            deleted: false,
            deleted_at: None,
            deleted_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn feature(key: &str) -> FeatureDefinition {
        FeatureDefinition {
            key: key.to_string(),
            label: key.to_string(),
            field_type: FeatureFieldType::Text,
            required: false,
            order: 0,
            unit: None,
        }
    }

    #[tokio::test]
    async fn creation_requires_an_existing_parent() {
        let mut subcategory_repo = MockSubcategoryRepository::new();
        subcategory_repo.expect_create().times(0);
        let mut category_repo = MockCategoryRepository::new();
        category_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = SubcategoryUseCase::new(Arc::new(subcategory_repo), Arc::new(category_repo));
        let result = usecase
            .create(CreateSubcategoryModel {
                category_id: Uuid::new_v4(),
                name: "Audio".to_string(),
                description: None,
                image_url: None,
                display_order: None,
                feature_definitions: vec![],
            })
            .await;

        assert!(matches!(result, Err(SubcategoryError::CategoryNotFound)));
    }

    #[tokio::test]
    async fn creation_serializes_feature_definitions() {
        let category_id = Uuid::new_v4();
        let subcategory_id = Uuid::new_v4();

        let mut subcategory_repo = MockSubcategoryRepository::new();
        subcategory_repo
            .expect_create()
            .withf(|insert| {
                insert.feature_definitions.as_array().is_some_and(|defs| {
                    defs.len() == 2 && defs[0]["key"] == "brand" && defs[0]["type"] == "text"
                })
            })
            .returning(move |_| Box::pin(async move { Ok(subcategory_id) }));
        let mut category_repo = MockCategoryRepository::new();
        category_repo.expect_find_by_id().returning(move |_| {
            let parent = parent_category(category_id);
            Box::pin(async move { Ok(Some(parent)) })
        });

        let usecase = SubcategoryUseCase::new(Arc::new(subcategory_repo), Arc::new(category_repo));
        let created = usecase
            .create(CreateSubcategoryModel {
                category_id,
                name: "Audio".to_string(),
                description: None,
                image_url: None,
                display_order: None,
                feature_definitions: vec![feature("brand"), feature("power")],
            })
            .await
            .unwrap();

        assert_eq!(created, subcategory_id);
    }

    #[tokio::test]
    async fn duplicate_feature_keys_are_rejected() {
        let subcategory_repo = MockSubcategoryRepository::new();
        let category_repo = MockCategoryRepository::new();

        let usecase = SubcategoryUseCase::new(Arc::new(subcategory_repo), Arc::new(category_repo));
        let result = usecase
            .create(CreateSubcategoryModel {
                category_id: Uuid::new_v4(),
                name: "Audio".to_string(),
                description: None,
                image_url: None,
                display_order: None,
                feature_definitions: vec![feature("brand"), feature("brand")],
            })
            .await;

        assert!(matches!(
            result,
            Err(SubcategoryError::DuplicateFeatureKey(key)) if key == "brand"
        ));
    }
}
