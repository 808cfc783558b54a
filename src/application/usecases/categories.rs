use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::categories::{EditCategoryEntity, InsertCategoryEntity},
    repositories::categories::CategoryRepository,
    value_objects::categories::{CategoryModel, CreateCategoryModel, EditCategoryModel},
};

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("category not found")]
    NotFound,
    #[error("category name must not be empty")]
    EmptyName,
    #[error("category still has {0} subcategories")]
    HasSubcategories(i64),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CategoryError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            CategoryError::NotFound => StatusCode::NOT_FOUND,
            CategoryError::EmptyName => StatusCode::BAD_REQUEST,
            CategoryError::HasSubcategories(_) => StatusCode::CONFLICT,
            CategoryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type CategoryResult<T> = std::result::Result<T, CategoryError>;

pub struct CategoryUseCase<C>
where
    C: CategoryRepository + Send + Sync,
{
    category_repo: Arc<C>,
}

impl<C> CategoryUseCase<C>
where
    C: CategoryRepository + Send + Sync,
{
    pub fn new(category_repo: Arc<C>) -> Self {
        Self { category_repo }
    }

    pub async fn create(&self, model: CreateCategoryModel) -> CategoryResult<Uuid> {
        let name = model.name.trim();
        if name.is_empty() {
            return Err(CategoryError::EmptyName);
        }

        let insert = InsertCategoryEntity {
            name: name.to_string(),
            description: model.description,
            image_url: model.image_url,
            display_order: model.display_order.unwrap_or(0),
            is_active: true,
        };

        let category_id = self.category_repo.create(insert).await.map_err(|err| {
            error!(db_error = ?err, "categories: creation failed");
            CategoryError::Internal(err)
        })?;

        info!(%category_id, "categories: category created");
        Ok(category_id)
    }

    pub async fn get(&self, category_id: Uuid) -> CategoryResult<CategoryModel> {
        let entity = self
            .category_repo
            .find_by_id(category_id)
            .await
            .map_err(|err| {
                error!(%category_id, db_error = ?err, "categories: lookup failed");
                CategoryError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%category_id, "categories: category not found");
                CategoryError::NotFound
            })?;

        Ok(CategoryModel::from(entity))
    }

    pub async fn list(&self, include_inactive: bool) -> CategoryResult<Vec<CategoryModel>> {
        let entities = self
            .category_repo
            .list(include_inactive)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "categories: listing failed");
                CategoryError::Internal(err)
            })?;

        Ok(entities.into_iter().map(CategoryModel::from).collect())
    }

    pub async fn update(&self, category_id: Uuid, model: EditCategoryModel) -> CategoryResult<()> {
        if let Some(name) = &model.name {
            if name.trim().is_empty() {
                return Err(CategoryError::EmptyName);
            }
        }

        let changes = EditCategoryEntity {
            name: model.name.map(|name| name.trim().to_string()),
            description: model.description,
            image_url: model.image_url,
            display_order: model.display_order,
            is_active: model.is_active,
            updated_at: Utc::now(),
        };

        let updated = self
            .category_repo
            .update(category_id, changes)
            .await
            .map_err(|err| {
                error!(%category_id, db_error = ?err, "categories: update failed");
                CategoryError::Internal(err)
            })?;

        if !updated {
            warn!(%category_id, "categories: category not found for update");
            return Err(CategoryError::NotFound);
        }

        info!(%category_id, "categories: category updated");
        Ok(())
    }

    /// Soft delete. Refused while live subcategories still reference the
    /// category.
    pub async fn delete(&self, category_id: Uuid, deleted_by: Uuid) -> CategoryResult<()> {
        let live = self
            .category_repo
            .count_live_subcategories(category_id)
            .await
            .map_err(|err| {
                error!(%category_id, db_error = ?err, "categories: subcategory count failed");
                CategoryError::Internal(err)
            })?;

        if live > 0 {
            warn!(%category_id, live_subcategories = live, "categories: deletion refused");
            return Err(CategoryError::HasSubcategories(live));
        }

        let deleted = self
            .category_repo
            .soft_delete(category_id, deleted_by)
            .await
            .map_err(|err| {
                error!(%category_id, db_error = ?err, "categories: deletion failed");
                CategoryError::Internal(err)
            })?;

        if !deleted {
            warn!(%category_id, "categories: category not found for deletion");
            return Err(CategoryError::NotFound);
        }

        info!(%category_id, %deleted_by, "categories: category soft-deleted");
        Ok(())
    }

    pub async fn search(&self, term: &str) -> CategoryResult<Vec<CategoryModel>> {
        let term = term.trim();
        if term.is_empty() {
            return self.list(false).await;
        }

        let entities = self.category_repo.search(term).await.map_err(|err| {
            error!(db_error = ?err, "categories: search failed");
            CategoryError::Internal(err)
        })?;

        Ok(entities.into_iter().map(CategoryModel::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::categories::MockCategoryRepository;

    #[tokio::test]
    async fn creation_trims_the_name_and_defaults_active() {
        let mut category_repo = MockCategoryRepository::new();
        let category_id = Uuid::new_v4();

        category_repo
            .expect_create()
            .withf(|insert| insert.name == "Hogar" && insert.is_active && insert.display_order == 0)
            .returning(move |_| Box::pin(async move { Ok(category_id) }));

        let usecase = CategoryUseCase::new(Arc::new(category_repo));
        let created = usecase
            .create(CreateCategoryModel {
                name: "  Hogar  ".to_string(),
                description: None,
                image_url: None,
                display_order: None,
            })
            .await
            .unwrap();

        assert_eq!(created, category_id);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let category_repo = MockCategoryRepository::new();
        let usecase = CategoryUseCase::new(Arc::new(category_repo));

        let result = usecase
            .create(CreateCategoryModel {
                name: "   ".to_string(),
                description: None,
                image_url: None,
                display_order: None,
            })
            .await;

        assert!(matches!(result, Err(CategoryError::EmptyName)));
    }

    #[tokio::test]
    async fn deletion_is_refused_while_subcategories_remain() {
        let mut category_repo = MockCategoryRepository::new();
        category_repo
            .expect_count_live_subcategories()
            .returning(|_| Box::pin(async { Ok(3) }));
        category_repo.expect_soft_delete().times(0);

        let usecase = CategoryUseCase::new(Arc::new(category_repo));
        let result = usecase.delete(Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(matches!(result, Err(CategoryError::HasSubcategories(3))));
    }

    #[tokio::test]
    async fn deletion_proceeds_once_subcategories_are_gone() {
        let mut category_repo = MockCategoryRepository::new();
        category_repo
            .expect_count_live_subcategories()
            .returning(|_| Box::pin(async { Ok(0) }));
        category_repo
            .expect_soft_delete()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(true) }));

        let usecase = CategoryUseCase::new(Arc::new(category_repo));
        usecase.delete(Uuid::new_v4(), Uuid::new_v4()).await.unwrap();
    }
}
