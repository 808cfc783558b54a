use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::categories::{
    CategoryEntity, EditCategoryEntity, InsertCategoryEntity,
};

#[async_trait]
#[automock]
pub trait CategoryRepository {
    async fn create(&self, category: InsertCategoryEntity) -> Result<Uuid>;

    async fn find_by_id(&self, category_id: Uuid) -> Result<Option<CategoryEntity>>;

    async fn list(&self, include_inactive: bool) -> Result<Vec<CategoryEntity>>;

    async fn update(&self, category_id: Uuid, changes: EditCategoryEntity) -> Result<bool>;

    async fn soft_delete(&self, category_id: Uuid, deleted_by: Uuid) -> Result<bool>;

    async fn search(&self, term: &str) -> Result<Vec<CategoryEntity>>;

    /// Live (non-deleted) subcategories still referencing the category.
    async fn count_live_subcategories(&self, category_id: Uuid) -> Result<i64>;
}
