use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::subcategories::{
    EditSubcategoryEntity, InsertSubcategoryEntity, SubcategoryEntity,
};

#[async_trait]
#[automock]
pub trait SubcategoryRepository {
    async fn create(&self, subcategory: InsertSubcategoryEntity) -> Result<Uuid>;

    async fn find_by_id(&self, subcategory_id: Uuid) -> Result<Option<SubcategoryEntity>>;

    async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<SubcategoryEntity>>;

    async fn update(&self, subcategory_id: Uuid, changes: EditSubcategoryEntity) -> Result<bool>;

    async fn soft_delete(&self, subcategory_id: Uuid, deleted_by: Uuid) -> Result<bool>;

    async fn search(&self, term: &str) -> Result<Vec<SubcategoryEntity>>;
}
