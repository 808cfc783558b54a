use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{insert_into, prelude::*, update};
use uuid::Uuid;

use crate::domain::{
    entities::categories::{CategoryEntity, EditCategoryEntity, InsertCategoryEntity},
    repositories::categories::CategoryRepository,
};
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad,
    schema::{categories, subcategories},
};

pub struct CategoryPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CategoryPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CategoryRepository for CategoryPostgres {
    async fn create(&self, category: InsertCategoryEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(categories::table)
            .values(&category)
            .returning(categories::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, category_id: Uuid) -> Result<Option<CategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = categories::table
            .filter(categories::id.eq(category_id))
            .filter(categories::deleted.eq(false))
            .select(CategoryEntity::as_select())
            .first::<CategoryEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<CategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = categories::table
            .filter(categories::deleted.eq(false))
            .select(CategoryEntity::as_select())
            .into_boxed();

        if !include_inactive {
            query = query.filter(categories::is_active.eq(true));
        }

        let results = query
            .order((categories::display_order.asc(), categories::name.asc()))
            .load::<CategoryEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update(&self, category_id: Uuid, changes: EditCategoryEntity) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(categories::table)
            .filter(categories::id.eq(category_id))
            .filter(categories::deleted.eq(false))
            .set(&changes)
            .execute(&mut conn)?;

        Ok(updated > 0)
    }

    async fn soft_delete(&self, category_id: Uuid, deleted_by: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = update(categories::table)
            .filter(categories::id.eq(category_id))
            .filter(categories::deleted.eq(false))
            .set((
                categories::deleted.eq(true),
                categories::deleted_at.eq(Utc::now()),
                categories::deleted_by.eq(deleted_by),
                categories::is_active.eq(false),
            ))
            .execute(&mut conn)?;

        Ok(deleted > 0)
    }

    async fn search(&self, term: &str) -> Result<Vec<CategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let pattern = format!("%{}%", term);

        let results = categories::table
            .filter(categories::deleted.eq(false))
            .filter(
                categories::name
                    .ilike(pattern.clone())
                    .or(categories::description.ilike(pattern)),
            )
            .select(CategoryEntity::as_select())
            .order((categories::display_order.asc(), categories::name.asc()))
            .load::<CategoryEntity>(&mut conn)?;

        Ok(results)
    }

    async fn count_live_subcategories(&self, category_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = subcategories::table
            .filter(subcategories::category_id.eq(category_id))
            .filter(subcategories::deleted.eq(false))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }
}
