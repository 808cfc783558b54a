use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{insert_into, prelude::*, update};
use uuid::Uuid;

use crate::domain::{
    entities::subcategories::{EditSubcategoryEntity, InsertSubcategoryEntity, SubcategoryEntity},
    repositories::subcategories::SubcategoryRepository,
};
use crate::infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::subcategories};

pub struct SubcategoryPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubcategoryPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubcategoryRepository for SubcategoryPostgres {
    async fn create(&self, subcategory: InsertSubcategoryEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(subcategories::table)
            .values(&subcategory)
            .returning(subcategories::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, subcategory_id: Uuid) -> Result<Option<SubcategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = subcategories::table
            .filter(subcategories::id.eq(subcategory_id))
            .filter(subcategories::deleted.eq(false))
            .select(SubcategoryEntity::as_select())
            .first::<SubcategoryEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<SubcategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = subcategories::table
            .filter(subcategories::category_id.eq(category_id))
            .filter(subcategories::deleted.eq(false))
            .select(SubcategoryEntity::as_select())
            .order((subcategories::display_order.asc(), subcategories::name.asc()))
            .load::<SubcategoryEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update(&self, subcategory_id: Uuid, changes: EditSubcategoryEntity) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(subcategories::table)
            .filter(subcategories::id.eq(subcategory_id))
            .filter(subcategories::deleted.eq(false))
            .set(&changes)
            .execute(&mut conn)?;

        Ok(updated > 0)
    }

    async fn soft_delete(&self, subcategory_id: Uuid, deleted_by: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = update(subcategories::table)
            .filter(subcategories::id.eq(subcategory_id))
            .filter(subcategories::deleted.eq(false))
            .set((
                subcategories::deleted.eq(true),
                subcategories::deleted_at.eq(Utc::now()),
                subcategories::deleted_by.eq(deleted_by),
                subcategories::is_active.eq(false),
            ))
            .execute(&mut conn)?;

        Ok(deleted > 0)
    }

    async fn search(&self, term: &str) -> Result<Vec<SubcategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let pattern = format!("%{}%", term);

        let results = subcategories::table
            .filter(subcategories::deleted.eq(false))
            .filter(
                subcategories::name
                    .ilike(pattern.clone())
                    .or(subcategories::description.ilike(pattern)),
            )
            .select(SubcategoryEntity::as_select())
            .order((subcategories::display_order.asc(), subcategories::name.asc()))
            .load::<SubcategoryEntity>(&mut conn)?;

        Ok(results)
    }
}
