use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{delete, insert_into, prelude::*, update, upsert::excluded};
use uuid::Uuid;

use crate::domain::{
    entities::users::{EditUserEntity, InsertDeviceTokenEntity, InsertUserEntity, UserEntity},
    repositories::users::UserRepository,
    value_objects::{enums::user_statuses::UserStatus, users::ListUsersFilter},
};
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad,
    schema::{device_tokens, users},
};

pub struct UserPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserRepository for UserPostgres {
    async fn create(&self, user: InsertUserEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(users::table)
            .values(&user)
            .returning(users::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = users::table
            .filter(users::id.eq(user_id))
            .filter(users::deleted.eq(false))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = users::table
            .filter(users::email.eq(email))
            .filter(users::deleted.eq(false))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list(&self, filter: &ListUsersFilter) -> Result<Vec<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = users::table
            .filter(users::deleted.eq(false))
            .select(UserEntity::as_select())
            .into_boxed();

        if let Some(role) = filter.role {
            query = query.filter(users::active_role.eq(role.to_string()));
        }

        if let Some(status) = filter.status {
            query = query.filter(users::status.eq(status.to_string()));
        }

        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search.trim());
            query = query.filter(
                users::display_name
                    .ilike(pattern.clone())
                    .or(users::email.ilike(pattern)),
            );
        }

        let results = query
            .order(users::created_at.desc())
            .load::<UserEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update(&self, user_id: Uuid, changes: EditUserEntity) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(users::table)
            .filter(users::id.eq(user_id))
            .filter(users::deleted.eq(false))
            .set(&changes)
            .execute(&mut conn)?;

        Ok(updated > 0)
    }

    async fn set_status(&self, user_id: Uuid, status: UserStatus) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let changed = update(users::table)
            .filter(users::id.eq(user_id))
            .filter(users::deleted.eq(false))
            .set((
                users::status.eq(status.to_string()),
                users::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(changed > 0)
    }

    async fn soft_delete(&self, user_id: Uuid, deleted_by: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = update(users::table)
            .filter(users::id.eq(user_id))
            .filter(users::deleted.eq(false))
            .set((
                users::deleted.eq(true),
                users::deleted_at.eq(Utc::now()),
                users::deleted_by.eq(deleted_by),
                users::status.eq(UserStatus::Inactive.to_string()),
            ))
            .execute(&mut conn)?;

        Ok(deleted > 0)
    }

    async fn register_device_token(&self, token: InsertDeviceTokenEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Token strings are unique; re-registration from another account
        // reassigns the row instead of duplicating it.
        let result = insert_into(device_tokens::table)
            .values(&token)
            .on_conflict(device_tokens::token)
            .do_update()
            .set((
                device_tokens::user_id.eq(excluded(device_tokens::user_id)),
                device_tokens::platform.eq(excluded(device_tokens::platform)),
            ))
            .returning(device_tokens::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn remove_device_token(&self, token: &str) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let removed = delete(device_tokens::table)
            .filter(device_tokens::token.eq(token))
            .execute(&mut conn)?;

        Ok(removed > 0)
    }
}
