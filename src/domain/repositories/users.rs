use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::users::{EditUserEntity, InsertDeviceTokenEntity, InsertUserEntity, UserEntity},
    value_objects::{enums::user_statuses::UserStatus, users::ListUsersFilter},
};

#[async_trait]
#[automock]
pub trait UserRepository {
    async fn create(&self, user: InsertUserEntity) -> Result<Uuid>;

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>>;

    async fn list(&self, filter: &ListUsersFilter) -> Result<Vec<UserEntity>>;

    async fn update(&self, user_id: Uuid, changes: EditUserEntity) -> Result<bool>;

    async fn set_status(&self, user_id: Uuid, status: UserStatus) -> Result<bool>;

    async fn soft_delete(&self, user_id: Uuid, deleted_by: Uuid) -> Result<bool>;

    /// Upserts a push token by its token string, so re-registration from the
    /// same device never duplicates rows and removal is exact.
    async fn register_device_token(&self, token: InsertDeviceTokenEntity) -> Result<Uuid>;

    async fn remove_device_token(&self, token: &str) -> Result<bool>;
}
