use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::users::{EditUserEntity, InsertDeviceTokenEntity, InsertUserEntity},
    repositories::users::UserRepository,
    value_objects::{
        enums::user_statuses::UserStatus,
        users::{
            CreateUserModel, EditUserModel, ListUsersFilter, RegisterDeviceTokenModel, UserModel,
        },
    },
};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("device token not found")]
    TokenNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UserError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            UserError::NotFound | UserError::TokenNotFound => StatusCode::NOT_FOUND,
            UserError::EmailTaken => StatusCode::CONFLICT,
            UserError::InvalidEmail => StatusCode::BAD_REQUEST,
            UserError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UserResult<T> = std::result::Result<T, UserError>;

pub struct UserUseCase<U>
where
    U: UserRepository + Send + Sync,
{
    user_repo: Arc<U>,
}

impl<U> UserUseCase<U>
where
    U: UserRepository + Send + Sync,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn create(&self, model: CreateUserModel) -> UserResult<Uuid> {
        let email = model.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(UserError::InvalidEmail);
        }

        let existing = self.user_repo.find_by_email(&email).await.map_err(|err| {
            error!(db_error = ?err, "users: email lookup failed");
            UserError::Internal(err)
        })?;
        if existing.is_some() {
            warn!(%email, "users: email already registered");
            return Err(UserError::EmailTaken);
        }

        let role_profile = serde_json::to_value(&model.profile)
            .map_err(|err| UserError::Internal(err.into()))?;

        let insert = InsertUserEntity {
            email,
            display_name: model.display_name,
            avatar_url: model.avatar_url,
            phone: model.phone,
            active_role: model.profile.role().to_string(),
            role_profile,
            status: UserStatus::PendingVerification.to_string(),
            wallet_balance_minor: 0,
        };

        let user_id = self.user_repo.create(insert).await.map_err(|err| {
            error!(db_error = ?err, "users: creation failed");
            UserError::Internal(err)
        })?;

        info!(%user_id, "users: user created");
        Ok(user_id)
    }

    pub async fn get(&self, user_id: Uuid) -> UserResult<UserModel> {
        let entity = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: lookup failed");
                UserError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%user_id, "users: user not found");
                UserError::NotFound
            })?;

        UserModel::try_from(entity).map_err(UserError::Internal)
    }

    pub async fn list(&self, filter: &ListUsersFilter) -> UserResult<Vec<UserModel>> {
        let entities = self.user_repo.list(filter).await.map_err(|err| {
            error!(db_error = ?err, "users: listing failed");
            UserError::Internal(err)
        })?;

        entities
            .into_iter()
            .map(UserModel::try_from)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(UserError::Internal)
    }

    pub async fn update(&self, user_id: Uuid, model: EditUserModel) -> UserResult<()> {
        let (active_role, role_profile) = match model.profile {
            Some(profile) => {
                let value = serde_json::to_value(&profile)
                    .map_err(|err| UserError::Internal(err.into()))?;
                (Some(profile.role().to_string()), Some(value))
            }
            None => (None, None),
        };

        let changes = EditUserEntity {
            display_name: model.display_name,
            avatar_url: model.avatar_url,
            phone: model.phone,
            active_role,
            role_profile,
            updated_at: Utc::now(),
        };

        let updated = self
            .user_repo
            .update(user_id, changes)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: update failed");
                UserError::Internal(err)
            })?;

        if !updated {
            warn!(%user_id, "users: user not found for update");
            return Err(UserError::NotFound);
        }

        info!(%user_id, "users: user updated");
        Ok(())
    }

    pub async fn set_status(&self, user_id: Uuid, status: UserStatus) -> UserResult<()> {
        let changed = self
            .user_repo
            .set_status(user_id, status)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: status change failed");
                UserError::Internal(err)
            })?;

        if !changed {
            warn!(%user_id, "users: user not found for status change");
            return Err(UserError::NotFound);
        }

        info!(%user_id, %status, "users: status changed");
        Ok(())
    }

    pub async fn delete(&self, user_id: Uuid, deleted_by: Uuid) -> UserResult<()> {
        let deleted = self
            .user_repo
            .soft_delete(user_id, deleted_by)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: deletion failed");
                UserError::Internal(err)
            })?;

        if !deleted {
            warn!(%user_id, "users: user not found for deletion");
            return Err(UserError::NotFound);
        }

        info!(%user_id, %deleted_by, "users: user soft-deleted");
        Ok(())
    }

    pub async fn register_device_token(
        &self,
        user_id: Uuid,
        model: RegisterDeviceTokenModel,
    ) -> UserResult<Uuid> {
        // Ensure the owner still exists before upserting the token.
        self.get(user_id).await?;

        let token_id = self
            .user_repo
            .register_device_token(InsertDeviceTokenEntity {
                user_id,
                token: model.token,
                platform: model.platform,
            })
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: device token registration failed");
                UserError::Internal(err)
            })?;

        info!(%user_id, %token_id, "users: device token registered");
        Ok(token_id)
    }

    pub async fn remove_device_token(&self, token: &str) -> UserResult<()> {
        let removed = self
            .user_repo
            .remove_device_token(token)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "users: device token removal failed");
                UserError::Internal(err)
            })?;

        if !removed {
            warn!("users: device token not found for removal");
            return Err(UserError::TokenNotFound);
        }

        info!("users: device token removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::users::UserEntity,
        repositories::users::MockUserRepository,
        value_objects::users::{RoleProfile, SellerProfile},
    };

    fn seller_profile() -> RoleProfile {
        RoleProfile::Seller(SellerProfile {
            shop_name: "Tienda Flor".to_string(),
            shop_description: None,
            tax_id: None,
        })
    }

    fn user_entity(user_id: Uuid, email: &str) -> UserEntity {
        UserEntity {
            id: user_id,
            email: email.to_string(),
            display_name: "Flor".to_string(),
            avatar_url: None,
            phone: None,
            active_role: "seller".to_string(),
            role_profile: serde_json::to_value(seller_profile()).unwrap(),
            status: "active".to_string(),
            wallet_balance_minor: 0,
            deleted: false,
            deleted_at: None,
            deleted_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn creation_lowercases_email_and_tags_the_role() {
        let mut user_repo = MockUserRepository::new();
        let user_id = Uuid::new_v4();

        user_repo
            .expect_find_by_email()
            .returning(|_| Box::pin(async { Ok(None) }));
        user_repo
            .expect_create()
            .withf(|insert| {
                insert.email == "flor@example.com"
                    && insert.active_role == "seller"
                    && insert.role_profile["role"] == "seller"
                    && insert.status == "pending_verification"
                    && insert.wallet_balance_minor == 0
            })
            .returning(move |_| Box::pin(async move { Ok(user_id) }));

        let usecase = UserUseCase::new(Arc::new(user_repo));
        let created = usecase
            .create(CreateUserModel {
                email: " Flor@Example.com ".to_string(),
                display_name: "Flor".to_string(),
                avatar_url: None,
                phone: None,
                profile: seller_profile(),
            })
            .await
            .unwrap();

        assert_eq!(created, user_id);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_email().returning(|_| {
            let existing = user_entity(Uuid::new_v4(), "flor@example.com");
            Box::pin(async move { Ok(Some(existing)) })
        });
        user_repo.expect_create().times(0);

        let usecase = UserUseCase::new(Arc::new(user_repo));
        let result = usecase
            .create(CreateUserModel {
                email: "flor@example.com".to_string(),
                display_name: "Flor".to_string(),
                avatar_url: None,
                phone: None,
                profile: seller_profile(),
            })
            .await;

        assert!(matches!(result, Err(UserError::EmailTaken)));
    }

    #[tokio::test]
    async fn token_registration_requires_the_user_to_exist() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));
        user_repo.expect_register_device_token().times(0);

        let usecase = UserUseCase::new(Arc::new(user_repo));
        let result = usecase
            .register_device_token(
                Uuid::new_v4(),
                RegisterDeviceTokenModel {
                    token: "fcm-token".to_string(),
                    platform: "android".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::NotFound)));
    }

    #[tokio::test]
    async fn removing_an_unknown_token_is_not_found() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_remove_device_token()
            .returning(|_| Box::pin(async { Ok(false) }));

        let usecase = UserUseCase::new(Arc::new(user_repo));
        let result = usecase.remove_device_token("gone").await;

        assert!(matches!(result, Err(UserError::TokenNotFound)));
    }
}
