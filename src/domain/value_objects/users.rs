use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::users::UserEntity,
    value_objects::enums::{user_roles::UserRole, user_statuses::UserStatus},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SellerProfile {
    pub shop_name: String,
    pub shop_description: Option<String>,
    pub tax_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourierProfile {
    pub vehicle_type: String,
    pub license_plate: Option<String>,
    pub coverage_zone: Option<String>,
}

/// Role-specific profile payload, tagged by the user's active role. Replaces
/// the all-optional `sellerProfile`/`courierProfile` fields of the source
/// data model with a variant selected by `active_role`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleProfile {
    Customer,
    Seller(SellerProfile),
    Courier(CourierProfile),
    Admin,
}

impl RoleProfile {
    pub fn role(&self) -> UserRole {
        match self {
            RoleProfile::Customer => UserRole::Customer,
            RoleProfile::Seller(_) => UserRole::Seller,
            RoleProfile::Courier(_) => UserRole::Courier,
            RoleProfile::Admin => UserRole::Admin,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserModel {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub profile: RoleProfile,
    pub status: UserStatus,
    pub wallet_balance_minor: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserEntity> for UserModel {
    type Error = anyhow::Error;

    fn try_from(entity: UserEntity) -> Result<Self, Self::Error> {
        let profile: RoleProfile = serde_json::from_value(entity.role_profile)
            .context("malformed role profile on user")?;
        let status = UserStatus::from_str(&entity.status)
            .with_context(|| format!("unknown user status: {}", entity.status))?;

        Ok(UserModel {
            id: entity.id,
            email: entity.email,
            display_name: entity.display_name,
            avatar_url: entity.avatar_url,
            phone: entity.phone,
            profile,
            status,
            wallet_balance_minor: entity.wallet_balance_minor,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserModel {
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub profile: RoleProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditUserModel {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub profile: Option<RoleProfile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListUsersFilter {
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterDeviceTokenModel {
    pub token: String,
    pub platform: String,
}
