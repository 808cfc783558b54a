pub mod active_plan_statuses;
pub mod plan_types;
pub mod receipt_statuses;
pub mod rejection_reasons;
pub mod user_roles;
pub mod user_statuses;
pub mod wallet_statuses;
