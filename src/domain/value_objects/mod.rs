pub mod active_plans;
pub mod categories;
pub mod enums;
pub mod pagination;
pub mod plans;
pub mod receipts;
pub mod subcategories;
pub mod users;
