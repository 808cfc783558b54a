pub mod active_plans;
pub mod categories;
pub mod order_receipts;
pub mod plan_receipts;
pub mod subcategories;
pub mod users;
pub mod wallet_topups;
