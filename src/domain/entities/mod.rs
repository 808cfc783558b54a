pub mod active_plans;
pub mod categories;
pub mod order_payment_receipts;
pub mod payment_receipts;
pub mod subcategories;
pub mod users;
pub mod wallet_transactions;
