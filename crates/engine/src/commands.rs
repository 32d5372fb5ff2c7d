//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use uuid::Uuid;

/// Create an expense and add its amount to the owner's running total.
#[derive(Clone, Debug)]
pub struct RecordExpenseCmd {
    pub user_id: String,
    pub amount_minor: i64,
    pub description: String,
    pub category: String,
}

impl RecordExpenseCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, amount_minor: i64) -> Self {
        Self {
            user_id: user_id.into(),
            amount_minor,
            description: String::new(),
            category: String::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

/// Rewrite an expense's fields and apply the amount delta to the owner's
/// running total.
#[derive(Clone, Debug)]
pub struct ReviseExpenseCmd {
    pub expense_id: Uuid,
    pub user_id: String,
    pub amount_minor: i64,
    pub description: String,
    pub category: String,
}

/// Register a new user. The password arrives already hashed; the engine
/// never sees the clear text.
#[derive(Clone, Debug)]
pub struct NewUserCmd {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Settle a pending order from the gateway callback. `payment_id` present
/// means the payment went through; absent means it failed.
#[derive(Clone, Debug)]
pub struct ApplyTransactionResultCmd {
    pub user_id: String,
    pub gateway_order_id: String,
    pub payment_id: Option<String>,
}
