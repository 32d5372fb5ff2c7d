//! Wire types for the expense tracker HTTP API.
//!
//! Field names follow the JSON contract expected by the existing web client
//! (`newExpenseDetail`, `allExpenses` and friends), so serde renames are the
//! norm here rather than the exception.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SignupNew {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: String,
        pub name: String,
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserCreated {
        pub message: String,
        #[serde(rename = "newUserDetail")]
        pub new_user_detail: UserView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub success: bool,
        pub message: String,
        pub token: String,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        /// Amount in minor currency units.
        pub amount: i64,
        #[serde(default)]
        pub description: String,
        #[serde(default)]
        pub category: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub amount: i64,
        pub description: String,
        pub category: String,
        #[serde(rename = "createdAt")]
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        #[serde(rename = "newExpenseDetail")]
        pub new_expense_detail: ExpenseView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpensesResponse {
        #[serde(rename = "allExpenses")]
        pub all_expenses: Vec<ExpenseView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseUpdated {
        #[serde(rename = "updatedExpense")]
        pub updated_expense: ExpenseView,
    }
}

pub mod purchase {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum OrderStatus {
        Pending,
        Successful,
        Failed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrderView {
        pub id: String,
        pub status: OrderStatus,
        pub amount: i64,
        pub currency: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseCreated {
        pub order: OrderView,
        pub key_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionStatusNew {
        pub order_id: String,
        #[serde(default)]
        pub payment_id: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionOutcome {
        pub success: bool,
        pub message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub token: Option<String>,
    }
}

pub mod leaderboard {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LeaderboardEntry {
        pub name: String,
        /// Running expense total in minor currency units.
        #[serde(rename = "totalExpenses")]
        pub total_expenses: i64,
    }
}
