//! Core engine for the expense tracker.
//!
//! Two concerns live here:
//!
//! - balance reconciliation: every expense mutation updates the owner's
//!   running total inside the same database transaction;
//! - the purchase lifecycle: orders created against the payment gateway and
//!   settled exactly once by its callback, flipping the premium flag.
//!
//! The HTTP layer lives in the `server` crate; this crate only knows the
//! database and the [`PaymentGateway`] trait.

pub use commands::{ApplyTransactionResultCmd, NewUserCmd, RecordExpenseCmd, ReviseExpenseCmd};
pub use error::EngineError;
pub use expenses::Expense;
pub use gateway::{GatewayOrder, PaymentGateway};
pub use ops::{Engine, EngineBuilder, PREMIUM_TIER_PRICE_MINOR, PurchaseInitiated, PurchaseOutcome};
pub use orders::{Order, OrderStatus};
pub use users::User;

mod commands;
mod error;
mod expenses;
mod gateway;
mod ops;
mod orders;
mod users;

pub type ResultEngine<T> = Result<T, EngineError>;
