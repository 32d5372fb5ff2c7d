//! Expense operations.
//!
//! Every mutation pairs the expense write with the owner's running-total
//! update inside one transaction, so the invariant
//! `total_expenses_minor == Σ live expense amounts` holds at every committed
//! state.

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Expense, RecordExpenseCmd, ResultEngine, ReviseExpenseCmd, expenses,
};

use super::{Engine, with_tx};

impl Engine {
    /// Create an expense and add its amount to the owner's total.
    pub async fn record_expense(&self, cmd: RecordExpenseCmd) -> ResultEngine<Expense> {
        let expense = Expense::new(
            cmd.user_id.clone(),
            cmd.amount_minor,
            cmd.description.trim().to_string(),
            cmd.category.trim().to_string(),
            Utc::now(),
        )?;

        with_tx!(self, |db_tx| {
            self.insert_expense(&db_tx, &expense).await
        })?;

        Ok(expense)
    }

    async fn insert_expense(
        &self,
        db_tx: &DatabaseTransaction,
        expense: &Expense,
    ) -> ResultEngine<()> {
        self.require_user(db_tx, &expense.user_id).await?;
        expenses::ActiveModel::from(expense).insert(db_tx).await?;
        self.apply_total_delta(db_tx, &expense.user_id, expense.amount_minor)
            .await?;
        Ok(())
    }

    /// Rewrite an expense's fields; the amount delta lands on the owner's
    /// total within the same transaction.
    pub async fn revise_expense(&self, cmd: ReviseExpenseCmd) -> ResultEngine<Expense> {
        if cmd.amount_minor <= 0 {
            return Err(EngineError::Validation(
                "amount_minor must be > 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            self.revise_expense_in(&db_tx, &cmd).await
        })
    }

    async fn revise_expense_in(
        &self,
        db_tx: &DatabaseTransaction,
        cmd: &ReviseExpenseCmd,
    ) -> ResultEngine<Expense> {
        let model = self
            .require_expense_owned(db_tx, cmd.expense_id, &cmd.user_id)
            .await?;
        let delta_minor = cmd.amount_minor - model.amount_minor;

        let active = expenses::ActiveModel {
            id: ActiveValue::Set(model.id.clone()),
            amount_minor: ActiveValue::Set(cmd.amount_minor),
            description: ActiveValue::Set(cmd.description.trim().to_string()),
            category: ActiveValue::Set(cmd.category.trim().to_string()),
            ..Default::default()
        };
        let updated = active.update(db_tx).await?;

        if delta_minor != 0 {
            self.apply_total_delta(db_tx, &cmd.user_id, delta_minor)
                .await?;
        }

        Expense::try_from(updated)
    }

    /// Delete an expense and subtract its amount from the owner's total.
    pub async fn remove_expense(&self, expense_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.remove_expense_in(&db_tx, expense_id, user_id).await
        })
    }

    async fn remove_expense_in(
        &self,
        db_tx: &DatabaseTransaction,
        expense_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<()> {
        let model = self
            .require_expense_owned(db_tx, expense_id, user_id)
            .await?;
        let amount_minor = model.amount_minor;
        model.delete(db_tx).await?;
        self.apply_total_delta(db_tx, user_id, -amount_minor)
            .await?;
        Ok(())
    }

    /// Lists all expenses owned by a user, oldest first.
    pub async fn list_expenses(&self, user_id: &str) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(user_id.to_string()))
            .order_by_asc(expenses::Column::CreatedAt)
            .all(&self.database)
            .await?;

        models.into_iter().map(Expense::try_from).collect()
    }
}
