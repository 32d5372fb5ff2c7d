use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, expenses, orders, users};

use super::Engine;

impl Engine {
    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    /// Loads an expense scoped to its owner. A foreign or missing expense is
    /// indistinguishable to the caller.
    pub(super) async fn require_expense_owned(
        &self,
        db: &DatabaseTransaction,
        expense_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<expenses::Model> {
        expenses::Entity::find_by_id(expense_id.to_string())
            .filter(expenses::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))
    }

    /// Loads an order by its gateway identifier scoped to its owner. The
    /// ownership filter is what keeps a foreign callback from granting
    /// premium to the wrong account.
    pub(super) async fn require_order_owned(
        &self,
        db: &DatabaseTransaction,
        gateway_order_id: &str,
        user_id: &str,
    ) -> ResultEngine<orders::Model> {
        orders::Entity::find()
            .filter(orders::Column::GatewayOrderId.eq(gateway_order_id.to_string()))
            .filter(orders::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("order not exists".to_string()))
    }

    /// Applies a relative delta to the owner's running total. The update is a
    /// single SQL expression, never a read-modify-write in process, so
    /// concurrent commits cannot lose updates.
    pub(super) async fn apply_total_delta(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        delta_minor: i64,
    ) -> ResultEngine<()> {
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::TotalExpensesMinor,
                Expr::col(users::Column::TotalExpensesMinor).add(delta_minor),
            )
            .filter(users::Column::Id.eq(user_id.to_string()))
            .exec(db)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("user not exists".to_string()));
        }
        Ok(())
    }
}
