//! Premium purchase operations.
//!
//! An order is created `Pending` only after the gateway accepted the remote
//! order, and settles exactly once from the gateway callback. The premium
//! flag flips in the same transaction as the order status.

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    ApplyTransactionResultCmd, EngineError, Order, OrderStatus, ResultEngine, User, orders, users,
};

use super::{Engine, with_tx};

/// Price of the premium tier, in minor currency units.
pub const PREMIUM_TIER_PRICE_MINOR: i64 = 2500;
const PREMIUM_TIER_CURRENCY: &str = "INR";

/// Result of [`Engine::initiate_purchase`]: the local pending order plus the
/// gateway key the client needs for checkout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseInitiated {
    pub order: Order,
    pub key_id: String,
}

/// Result of [`Engine::apply_transaction_result`]: the settled order and the
/// user row as of the same commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseOutcome {
    pub order: Order,
    pub user: User,
}

impl Engine {
    /// Create a remote order on the gateway, then record it locally as
    /// `Pending`. A gateway failure or timeout leaves no local state.
    pub async fn initiate_purchase(&self, user_id: &str) -> ResultEngine<PurchaseInitiated> {
        let remote = self
            .gateway
            .create_order(PREMIUM_TIER_PRICE_MINOR, PREMIUM_TIER_CURRENCY)
            .await?;

        let order = Order::pending(user_id.to_string(), remote.id, Utc::now());

        with_tx!(self, |db_tx| {
            self.insert_order(&db_tx, &order).await
        })?;

        Ok(PurchaseInitiated {
            order,
            key_id: self.gateway.key_id().to_string(),
        })
    }

    async fn insert_order(&self, db_tx: &DatabaseTransaction, order: &Order) -> ResultEngine<()> {
        self.require_user(db_tx, &order.user_id).await?;
        orders::ActiveModel::from(order).insert(db_tx).await?;
        Ok(())
    }

    /// Settle a pending order from the gateway callback.
    ///
    /// With a payment id the order becomes `Successful` and the user premium;
    /// without one it becomes `Failed` and the premium flag is cleared. Both
    /// writes share one transaction. A callback for an order already settled
    /// is rejected with [`EngineError::TerminalOrder`] and changes nothing.
    pub async fn apply_transaction_result(
        &self,
        cmd: ApplyTransactionResultCmd,
    ) -> ResultEngine<PurchaseOutcome> {
        with_tx!(self, |db_tx| {
            self.apply_transaction_result_in(&db_tx, &cmd).await
        })
    }

    async fn apply_transaction_result_in(
        &self,
        db_tx: &DatabaseTransaction,
        cmd: &ApplyTransactionResultCmd,
    ) -> ResultEngine<PurchaseOutcome> {
        let model = self
            .require_order_owned(db_tx, &cmd.gateway_order_id, &cmd.user_id)
            .await?;
        let status = OrderStatus::try_from(model.status.as_str())?;
        if status.is_terminal() {
            return Err(EngineError::TerminalOrder(cmd.gateway_order_id.clone()));
        }

        let (new_status, premium) = match cmd.payment_id {
            Some(_) => (OrderStatus::Successful, true),
            None => (OrderStatus::Failed, false),
        };

        let order_active = orders::ActiveModel {
            id: ActiveValue::Set(model.id.clone()),
            status: ActiveValue::Set(new_status.as_str().to_string()),
            payment_id: ActiveValue::Set(cmd.payment_id.clone()),
            ..Default::default()
        };
        let updated_order = order_active.update(db_tx).await?;

        let user_active = users::ActiveModel {
            id: ActiveValue::Set(cmd.user_id.clone()),
            is_premium: ActiveValue::Set(premium),
            ..Default::default()
        };
        let updated_user = user_active.update(db_tx).await?;

        Ok(PurchaseOutcome {
            order: Order::try_from(updated_order)?,
            user: User::from(updated_user),
        })
    }

    /// Fetch an order by its gateway identifier, scoped to its owner.
    pub async fn order(&self, gateway_order_id: &str, user_id: &str) -> ResultEngine<Order> {
        let model = orders::Entity::find()
            .filter(orders::Column::GatewayOrderId.eq(gateway_order_id.to_string()))
            .filter(orders::Column::UserId.eq(user_id.to_string()))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("order not exists".to_string()))?;
        Order::try_from(model)
    }
}
