//! Order primitives.
//!
//! An `Order` tracks one premium purchase attempt against the payment
//! gateway. It is created in `Pending` and moves exactly once to
//! `Successful` or `Failed`; both are terminal.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Successful,
    Failed,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Successful => "successful",
            Self::Failed => "failed",
        }
    }

    /// Terminal statuses admit no further transition.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Successful | Self::Failed)
    }
}

impl TryFrom<&str> for OrderStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "successful" => Ok(Self::Successful),
            "failed" => Ok(Self::Failed),
            other => Err(EngineError::Validation(format!(
                "invalid order status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub gateway_order_id: String,
    pub user_id: String,
    pub status: OrderStatus,
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn pending(user_id: String, gateway_order_id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            gateway_order_id,
            user_id,
            status: OrderStatus::Pending,
            payment_id: None,
            created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub gateway_order_id: String,
    pub user_id: String,
    pub status: String,
    pub payment_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Order> for ActiveModel {
    fn from(order: &Order) -> Self {
        Self {
            id: ActiveValue::Set(order.id.to_string()),
            gateway_order_id: ActiveValue::Set(order.gateway_order_id.clone()),
            user_id: ActiveValue::Set(order.user_id.clone()),
            status: ActiveValue::Set(order.status.as_str().to_string()),
            payment_id: ActiveValue::Set(order.payment_id.clone()),
            created_at: ActiveValue::Set(order.created_at),
        }
    }
}

impl TryFrom<Model> for Order {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::Validation("invalid order id".to_string()))?,
            gateway_order_id: model.gateway_order_id,
            user_id: model.user_id,
            status: OrderStatus::try_from(model.status.as_str())?,
            payment_id: model.payment_id,
            created_at: model.created_at,
        })
    }
}
