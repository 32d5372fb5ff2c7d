//! Users table and the domain user.
//!
//! `total_expenses_minor` is a denormalized running total: at every committed
//! state it equals the sum of the user's live expense amounts. Only the
//! expense operations and the purchase transition mutate this row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub total_expenses_minor: i64,
    pub is_premium: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A user as seen by callers. The password hash never leaves the engine
/// except through [`Engine::user_with_hash_by_email`].
///
/// [`Engine::user_with_hash_by_email`]: crate::Engine::user_with_hash_by_email
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub total_expenses_minor: i64,
    pub is_premium: bool,
}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            total_expenses_minor: model.total_expenses_minor,
            is_premium: model.is_premium,
        }
    }
}
