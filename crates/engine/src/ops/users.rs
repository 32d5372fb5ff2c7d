//! User operations: registration, credential lookup, leaderboard.

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, NewUserCmd, ResultEngine, User, users};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Register a new user. The email is unique across the store; a
    /// duplicate surfaces as [`EngineError::ExistingKey`].
    pub async fn create_user(&self, cmd: NewUserCmd) -> ResultEngine<User> {
        let name = normalize_required_text(&cmd.name, "name")?;
        let email = normalize_required_text(&cmd.email, "email")?.to_lowercase();
        if cmd.password_hash.is_empty() {
            return Err(EngineError::Validation(
                "password must not be empty".to_string(),
            ));
        }

        let id = Uuid::new_v4().to_string();

        with_tx!(self, |db_tx| {
            self.insert_user(&db_tx, &id, &name, &email, &cmd.password_hash)
                .await
        })?;

        Ok(User {
            id,
            name,
            email,
            total_expenses_minor: 0,
            is_premium: false,
        })
    }

    async fn insert_user(
        &self,
        db_tx: &DatabaseTransaction,
        id: &str,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> ResultEngine<()> {
        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email.to_string()))
            .one(db_tx)
            .await?;
        if existing.is_some() {
            return Err(EngineError::ExistingKey(email.to_string()));
        }

        let user = users::ActiveModel {
            id: ActiveValue::Set(id.to_string()),
            name: ActiveValue::Set(name.to_string()),
            email: ActiveValue::Set(email.to_string()),
            password_hash: ActiveValue::Set(password_hash.to_string()),
            total_expenses_minor: ActiveValue::Set(0),
            is_premium: ActiveValue::Set(false),
        };
        user.insert(db_tx).await?;
        Ok(())
    }

    /// Return a user by id.
    pub async fn user(&self, user_id: &str) -> ResultEngine<User> {
        let model = users::Entity::find_by_id(user_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
        Ok(User::from(model))
    }

    /// Return a user plus their password hash, for login verification.
    pub async fn user_with_hash_by_email(&self, email: &str) -> ResultEngine<(User, String)> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
        let password_hash = model.password_hash.clone();
        Ok((User::from(model), password_hash))
    }

    /// All users ordered by running expense total, highest first.
    pub async fn leaderboard(&self) -> ResultEngine<Vec<User>> {
        let models = users::Entity::find()
            .order_by_desc(users::Column::TotalExpensesMinor)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(User::from).collect())
    }
}
