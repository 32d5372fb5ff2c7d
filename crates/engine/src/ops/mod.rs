use std::sync::Arc;
use std::time::Duration;

use sea_orm::{DatabaseConnection, DbErr};

use crate::{EngineError, PaymentGateway, ResultEngine};

mod access;
mod expenses;
mod purchases;
mod users;

pub use purchases::{PREMIUM_TIER_PRICE_MINOR, PurchaseInitiated, PurchaseOutcome};

const TX_RETRY_LIMIT: u32 = 5;

fn is_busy(err: &DbErr) -> bool {
    let msg = err.to_string().to_lowercase();
    msg.contains("database is locked") || msg.contains("busy")
}

async fn retry_backoff(attempt: u32) {
    tokio::time::sleep(Duration::from_millis(10 * u64::from(attempt))).await;
}

/// Run a block inside a DB transaction, committing on success and rolling
/// back on error. Writer conflicts (SQLite busy/locked) are retried with a
/// short backoff; the block must therefore be safe to re-execute.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let mut attempt: u32 = 0;
        loop {
            let $tx = $self.database.begin().await?;
            let result = $body;
            match result {
                Ok(value) => match $tx.commit().await {
                    Ok(()) => break Ok(value),
                    Err(err)
                        if $crate::ops::is_busy(&err) && attempt < $crate::ops::TX_RETRY_LIMIT =>
                    {
                        attempt += 1;
                        $crate::ops::retry_backoff(attempt).await;
                    }
                    Err(err) => break Err($crate::EngineError::from(err)),
                },
                Err($crate::EngineError::Database(err))
                    if $crate::ops::is_busy(&err) && attempt < $crate::ops::TX_RETRY_LIMIT =>
                {
                    attempt += 1;
                    $crate::ops::retry_backoff(attempt).await;
                }
                Err(err) => break Err(err),
            }
        }
    }};
}

pub(crate) use with_tx;

pub struct Engine {
    database: DatabaseConnection,
    gateway: Arc<dyn PaymentGateway>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    gateway: Option<Arc<dyn PaymentGateway>>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Pass the required payment gateway
    pub fn gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> EngineBuilder {
        self.gateway = Some(gateway);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let gateway = self
            .gateway
            .ok_or_else(|| EngineError::Validation("payment gateway is required".to_string()))?;
        Ok(Engine {
            database: self.database,
            gateway,
        })
    }
}
