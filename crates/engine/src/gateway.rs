//! Payment gateway abstraction.
//!
//! The engine never talks HTTP itself; purchase initiation goes through this
//! trait so the remote provider can be swapped for a stub in tests.

use async_trait::async_trait;

use crate::ResultEngine;

/// An order created on the remote payment provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayOrder {
    pub id: String,
    pub amount_minor: i64,
    pub currency: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key identifier handed to clients for checkout integration.
    fn key_id(&self) -> &str;

    /// Creates a remote order for the given amount. Any provider failure or
    /// timeout must surface as [`EngineError::Gateway`] and leave no trace.
    ///
    /// [`EngineError::Gateway`]: crate::EngineError::Gateway
    async fn create_order(&self, amount_minor: i64, currency: &str) -> ResultEngine<GatewayOrder>;
}
