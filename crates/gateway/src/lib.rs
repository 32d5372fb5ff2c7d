//! Payment gateway client.
//!
//! Implements [`engine::PaymentGateway`] against the gateway's REST order
//! API: one authenticated `POST /v1/orders` per purchase. The engine never
//! sees HTTP; failures surface as [`engine::EngineError::Gateway`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use engine::{EngineError, GatewayOrder, PaymentGateway, ResultEngine};

const ORDER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
}

#[derive(Deserialize)]
struct CreateOrderReply {
    id: String,
    amount: i64,
    currency: String,
}

/// Gateway client holding the API key pair.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: reqwest::Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

impl HttpGateway {
    /// Build a client for the given gateway endpoint and key pair.
    pub fn new(
        base_url: impl Into<String>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
    ) -> ResultEngine<Self> {
        let client = reqwest::Client::builder()
            .timeout(ORDER_TIMEOUT)
            .build()
            .map_err(|error| EngineError::Gateway(error.to_string()))?;

        Ok(Self {
            client,
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl PaymentGateway for HttpGateway {
    fn key_id(&self) -> &str {
        &self.key_id
    }

    async fn create_order(&self, amount_minor: i64, currency: &str) -> ResultEngine<GatewayOrder> {
        let url = format!("{}/v1/orders", self.base_url);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&CreateOrderBody {
                amount: amount_minor,
                currency,
            })
            .send()
            .await
            .map_err(|error| EngineError::Gateway(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, %body, "gateway rejected order creation");
            return Err(EngineError::Gateway(format!(
                "order creation failed with status {status}"
            )));
        }

        let reply: CreateOrderReply = response
            .json()
            .await
            .map_err(|error| EngineError::Gateway(error.to_string()))?;

        Ok(GatewayOrder {
            id: reply.id,
            amount_minor: reply.amount,
            currency: reply.currency,
        })
    }
}
