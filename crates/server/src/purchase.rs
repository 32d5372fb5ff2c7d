//! Premium purchase endpoints.

use api_types::purchase::{
    OrderStatus as ApiStatus, OrderView, PurchaseCreated, TransactionOutcome, TransactionStatusNew,
};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    ServerError,
    server::{AuthUser, ServerState},
};
use engine::{ApplyTransactionResultCmd, OrderStatus, PREMIUM_TIER_PRICE_MINOR};

fn map_status(status: OrderStatus) -> ApiStatus {
    match status {
        OrderStatus::Pending => ApiStatus::Pending,
        OrderStatus::Successful => ApiStatus::Successful,
        OrderStatus::Failed => ApiStatus::Failed,
    }
}

pub async fn premium_membership(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<(StatusCode, Json<PurchaseCreated>), ServerError> {
    let initiated = state.engine.initiate_purchase(&user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(PurchaseCreated {
            order: OrderView {
                id: initiated.order.gateway_order_id,
                status: map_status(initiated.order.status),
                amount: PREMIUM_TIER_PRICE_MINOR,
                currency: "INR".to_string(),
            },
            key_id: initiated.key_id,
        }),
    ))
}

/// Gateway callback relayed by the client after checkout. A present
/// `payment_id` marks the payment as successful; a missing one as failed.
/// On success the response carries a fresh token with the premium flag set.
pub async fn update_transaction_status(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionStatusNew>,
) -> Result<(StatusCode, Json<TransactionOutcome>), ServerError> {
    let outcome = state
        .engine
        .apply_transaction_result(ApplyTransactionResultCmd {
            user_id: user.id,
            gateway_order_id: payload.order_id,
            payment_id: payload.payment_id,
        })
        .await?;

    let response = match outcome.order.status {
        OrderStatus::Successful => {
            let token = state
                .credentials
                .issue(&outcome.user.id, outcome.user.is_premium)?;
            (
                StatusCode::ACCEPTED,
                Json(TransactionOutcome {
                    success: true,
                    message: "Transaction Successful".to_string(),
                    token: Some(token),
                }),
            )
        }
        OrderStatus::Pending | OrderStatus::Failed => (
            StatusCode::OK,
            Json(TransactionOutcome {
                success: false,
                message: "Transaction Failed".to_string(),
                token: None,
            }),
        ),
    };

    Ok(response)
}
