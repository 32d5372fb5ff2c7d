use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use std::sync::Arc;

use crate::{Credentials, expenses, leaderboard, purchase, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub credentials: Credentials,
}

/// Authenticated caller, inserted by the [`auth`] middleware.
///
/// The premium flag comes from the token, not the database, so it reflects
/// the moment the token was issued.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub is_premium: bool,
}

async fn auth(
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(header)) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    let claims = state
        .credentials
        .verify(header.token())
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(AuthUser {
        id: claims.sub,
        is_premium: claims.ispremiumuser,
    });
    Ok(next.run(request).await)
}

pub fn router(engine: Engine, credentials: Credentials) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
        credentials,
    };

    let protected = Router::new()
        .route("/expense/add-expense", post(expenses::add))
        .route("/expense/get-expenses", get(expenses::list))
        .route("/expense/edit-expense/{id}", put(expenses::edit))
        .route("/expense/delete-expense/{id}", delete(expenses::remove))
        .route("/purchase/premiummembership", post(purchase::premium_membership))
        .route(
            "/purchase/updatetransactionstatus",
            post(purchase::update_transaction_status),
        )
        .route("/premium/show-leaderboard", get(leaderboard::show))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/user/add-user", post(user::signup))
        .route("/user/login", post(user::login))
        .merge(protected)
        .with_state(state)
}

pub async fn run(engine: Engine, credentials: Credentials) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, credentials, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    credentials: Credentials,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine, credentials)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    credentials: Credentials,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, credentials, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
