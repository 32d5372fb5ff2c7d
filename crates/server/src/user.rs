//! Signup and login endpoints.

use api_types::user::{Login, LoginResponse, SignupNew, UserCreated, UserView};
use axum::{Json, extract::State, http::StatusCode};

use crate::{ServerError, passwords, server::ServerState};
use engine::NewUserCmd;

pub async fn signup(
    State(state): State<ServerState>,
    Json(payload): Json<SignupNew>,
) -> Result<(StatusCode, Json<UserCreated>), ServerError> {
    let password_hash = passwords::hash_password(&payload.password)?;

    let user = state
        .engine
        .create_user(NewUserCmd {
            name: payload.name,
            email: payload.email,
            password_hash,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserCreated {
            message: "User created successfully".to_string(),
            new_user_detail: UserView {
                id: user.id,
                name: user.name,
                email: user.email,
            },
        }),
    ))
}

pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<Login>,
) -> Result<Json<LoginResponse>, ServerError> {
    let (user, password_hash) = state.engine.user_with_hash_by_email(&payload.email).await?;

    if !passwords::verify_password(&payload.password, &password_hash) {
        return Err(ServerError::Unauthorized(
            "Password is incorrect".to_string(),
        ));
    }

    let token = state.credentials.issue(&user.id, user.is_premium)?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
    }))
}
