//! Premium leaderboard endpoint.

use api_types::leaderboard::LeaderboardEntry;
use axum::{Extension, Json, extract::State};

use crate::{
    ServerError,
    server::{AuthUser, ServerState},
};

pub async fn show(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<LeaderboardEntry>>, ServerError> {
    if !user.is_premium {
        return Err(ServerError::Forbidden(
            "leaderboard is a premium feature".to_string(),
        ));
    }

    let users = state.engine.leaderboard().await?;

    Ok(Json(
        users
            .into_iter()
            .map(|user| LeaderboardEntry {
                name: user.name,
                total_expenses: user.total_expenses_minor,
            })
            .collect(),
    ))
}
