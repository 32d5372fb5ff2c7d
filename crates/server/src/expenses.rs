//! Expense API endpoints.

use api_types::expense::{
    ExpenseCreated, ExpenseNew, ExpenseUpdated, ExpenseView, ExpensesResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{AuthUser, ServerState},
};
use engine::{Expense, RecordExpenseCmd, ReviseExpenseCmd};

fn map_expense(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        amount: expense.amount_minor,
        description: expense.description,
        category: expense.category,
        created_at: expense.created_at,
    }
}

pub async fn add(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseCreated>), ServerError> {
    let expense = state
        .engine
        .record_expense(
            RecordExpenseCmd::new(&user.id, payload.amount)
                .description(payload.description)
                .category(payload.category),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ExpenseCreated {
            new_expense_detail: map_expense(expense),
        }),
    ))
}

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<ExpensesResponse>, ServerError> {
    let expenses = state.engine.list_expenses(&user.id).await?;

    Ok(Json(ExpensesResponse {
        all_expenses: expenses.into_iter().map(map_expense).collect(),
    }))
}

pub async fn edit(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenseNew>,
) -> Result<Json<ExpenseUpdated>, ServerError> {
    let expense = state
        .engine
        .revise_expense(ReviseExpenseCmd {
            expense_id: id,
            user_id: user.id,
            amount_minor: payload.amount,
            description: payload.description,
            category: payload.category,
        })
        .await?;

    Ok(Json(ExpenseUpdated {
        updated_expense: map_expense(expense),
    }))
}

pub async fn remove(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.remove_expense(id, &user.id).await?;
    Ok(StatusCode::OK)
}
