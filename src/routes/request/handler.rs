use axum::{extract::State, response::IntoResponse};

use crate::{AppState, error::AppError, utils::list_response};

/// 已借出但尚未归还的图书（管理员）
#[axum::debug_handler]
pub async fn get_not_returned_books(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let transactions = state.library.not_returned_transactions().await?;
    Ok(list_response(transactions))
}
