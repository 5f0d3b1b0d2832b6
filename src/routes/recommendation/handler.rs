use axum::{
    Json,
    extract::{Extension, State},
    response::IntoResponse,
};

use crate::{AppState, error::AppError, utils::Claims};

use super::model::RecommendationResponse;

/// 当前用户的个性化推荐
///
/// 没有最近借阅记录的用户直接返回空列表，不运行推荐算法。
#[axum::debug_handler]
pub async fn get_recommended_books(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let Some(last_book) = state.library.last_borrowed_book(&claims.sub).await? else {
        return Ok(Json(RecommendationResponse::from(Vec::new())));
    };

    let books = state
        .recommender
        .recommend(&claims.sub, last_book.last_borrowed_book_id)
        .await?;
    Ok(Json(RecommendationResponse::from(books)))
}
