use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    AppState,
    error::AppError,
    recommendation::similar_books,
    utils::{data_response, list_response},
};

use super::model::{
    BOOKS_PER_PAGE, CategorySearch, CategorySearchResponse, PageQuery, SHOWCASE_LIMIT,
};

/// 所有图书分类（去重）
#[axum::debug_handler]
pub async fn get_all_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let categories = state.library.distinct_categories().await?;
    Ok(data_response(categories))
}

/// 按名称片段搜索分类
#[axum::debug_handler]
pub async fn search_categories(
    State(state): State<AppState>,
    Json(search): Json<CategorySearch>,
) -> Result<impl IntoResponse, AppError> {
    let categories = state
        .library
        .categories_matching(&search.user_input_category)
        .await?;
    Ok(Json(CategorySearchResponse {
        success: true,
        book_category: categories,
    }))
}

/// 分页获取图书
#[axum::debug_handler]
pub async fn get_limited_books(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let books = state
        .library
        .books_page(BOOKS_PER_PAGE, query.offset())
        .await?;
    Ok(list_response(books))
}

#[axum::debug_handler]
pub async fn get_similar_books(
    State(state): State<AppState>,
    Path(book_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    match similar_books(state.library.as_ref(), book_id).await? {
        Some(books) => Ok(data_response(books)),
        None => Err(AppError::NotFound("Original book")),
    }
}

#[axum::debug_handler]
pub async fn get_featured_books(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let books = state.library.featured_books().await?;
    Ok(list_response(books))
}

/// 最新加入的几本图书
#[axum::debug_handler]
pub async fn get_recent_books(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let books = state.library.recent_books(SHOWCASE_LIMIT).await?;
    Ok(list_response(books))
}

/// 借出次数最多的几本图书
#[axum::debug_handler]
pub async fn get_popular_books(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let books = state.library.popular_books(SHOWCASE_LIMIT).await?;
    Ok(list_response(books))
}
