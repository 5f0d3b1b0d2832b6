use std::sync::Arc;

use axum::{Router, middleware::from_fn, middleware::from_fn_with_state, routing::get};
use config::Config;

use cache::{CacheStore, ResponseCache, cache_response};
use database::Library;
use middleware::{admin_middleware, auth_middleware, log_errors};
use recommendation::Recommender;

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod recommendation;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub library: Arc<dyn Library>,
    pub cache_store: Arc<dyn CacheStore>,
    pub recommender: Recommender,
    pub config: Config,
}

impl AppState {
    pub fn new(library: Arc<dyn Library>, cache_store: Arc<dyn CacheStore>, config: Config) -> Self {
        Self {
            recommender: Recommender::new(library.clone()),
            library,
            cache_store,
            config,
        }
    }

    fn response_cache(&self, ttl: std::time::Duration) -> ResponseCache {
        ResponseCache::new(self.cache_store.clone(), ttl, self.config.cache_timeout())
    }
}

/// 组装全部路由
pub fn app(state: AppState) -> Router {
    let config = &state.config;

    // 分类列表（只缓存 GET，搜索走 POST）
    let categories = Router::new()
        .route(
            "/book_category",
            get(routes::book::get_all_categories).post(routes::book::search_categories),
        )
        .route_layer(from_fn_with_state(
            state.response_cache(config.categories_ttl()),
            cache_response,
        ));

    // 分页图书
    let books = Router::new()
        .route("/book", get(routes::book::get_limited_books))
        .route_layer(from_fn_with_state(
            state.response_cache(config.books_ttl()),
            cache_response,
        ));

    // 管理员：未归还图书
    let not_returned = Router::new()
        .route(
            "/requestBooks/notreturnedbooks",
            get(routes::request::get_not_returned_books),
        )
        .route_layer(from_fn_with_state(
            state.response_cache(config.not_returned_ttl()),
            cache_response,
        ))
        .route_layer(from_fn(admin_middleware))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let recommended = Router::new()
        .route(
            "/recommendedBooks",
            get(routes::recommendation::get_recommended_books),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let public = Router::new()
        .route("/featuredBooks", get(routes::book::get_featured_books))
        .route("/recentBooks", get(routes::book::get_recent_books))
        .route("/popularBooks", get(routes::book::get_popular_books))
        .route(
            "/similarBooks/{book_id}",
            get(routes::book::get_similar_books),
        );

    let api = Router::new()
        .merge(categories)
        .merge(books)
        .merge(not_returned)
        .merge(recommended)
        .merge(public);

    Router::new()
        .nest(&config.api_base_uri, api)
        .layer(from_fn(log_errors))
        .with_state(state)
}
