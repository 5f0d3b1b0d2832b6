mod handler;
mod model;

pub use handler::{
    get_all_categories, get_featured_books, get_limited_books, get_popular_books,
    get_recent_books, get_similar_books, search_categories,
};
pub use model::{
    BOOKS_PER_PAGE, CategorySearch, CategorySearchResponse, PageQuery, SHOWCASE_LIMIT,
};
