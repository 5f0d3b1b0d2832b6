mod handler;
mod model;

pub use handler::get_recommended_books;
pub use model::RecommendationResponse;
