// 推荐模块
// 个性化推荐算法与相似图书查询

pub mod engine;
pub mod similar;

pub use engine::{MAX_RECOMMENDATIONS, Recommender, UserPreferenceProfile, assemble};
pub use similar::similar_books;
