// 缓存模块
// 包含缓存键、存储接口以及路由级响应缓存中间件

pub mod keys;
#[cfg(test)]
mod memory;
pub mod middleware;
pub mod store;

pub use middleware::{ResponseCache, X_CACHE, cache_response};
#[cfg(test)]
pub use memory::MemoryStore;
pub use store::{CacheError, CacheStore, RedisStore};
