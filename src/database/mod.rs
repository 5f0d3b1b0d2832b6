// 数据库模块
// 包含实体定义、查询接口以及 Postgres 实现，内存实现只在测试中编译

#[cfg(test)]
mod memory;
pub mod models;
pub mod operations;

use async_trait::async_trait;
use uuid::Uuid;

#[cfg(test)]
pub use memory::MemoryLibrary;
pub use models::{Book, BookMatch, BorrowingTransaction, IssueStatus, UserLastBook};
pub use operations::PgLibrary;

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// 图书馆文档查询接口
///
/// 过滤只有精确匹配、集合包含与集合排除（分类搜索除外），结果默认按插入顺序返回。
#[async_trait]
pub trait Library: Send + Sync {
    /// 用户所有 ACCEPTED 借阅记录对应的图书ID
    async fn accepted_book_ids(&self, user_id: &str) -> Result<Vec<Uuid>, LibraryError>;

    async fn books_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Book>, LibraryError>;

    async fn book_by_id(&self, id: Uuid) -> Result<Option<Book>, LibraryError>;

    /// 可借且语言在 `languages` 中的图书，排除 `excluded` 中的ID
    async fn available_books_in_languages(
        &self,
        languages: &[String],
        excluded: &[Uuid],
    ) -> Result<Vec<Book>, LibraryError>;

    /// 可借且满足 `filter` 的图书，排除 `excluded`，最多 `limit` 本
    async fn available_books_matching(
        &self,
        filter: BookMatch<'_>,
        excluded: Uuid,
        limit: i64,
    ) -> Result<Vec<Book>, LibraryError>;

    async fn last_borrowed_book(&self, user_id: &str)
    -> Result<Option<UserLastBook>, LibraryError>;

    async fn distinct_categories(&self) -> Result<Vec<String>, LibraryError>;

    async fn books_page(&self, limit: i64, offset: i64) -> Result<Vec<Book>, LibraryError>;

    /// 已借出 (ACCEPTED) 但尚未归还的记录
    async fn not_returned_transactions(&self) -> Result<Vec<BorrowingTransaction>, LibraryError>;

    async fn featured_books(&self) -> Result<Vec<Book>, LibraryError>;

    /// 最新加入的图书，新的在前
    async fn recent_books(&self, limit: i64) -> Result<Vec<Book>, LibraryError>;

    /// 借出次数最多的图书，按次数降序
    async fn popular_books(&self, limit: i64) -> Result<Vec<Book>, LibraryError>;

    /// 名称包含 `fragment` 的分类（不区分大小写，按字面匹配）
    async fn categories_matching(&self, fragment: &str) -> Result<Vec<String>, LibraryError>;
}
