// 内存实现
// 只用于测试，语义与 Postgres 实现保持一致

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::database::models::{Book, BookMatch, BorrowingTransaction, IssueStatus, UserLastBook};
use crate::database::{Library, LibraryError};

#[derive(Default)]
struct Collections {
    books: Vec<Book>,
    transactions: Vec<BorrowingTransaction>,
    last_books: Vec<UserLastBook>,
    issue_counts: Vec<(Uuid, i64)>,
}

/// 以插入顺序保存文档的内存图书馆
#[derive(Default)]
pub struct MemoryLibrary {
    inner: RwLock<Collections>,
    pool_queries: AtomicUsize,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Collections> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Collections> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// 新增一本可借图书，返回其ID
    pub fn add_book(&self, title: &str, author: &str, category: &str, language: &str) -> Uuid {
        let book = Book {
            id: Uuid::new_v4(),
            title: title.to_string(),
            author: author.to_string(),
            category: category.to_string(),
            language: language.to_string(),
            available: true,
            featured: false,
            description: String::new(),
            created_at: Utc::now(),
        };
        let id = book.id;
        self.write().books.push(book);
        id
    }

    pub fn set_available(&self, book_id: Uuid, available: bool) {
        if let Some(book) = self.write().books.iter_mut().find(|b| b.id == book_id) {
            book.available = available;
        }
    }

    pub fn set_featured(&self, book_id: Uuid, featured: bool) {
        if let Some(book) = self.write().books.iter_mut().find(|b| b.id == book_id) {
            book.featured = featured;
        }
    }

    /// 借出次数加一
    pub fn record_issue(&self, book_id: Uuid) {
        let mut inner = self.write();
        match inner.issue_counts.iter().position(|(id, _)| *id == book_id) {
            Some(i) => inner.issue_counts[i].1 += 1,
            None => inner.issue_counts.push((book_id, 1)),
        }
    }

    pub fn add_transaction(&self, user_id: &str, book_id: Uuid, status: IssueStatus) -> Uuid {
        let mut inner = self.write();
        let book_title = inner
            .books
            .iter()
            .find(|b| b.id == book_id)
            .map(|b| b.title.clone())
            .unwrap_or_default();
        let transaction = BorrowingTransaction {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            book_id,
            book_title,
            user_email: format!("{}@library.test", user_id),
            username: user_id.to_string(),
            issue_status: status,
            is_returned: status == IssueStatus::Returned,
            issue_date: None,
            return_date: None,
            extra_charge: 0,
        };
        let id = transaction.id;
        inner.transactions.push(transaction);
        id
    }

    /// 记录用户最近借阅的图书（存在则覆盖）
    pub fn set_last_borrowed(&self, user_id: &str, book_id: Uuid) {
        let mut inner = self.write();
        match inner.last_books.iter().position(|r| r.user_id == user_id) {
            Some(i) => inner.last_books[i].last_borrowed_book_id = book_id,
            None => inner.last_books.push(UserLastBook {
                user_id: user_id.to_string(),
                last_borrowed_book_id: book_id,
            }),
        }
    }

    /// 候选池查询被调用的次数
    pub fn pool_queries(&self) -> usize {
        self.pool_queries.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Library for MemoryLibrary {
    async fn accepted_book_ids(&self, user_id: &str) -> Result<Vec<Uuid>, LibraryError> {
        Ok(self
            .read()
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id && t.issue_status == IssueStatus::Accepted)
            .map(|t| t.book_id)
            .collect())
    }

    async fn books_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Book>, LibraryError> {
        Ok(self
            .read()
            .books
            .iter()
            .filter(|b| ids.contains(&b.id))
            .cloned()
            .collect())
    }

    async fn book_by_id(&self, id: Uuid) -> Result<Option<Book>, LibraryError> {
        Ok(self.read().books.iter().find(|b| b.id == id).cloned())
    }

    async fn available_books_in_languages(
        &self,
        languages: &[String],
        excluded: &[Uuid],
    ) -> Result<Vec<Book>, LibraryError> {
        self.pool_queries.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .read()
            .books
            .iter()
            .filter(|b| b.available && languages.contains(&b.language) && !excluded.contains(&b.id))
            .cloned()
            .collect())
    }

    async fn available_books_matching(
        &self,
        filter: BookMatch<'_>,
        excluded: Uuid,
        limit: i64,
    ) -> Result<Vec<Book>, LibraryError> {
        Ok(self
            .read()
            .books
            .iter()
            .filter(|b| b.available && b.id != excluded && filter.matches(b))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn last_borrowed_book(
        &self,
        user_id: &str,
    ) -> Result<Option<UserLastBook>, LibraryError> {
        Ok(self
            .read()
            .last_books
            .iter()
            .find(|r| r.user_id == user_id)
            .cloned())
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, LibraryError> {
        let categories: BTreeSet<String> =
            self.read().books.iter().map(|b| b.category.clone()).collect();
        Ok(categories.into_iter().collect())
    }

    async fn books_page(&self, limit: i64, offset: i64) -> Result<Vec<Book>, LibraryError> {
        Ok(self
            .read()
            .books
            .iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn not_returned_transactions(&self) -> Result<Vec<BorrowingTransaction>, LibraryError> {
        Ok(self
            .read()
            .transactions
            .iter()
            .filter(|t| t.issue_status == IssueStatus::Accepted && !t.is_returned)
            .cloned()
            .collect())
    }

    async fn featured_books(&self) -> Result<Vec<Book>, LibraryError> {
        Ok(self.read().books.iter().filter(|b| b.featured).cloned().collect())
    }

    async fn recent_books(&self, limit: i64) -> Result<Vec<Book>, LibraryError> {
        Ok(self
            .read()
            .books
            .iter()
            .rev()
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn popular_books(&self, limit: i64) -> Result<Vec<Book>, LibraryError> {
        let inner = self.read();
        let count = |id: Uuid| {
            inner
                .issue_counts
                .iter()
                .find(|(book_id, _)| *book_id == id)
                .map(|(_, n)| *n)
        };
        let mut ranked: Vec<(i64, &Book)> = inner
            .books
            .iter()
            .filter_map(|b| count(b.id).map(|n| (n, b)))
            .collect();
        // 稳定排序，次数相同时保持插入顺序
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(ranked
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|(_, b)| b.clone())
            .collect())
    }

    async fn categories_matching(&self, fragment: &str) -> Result<Vec<String>, LibraryError> {
        let needle = fragment.to_lowercase();
        let categories: BTreeSet<String> = self
            .read()
            .books
            .iter()
            .filter(|b| b.category.to_lowercase().contains(&needle))
            .map(|b| b.category.clone())
            .collect();
        Ok(categories.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn language_pool_honours_exclusions_and_availability() {
        let library = MemoryLibrary::new();
        let a = library.add_book("A", "x", "Fiction", "en");
        let b = library.add_book("B", "y", "Fiction", "en");
        let c = library.add_book("C", "z", "Fiction", "fr");
        let d = library.add_book("D", "w", "Fiction", "en");
        library.set_available(d, false);

        let pool = library
            .available_books_in_languages(&["en".to_string()], &[a])
            .await
            .unwrap();
        let ids: Vec<Uuid> = pool.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![b]);
        assert!(!ids.contains(&c));
        assert_eq!(library.pool_queries(), 1);
    }

    #[tokio::test]
    async fn pages_follow_insertion_order() {
        let library = MemoryLibrary::new();
        let ids: Vec<Uuid> = (0..10)
            .map(|i| library.add_book(&format!("T{}", i), "a", "c", "en"))
            .collect();

        let second = library.books_page(8, 8).await.unwrap();
        assert_eq!(second.iter().map(|b| b.id).collect::<Vec<_>>(), ids[8..].to_vec());
    }

    #[tokio::test]
    async fn popular_books_rank_by_issue_count() {
        let library = MemoryLibrary::new();
        let a = library.add_book("A", "x", "c", "en");
        let b = library.add_book("B", "x", "c", "en");
        let c = library.add_book("C", "x", "c", "en");
        library.add_book("Never issued", "x", "c", "en");
        library.record_issue(a);
        for _ in 0..3 {
            library.record_issue(c);
        }
        library.record_issue(b);

        let popular = library.popular_books(4).await.unwrap();
        assert_eq!(popular.iter().map(|b| b.id).collect::<Vec<_>>(), vec![c, a, b]);
    }

    #[tokio::test]
    async fn category_search_is_case_insensitive_substring() {
        let library = MemoryLibrary::new();
        library.add_book("A", "x", "Science Fiction", "en");
        library.add_book("B", "x", "science", "en");
        library.add_book("C", "x", "History", "en");

        let found = library.categories_matching("SCI").await.unwrap();
        assert_eq!(found, vec!["Science Fiction".to_string(), "science".to_string()]);
    }
}
