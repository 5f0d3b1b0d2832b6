// 图书馆存储库
// Postgres 上的查询实现

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Book, BookMatch, BorrowingTransaction, IssueStatus, UserLastBook};
use crate::database::{Library, LibraryError};

const BOOK_COLUMNS: &str =
    "id, title, author, category, language, available, featured, description, created_at";

const TRANSACTION_COLUMNS: &str = "id, user_id, book_id, book_title, user_email, username, \
     issue_status, is_returned, issue_date, return_date, extra_charge";

/// 图书馆存储库，处理所有只读查询
#[derive(Clone)]
pub struct PgLibrary {
    pool: PgPool,
}

impl PgLibrary {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Library for PgLibrary {
    async fn accepted_book_ids(&self, user_id: &str) -> Result<Vec<Uuid>, LibraryError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT book_id FROM book_transactions
            WHERE user_id = $1 AND issue_status = $2
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .bind(IssueStatus::Accepted.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn books_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Book>, LibraryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM books WHERE id = ANY($1) ORDER BY created_at, id",
            BOOK_COLUMNS
        );
        let books = sqlx::query_as::<_, Book>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn book_by_id(&self, id: Uuid) -> Result<Option<Book>, LibraryError> {
        let sql = format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS);
        let book = sqlx::query_as::<_, Book>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    async fn available_books_in_languages(
        &self,
        languages: &[String],
        excluded: &[Uuid],
    ) -> Result<Vec<Book>, LibraryError> {
        if languages.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            SELECT {} FROM books
            WHERE available = TRUE
              AND language = ANY($1)
              AND NOT (id = ANY($2))
            ORDER BY created_at, id
            "#,
            BOOK_COLUMNS
        );
        let books = sqlx::query_as::<_, Book>(&sql)
            .bind(languages)
            .bind(excluded)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn available_books_matching(
        &self,
        filter: BookMatch<'_>,
        excluded: Uuid,
        limit: i64,
    ) -> Result<Vec<Book>, LibraryError> {
        let (column, value) = match filter {
            BookMatch::Category(c) => ("category", c),
            BookMatch::Language(l) => ("language", l),
        };

        let sql = format!(
            r#"
            SELECT {} FROM books
            WHERE available = TRUE AND id <> $1 AND {} = $2
            ORDER BY created_at, id
            LIMIT $3
            "#,
            BOOK_COLUMNS, column
        );
        let books = sqlx::query_as::<_, Book>(&sql)
            .bind(excluded)
            .bind(value)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn last_borrowed_book(
        &self,
        user_id: &str,
    ) -> Result<Option<UserLastBook>, LibraryError> {
        let record = sqlx::query_as::<_, UserLastBook>(
            "SELECT user_id, last_borrowed_book_id FROM user_last_books WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, LibraryError> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM books ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn books_page(&self, limit: i64, offset: i64) -> Result<Vec<Book>, LibraryError> {
        let sql = format!(
            "SELECT {} FROM books ORDER BY created_at, id LIMIT $1 OFFSET $2",
            BOOK_COLUMNS
        );
        let books = sqlx::query_as::<_, Book>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn not_returned_transactions(&self) -> Result<Vec<BorrowingTransaction>, LibraryError> {
        let sql = format!(
            r#"
            SELECT {} FROM book_transactions
            WHERE issue_status = $1 AND is_returned = FALSE
            ORDER BY created_at, id
            "#,
            TRANSACTION_COLUMNS
        );
        let transactions = sqlx::query_as::<_, BorrowingTransaction>(&sql)
            .bind(IssueStatus::Accepted.as_str())
            .fetch_all(&self.pool)
            .await?;

        Ok(transactions)
    }

    async fn featured_books(&self) -> Result<Vec<Book>, LibraryError> {
        let sql = format!(
            "SELECT {} FROM books WHERE featured = TRUE ORDER BY created_at, id",
            BOOK_COLUMNS
        );
        let books = sqlx::query_as::<_, Book>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn recent_books(&self, limit: i64) -> Result<Vec<Book>, LibraryError> {
        let sql = format!(
            "SELECT {} FROM books ORDER BY created_at DESC, id DESC LIMIT $1",
            BOOK_COLUMNS
        );
        let books = sqlx::query_as::<_, Book>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn popular_books(&self, limit: i64) -> Result<Vec<Book>, LibraryError> {
        // popular_books 只有 book_id 与 issue_quantity 两列，不会与图书列重名
        let sql = format!(
            r#"
            SELECT {} FROM books
            JOIN popular_books ON popular_books.book_id = books.id
            ORDER BY popular_books.issue_quantity DESC, books.created_at, books.id
            LIMIT $1
            "#,
            BOOK_COLUMNS
        );
        let books = sqlx::query_as::<_, Book>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn categories_matching(&self, fragment: &str) -> Result<Vec<String>, LibraryError> {
        let categories = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT category FROM books
            WHERE category ILIKE $1 ESCAPE '\'
            ORDER BY category
            "#,
        )
        .bind(contains_pattern(fragment))
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }
}

/// 把用户输入转成 LIKE 子串模式，转义其中的通配符
fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
