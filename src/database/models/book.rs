// 图书实体
// 对应数据库中的 books 表

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// 图书实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub category: String,
    pub language: String,
    pub available: bool,
    pub featured: bool,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// 用户最近借阅的图书（推荐算法的锚点）
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserLastBook {
    pub user_id: String,
    pub last_borrowed_book_id: Uuid,
}

/// 按单一字段精确匹配可借图书
#[derive(Debug, Clone, Copy)]
pub enum BookMatch<'a> {
    Category(&'a str),
    Language(&'a str),
}

impl BookMatch<'_> {
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            BookMatch::Category(c) => book.category == *c,
            BookMatch::Language(l) => book.language == *l,
        }
    }
}
