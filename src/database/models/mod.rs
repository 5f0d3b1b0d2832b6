/// 数据库实体定义
pub mod book;
pub mod transaction;

pub use book::{Book, BookMatch, UserLastBook};
pub use transaction::{BorrowingTransaction, IssueStatus};
