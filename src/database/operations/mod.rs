/// 数据库操作实现
pub mod library;

pub use library::PgLibrary;
