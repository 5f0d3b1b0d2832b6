use serde::{Deserialize, Serialize};

/// 每页图书数
pub const BOOKS_PER_PAGE: i64 = 8;

/// 最新图书与热门图书各取几本
pub const SHOWCASE_LIMIT: i64 = 4;

/// 分类搜索请求体
#[derive(Debug, Default, Deserialize)]
pub struct CategorySearch {
    #[serde(default)]
    pub user_input_category: String,
}

#[derive(Debug, Serialize)]
pub struct CategorySearchResponse {
    pub success: bool,
    pub book_category: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// 缺失、无法解析或小于 1 的页码都视为第一页
    pub fn offset(&self) -> i64 {
        let page = self
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        (page - 1).saturating_mul(BOOKS_PER_PAGE)
    }
}
