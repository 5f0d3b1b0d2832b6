use uuid::Uuid;

use crate::database::{Book, BookMatch, Library, LibraryError};

const SIMILAR_LIMIT: i64 = 4;

/// 与指定图书相似的可借图书
///
/// 优先同分类，同分类一本都没有时退回同语言。原书不存在时返回 `None`。
pub async fn similar_books(
    library: &dyn Library,
    book_id: Uuid,
) -> Result<Option<Vec<Book>>, LibraryError> {
    let Some(original) = library.book_by_id(book_id).await? else {
        return Ok(None);
    };

    let same_category = library
        .available_books_matching(BookMatch::Category(&original.category), book_id, SIMILAR_LIMIT)
        .await?;
    if !same_category.is_empty() {
        return Ok(Some(same_category));
    }

    let same_language = library
        .available_books_matching(BookMatch::Language(&original.language), book_id, SIMILAR_LIMIT)
        .await?;
    Ok(Some(same_language))
}
