//! 基于内容的图书推荐
//!
//! 由用户已通过 (ACCEPTED) 的借阅历史与最近借阅的锚点图书构造偏好画像，
//! 再按「同作者 > 同分类 > 同语言」的优先级组装最多 4 本推荐。

use std::sync::Arc;

use futures_util::future::try_join;
use uuid::Uuid;

use crate::database::{Book, Library, LibraryError};

/// 推荐列表的最大长度
pub const MAX_RECOMMENDATIONS: usize = 4;

/// 同作者图书最多占用的位置
const SAME_AUTHOR_CAP: usize = 2;

/// 用户偏好画像，三组去重后保持出现顺序的字符串
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UserPreferenceProfile {
    pub categories: Vec<String>,
    pub authors: Vec<String>,
    pub languages: Vec<String>,
}

impl UserPreferenceProfile {
    /// 先吸收历史图书，再吸收锚点图书
    pub fn build(history: &[Book], anchor: Option<&Book>) -> Self {
        let mut profile = Self::default();
        for book in history.iter().chain(anchor) {
            profile.absorb(book);
        }
        profile
    }

    fn absorb(&mut self, book: &Book) {
        push_unique(&mut self.categories, &book.category);
        push_unique(&mut self.authors, &book.author);
        push_unique(&mut self.languages, &book.language);
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

/// 一次推荐调用收集到的输入
struct Gathered {
    read_set: Vec<Uuid>,
    anchor: Option<Book>,
    profile: UserPreferenceProfile,
}

#[derive(Clone)]
pub struct Recommender {
    library: Arc<dyn Library>,
}

impl Recommender {
    pub fn new(library: Arc<dyn Library>) -> Self {
        Self { library }
    }

    /// 为用户生成推荐
    ///
    /// 调用方负责在用户没有任何借阅记录时直接返回空结果。
    pub async fn recommend(
        &self,
        user_id: &str,
        last_borrowed_book_id: Uuid,
    ) -> Result<Vec<Book>, LibraryError> {
        let Gathered {
            read_set,
            anchor,
            profile,
        } = self.gather(user_id, last_borrowed_book_id).await?;

        let pool = if profile.languages.is_empty() {
            Vec::new()
        } else {
            let mut excluded = read_set;
            if !excluded.contains(&last_borrowed_book_id) {
                excluded.push(last_borrowed_book_id);
            }
            self.library
                .available_books_in_languages(&profile.languages, &excluded)
                .await?
        };

        let recommended = assemble(&pool, &profile, anchor.as_ref());
        tracing::debug!(
            "Recommended {} of {} candidates for user {}",
            recommended.len(),
            pool.len(),
            user_id
        );
        Ok(recommended)
    }

    /// 只计算偏好画像，不查询候选池
    pub async fn profile(
        &self,
        user_id: &str,
        last_borrowed_book_id: Uuid,
    ) -> Result<UserPreferenceProfile, LibraryError> {
        Ok(self.gather(user_id, last_borrowed_book_id).await?.profile)
    }

    async fn gather(
        &self,
        user_id: &str,
        last_borrowed_book_id: Uuid,
    ) -> Result<Gathered, LibraryError> {
        // 借阅历史与锚点图书互不依赖，并发查询
        let history = async {
            let mut read_set = self.library.accepted_book_ids(user_id).await?;
            dedup_in_order(&mut read_set);
            let books = self.library.books_by_ids(&read_set).await?;
            Ok::<_, LibraryError>((read_set, books))
        };
        let ((read_set, history), anchor) =
            try_join(history, self.library.book_by_id(last_borrowed_book_id)).await?;

        let profile = UserPreferenceProfile::build(&history, anchor.as_ref());
        Ok(Gathered {
            read_set,
            anchor,
            profile,
        })
    }
}

fn dedup_in_order(ids: &mut Vec<Uuid>) {
    let mut seen = Vec::with_capacity(ids.len());
    ids.retain(|id| {
        if seen.contains(id) {
            false
        } else {
            seen.push(*id);
            true
        }
    });
}

/// 从候选池组装推荐列表
///
/// `pool` 已排除读过的书和锚点图书。同作者图书不超过 2 本时，不足 4 本会用
/// 候选池中剩余的书补齐；超过 2 本时只取前 2 本，且不再补齐。
pub fn assemble(pool: &[Book], profile: &UserPreferenceProfile, anchor: Option<&Book>) -> Vec<Book> {
    let same_author: Vec<&Book> = match anchor {
        Some(anchor) => pool.iter().filter(|b| b.author == anchor.author).collect(),
        None => Vec::new(),
    };

    // 有锚点时排除锚点作者，避免同一作者占满列表
    let same_category = pool.iter().filter(|b| {
        profile.categories.contains(&b.category) && anchor.is_none_or(|a| b.author != a.author)
    });

    let picked: Vec<&Book> = if same_author.len() <= SAME_AUTHOR_CAP {
        let mut picked: Vec<&Book> = same_author
            .into_iter()
            .chain(same_category)
            .take(MAX_RECOMMENDATIONS)
            .collect();
        if picked.len() < MAX_RECOMMENDATIONS {
            let fill: Vec<&Book> = pool
                .iter()
                .filter(|b| !picked.iter().any(|p| p.id == b.id))
                .collect();
            picked.extend(fill);
            picked.truncate(MAX_RECOMMENDATIONS);
        }
        picked
    } else {
        same_author
            .into_iter()
            .take(SAME_AUTHOR_CAP)
            .chain(same_category)
            .take(MAX_RECOMMENDATIONS)
            .collect()
    };

    picked.into_iter().cloned().collect()
}
