use serde::Serialize;

use crate::database::Book;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub total_hits: usize,
    pub data: Vec<Book>,
}

impl From<Vec<Book>> for RecommendationResponse {
    fn from(data: Vec<Book>) -> Self {
        Self {
            total_hits: data.len(),
            data,
        }
    }
}
