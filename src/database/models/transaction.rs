// 借阅记录实体
// 对应数据库中的 book_transactions 表

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// 借阅状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IssueStatus {
    Pending,
    Accepted,
    Ready,
    Returned,
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown issue status: {0}")]
pub struct UnknownIssueStatus(pub String);

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Pending => "PENDING",
            IssueStatus::Accepted => "ACCEPTED",
            IssueStatus::Ready => "READY",
            IssueStatus::Returned => "RETURNED",
            IssueStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueStatus {
    type Err = UnknownIssueStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(IssueStatus::Pending),
            "ACCEPTED" => Ok(IssueStatus::Accepted),
            "READY" => Ok(IssueStatus::Ready),
            "RETURNED" => Ok(IssueStatus::Returned),
            "CANCELLED" => Ok(IssueStatus::Cancelled),
            other => Err(UnknownIssueStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for IssueStatus {
    type Error = UnknownIssueStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// 借阅记录
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BorrowingTransaction {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_id: String,
    pub book_id: Uuid,
    pub book_title: String,
    pub user_email: String,
    pub username: String,
    #[sqlx(try_from = "String")]
    pub issue_status: IssueStatus,
    pub is_returned: bool,
    pub issue_date: Option<DateTime<Utc>>,
    pub return_date: Option<DateTime<Utc>>,
    pub extra_charge: i32,
}
