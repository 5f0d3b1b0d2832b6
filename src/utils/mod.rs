use axum::Json;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // 用户ID
    pub role: String, // 用户角色
    pub exp: i64,     // 过期时间
    pub iat: i64,     // 签发时间
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// 签发令牌（登录服务与测试使用）
pub fn generate_token(
    user_id: &str,
    role: &str,
    ttl: Duration,
    config: &Config,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: (now + ttl).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, config: &Config) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub success: bool,
    pub total_hits: usize,
    pub data: Vec<T>,
}

pub fn data_response<T: Serialize>(data: T) -> Json<DataResponse<T>> {
    Json(DataResponse {
        success: true,
        data,
    })
}

pub fn list_response<T: Serialize>(data: Vec<T>) -> Json<ListResponse<T>> {
    Json(ListResponse {
        success: true,
        total_hits: data.len(),
        data,
    })
}
