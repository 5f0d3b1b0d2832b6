use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};

use crate::{AppState, error::AppError, utils::{Claims, verify_token}};

/// 校验 Bearer 令牌，并把 `Claims` 放入请求扩展
///
/// 缺失或格式错误的 `Authorization` 头都按未认证处理。
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|e| {
        tracing::debug!("Rejected authorization header: {}", e);
        AppError::Unauthorized
    })?;

    let claims = verify_token(bearer.token(), &state.config).map_err(|e| {
        tracing::debug!("Token verification failed: {}", e);
        AppError::Unauthorized
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// 仅允许管理员访问，须位于 `auth_middleware` 之内
pub async fn admin_middleware(request: Request, next: Next) -> Result<Response, AppError> {
    match request.extensions().get::<Claims>() {
        Some(claims) if claims.is_admin() => Ok(next.run(request).await),
        Some(claims) => {
            tracing::warn!("User {} denied admin access", claims.sub);
            Err(AppError::Forbidden)
        }
        None => Err(AppError::Unauthorized),
    }
}
