use axum::http::Uri;

/// 路由响应缓存键前缀
const ROUTE_RESPONSE_PREFIX: &str = "cache:route:";

/// 生成路由响应缓存键
///
/// 只取决于路径与查询串，与请求头和请求体无关。
pub fn route_response_key(uri: &Uri) -> String {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    format!("{}{}", ROUTE_RESPONSE_PREFIX, path_and_query)
}
