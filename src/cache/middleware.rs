//! 路由级响应缓存中间件
//!
//! 命中时直接返回缓存的响应体，不调用下游处理器；未命中时调用下游，
//! 在响应发出前截获响应体并异步写入缓存。缓存存储出错时一律放行（fail open）。

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::{OriginalUri, Request, State},
    http::{HeaderName, HeaderValue, Method, header},
    middleware::Next,
    response::Response,
};
use futures_util::{StreamExt, stream};
use tracing::{debug, warn};

use super::keys::route_response_key;
use super::store::{CacheError, CacheStore};

pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// 超过该大小的响应体直接透传，不写入缓存
pub const MAX_CACHEABLE_BODY: usize = 1024 * 1024;

/// 一组路由共用的缓存配置
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
    timeout: Duration,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration, timeout: Duration) -> Self {
        Self {
            store,
            ttl,
            timeout,
        }
    }

    async fn lookup(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        tokio::time::timeout(self.timeout, self.store.get(key))
            .await
            .map_err(|_| CacheError::Timeout(self.timeout))?
    }

    /// 后台写入，失败只记录日志
    fn spawn_write(&self, key: String, value: Vec<u8>) {
        let store = self.store.clone();
        let ttl = self.ttl;
        let timeout = self.timeout;
        tokio::spawn(async move {
            match tokio::time::timeout(timeout, store.set_ex(&key, value, ttl)).await {
                Ok(Ok(())) => debug!("Cached {} for {} seconds", key, ttl.as_secs()),
                Ok(Err(e)) => warn!("Failed to cache {}: {}", key, e),
                Err(_) => warn!("Failed to cache {}: {}", key, CacheError::Timeout(timeout)),
            }
        });
    }
}

pub async fn cache_response(
    State(cache): State<ResponseCache>,
    request: Request,
    next: Next,
) -> Response {
    // 只缓存读请求，同一路径上的写请求直接放行
    if request.method() != Method::GET && request.method() != Method::HEAD {
        return next.run(request).await;
    }

    // 嵌套路由会改写 uri，优先使用原始 uri
    let key = match request.extensions().get::<OriginalUri>() {
        Some(OriginalUri(uri)) => route_response_key(uri),
        None => route_response_key(request.uri()),
    };

    match cache.lookup(&key).await {
        Ok(Some(payload)) => {
            debug!("Cache HIT for {}", key);
            hit_response(payload)
        }
        Ok(None) => {
            debug!("Cache MISS for {}", key);
            let response = next.run(request).await;
            capture_response(&cache, key, response).await
        }
        Err(e) => {
            warn!("Cache lookup failed for {}, bypassing cache: {}", key, e);
            let mut response = next.run(request).await;
            tag(&mut response, "MISS");
            response
        }
    }
}

enum Captured {
    Complete(Bytes),
    Passthrough(Body),
}

/// 读取响应体，超出 `limit` 或读取出错时把已读部分和剩余部分原样拼回
async fn read_capped(body: Body, limit: usize) -> Captured {
    let mut data = body.into_data_stream();
    let mut buf: Vec<u8> = Vec::new();

    while let Some(item) = data.next().await {
        match item {
            Ok(chunk) => {
                buf.extend_from_slice(&chunk);
                if buf.len() > limit {
                    let head = stream::once(async move { Ok(Bytes::from(buf)) });
                    return Captured::Passthrough(Body::from_stream(head.chain(data)));
                }
            }
            Err(e) => {
                warn!("Response body failed mid-stream: {}", e);
                let items: [Result<Bytes, axum::Error>; 2] = [Ok(Bytes::from(buf)), Err(e)];
                return Captured::Passthrough(Body::from_stream(stream::iter(items)));
            }
        }
    }

    Captured::Complete(Bytes::from(buf))
}

async fn capture_response(cache: &ResponseCache, key: String, mut response: Response) -> Response {
    tag(&mut response, "MISS");

    // 只缓存成功响应
    if !response.status().is_success() {
        return response;
    }

    let (parts, body) = response.into_parts();
    match read_capped(body, MAX_CACHEABLE_BODY).await {
        Captured::Complete(bytes) => {
            cache.spawn_write(key, bytes.to_vec());
            Response::from_parts(parts, Body::from(bytes))
        }
        Captured::Passthrough(body) => {
            debug!("Response for {} not cached", key);
            Response::from_parts(parts, body)
        }
    }
}

fn hit_response(payload: Vec<u8>) -> Response {
    let mut response = Response::new(Body::from(payload));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    tag(&mut response, "HIT");
    response
}

fn tag(response: &mut Response, status: &'static str) {
    response
        .headers_mut()
        .insert(X_CACHE, HeaderValue::from_static(status));
}
