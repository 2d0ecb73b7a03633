//! # 검색 결과 캐시
//!
//! 캐시는 성능을 위한 계층일 뿐, 정답의 원천이 아닙니다.
//! 그래서 이 모듈의 실패는 절대 요청을 실패시키지 않습니다.
//! 읽기 실패는 캐시 미스로, 쓰기 실패는 아무 일도 없었던 것으로 처리됩니다
//! (그 판단은 `services::search`가 합니다).
//!
//! 캐시 값은 `ResultPage` 전체를 JSON으로 직렬화한 문자열이며,
//! 부분 갱신 없이 항상 통째로 덮어씁니다. 명시적 무효화는 없고 TTL로만 만료됩니다.

use super::hydrator::Pagination;
use super::redis_handle::RedisHandle;
use async_trait::async_trait;
use redis::AsyncCommands;
use std::time::Duration;
use thiserror::Error;

/// 캐시 백엔드 실패 (타임아웃, 연결 끊김 등)
#[derive(Debug, Error)]
#[error("cache backend error: {0}")]
pub struct CacheError(pub String);

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError(err.to_string())
    }
}

/// 검색 결과 캐시 포트
///
/// `Send + Sync`: 여러 요청(태스크)이 동시에 같은 캐시 객체를 공유하므로 필요합니다.
#[async_trait]
pub trait SearchCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// 정규화된 검색어와 페이지 정보로 캐시 키를 만듭니다.
///
/// 기본 페이지(1페이지, 기본 크기)는 `"search:" + 검색어` 그대로입니다.
/// 그 외 페이지는 서로 덮어쓰지 않도록 페이지 번호와 크기를 덧붙입니다.
pub fn cache_key(normalized: &str, pagination: Pagination, default_page_size: usize) -> String {
    if pagination.page == 1 && pagination.page_size == default_page_size {
        format!("search:{normalized}")
    } else {
        format!(
            "search:{normalized}:page={}:size={}",
            pagination.page, pagination.page_size
        )
    }
}

/// Redis 문자열(SET EX)로 구현한 캐시
pub struct RedisCache {
    redis: RedisHandle,
}

impl RedisCache {
    pub fn new(redis: RedisHandle) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl SearchCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.redis.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.redis.connection().await?;
        // SET key value EX ttl: 값과 만료 시간을 한 번에 설정합니다
        let _: () = conn.set_ex(key, value, ttl.as_secs().max(1)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_page_uses_bare_key() {
        let p = Pagination { page: 1, page_size: 10 };
        assert_eq!(cache_key("toner", p, 10), "search:toner");
    }

    #[test]
    fn other_pages_get_distinct_keys() {
        let second = Pagination { page: 2, page_size: 10 };
        let bigger = Pagination { page: 1, page_size: 20 };
        assert_eq!(cache_key("toner", second, 10), "search:toner:page=2:size=10");
        assert_eq!(cache_key("toner", bigger, 10), "search:toner:page=1:size=20");
    }

    #[test]
    fn key_keeps_inner_whitespace_and_case() {
        let p = Pagination { page: 1, page_size: 10 };
        assert_eq!(cache_key("Green Tea", p, 10), "search:Green Tea");
    }
}
