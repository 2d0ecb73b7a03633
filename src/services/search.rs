//! # 검색 오케스트레이션 (Cache-Aside)
//!
//! 검색 요청 하나의 처리 흐름:
//!
//! ```text
//! 검색어 정규화 ──(실패)──> 400, 어떤 의존성도 호출하지 않음
//!     │
//!     ▼
//! 캐시 조회 ──(Hit)──> 랭킹 +1 ──> 캐시된 페이지 그대로 반환
//!     │ (Miss 또는 캐시 장애 = Miss 취급)
//!     ▼
//! 검색 인덱스 ──(실패)──> 503/500, 랭킹 증가 없음
//!     │
//!     ▼
//! 하이드레이션 ──(실패)──> 500
//!     │
//!     ▼
//! 캐시 저장 (실패해도 무시) ──> 랭킹 +1 (실패해도 무시) ──> 반환
//! ```
//!
//! 각 단계는 앞 단계의 출력을 입력으로 쓰기 때문에 반드시 순서대로 실행합니다.
//! 랭킹은 "응답할 결과가 확정된 뒤"에만, 요청당 정확히 한 번 올라갑니다.

use super::cache::{cache_key, SearchCache};
use super::hydrator::{self, Pagination, ProductStore};
use super::index::SearchIndex;
use super::query::normalize;
use super::ranking::RankingAggregator;
use crate::error::AppError;
use crate::models::{RankingEntry, ResultPage, SearchParams};
use std::sync::Arc;
use std::time::Duration;

/// 검색 동작을 조절하는 값들
#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// 캐시 항목 TTL
    pub cache_ttl: Duration,
    /// 인덱스에서 가져올 최대 ID 수
    pub max_hits: usize,
    /// 기본 페이지 크기
    pub default_page_size: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(3600),
            max_hits: 100,
            default_page_size: 10,
        }
    }
}

/// 캐시 조회 단계의 결과
///
/// 캐시 장애(`Degraded`)는 요청을 실패시키지 않고 Miss와 같은 경로로 갑니다.
#[derive(Debug)]
enum CacheRead {
    Hit(ResultPage),
    Miss,
    Degraded,
}

/// 보조 단계(캐시 저장, 랭킹 증가)의 결과. 어느 쪽이든 요청은 계속됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SideEffect {
    Applied,
    Absorbed,
}

/// 검색 서비스
///
/// 협력자들은 모두 트레이트 객체로 주입됩니다. 테스트에서는 메모리 구현으로 바꿔 끼웁니다.
/// 요청 사이에 공유하는 가변 상태는 없고, 협력자 핸들만 공유합니다.
pub struct SearchService {
    cache: Arc<dyn SearchCache>,
    index: Arc<dyn SearchIndex>,
    store: Arc<dyn ProductStore>,
    ranking: RankingAggregator,
    settings: SearchSettings,
}

impl SearchService {
    pub fn new(
        cache: Arc<dyn SearchCache>,
        index: Arc<dyn SearchIndex>,
        store: Arc<dyn ProductStore>,
        ranking: RankingAggregator,
        settings: SearchSettings,
    ) -> Self {
        Self {
            cache,
            index,
            store,
            ranking,
            settings,
        }
    }

    /// 캐시에 있으면 캐시에서, 없으면 인덱스 + 원본 저장소에서 결과 페이지를 만듭니다.
    pub async fn search(&self, params: &SearchParams) -> Result<ResultPage, AppError> {
        let query = normalize(params.q.as_deref()).map_err(|e| {
            tracing::debug!(stage = "normalize", query = ?params.q, error = %e, "Search query rejected");
            e
        })?;
        let pagination = Pagination::from_query(
            params.page.as_deref(),
            params.page_size.as_deref(),
            self.settings.default_page_size,
        );
        let key = cache_key(&query, pagination, self.settings.default_page_size);

        if let CacheRead::Hit(page) = self.read_cache(&key, &query).await {
            let ranked = self.credit_ranking(&query).await;
            tracing::debug!(%query, %key, ?ranked, "Search served from cache");
            return Ok(page);
        }

        let ids = self
            .index
            .search(&query, self.settings.max_hits)
            .await
            .map_err(|e| {
                tracing::error!(stage = "index", %query, error = %e, "Search index call failed");
                AppError::from(e)
            })?;

        let page = hydrator::hydrate(self.store.as_ref(), &query, &ids, pagination)
            .await
            .map_err(|e| {
                tracing::error!(stage = "hydrate", %query, error = %e, "Product store fetch failed");
                AppError::from(e)
            })?;

        let cached = self.write_cache(&key, &query, &page).await;
        let ranked = self.credit_ranking(&query).await;

        tracing::debug!(%query, count = page.count, ?cached, ?ranked, "Search served from index");
        Ok(page)
    }

    /// 인기 검색어 상위 `n`개. 랭킹 저장소 장애는 그대로 503으로 드러납니다.
    pub async fn ranking(&self, n: usize) -> Result<Vec<RankingEntry>, AppError> {
        self.ranking.top(n).await.map_err(|e| {
            tracing::error!(stage = "ranking_top", error = %e, "Ranking lookup failed");
            AppError::from(e)
        })
    }

    async fn read_cache(&self, key: &str, query: &str) -> CacheRead {
        let raw = match self.cache.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return CacheRead::Miss,
            Err(e) => {
                tracing::warn!(stage = "cache_read", query, error = %e, "Cache read failed, treating as miss");
                return CacheRead::Degraded;
            }
        };

        // 깨진 캐시 값도 Miss로 취급하고, 이번 요청에서 새 값으로 덮어씁니다
        match serde_json::from_str::<ResultPage>(&raw) {
            Ok(page) => CacheRead::Hit(page),
            Err(e) => {
                tracing::warn!(stage = "cache_read", query, error = %e, "Discarding undecodable cache entry");
                CacheRead::Degraded
            }
        }
    }

    async fn write_cache(&self, key: &str, query: &str, page: &ResultPage) -> SideEffect {
        let raw = match serde_json::to_string(page) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(stage = "cache_write", query, error = %e, "Could not encode result page");
                return SideEffect::Absorbed;
            }
        };

        match self.cache.set(key, &raw, self.settings.cache_ttl).await {
            Ok(()) => SideEffect::Applied,
            Err(e) => {
                tracing::warn!(stage = "cache_write", query, error = %e, "Cache write failed");
                SideEffect::Absorbed
            }
        }
    }

    /// 랭킹 증가는 best-effort입니다. 실패해도 검색 응답에는 영향이 없습니다.
    async fn credit_ranking(&self, query: &str) -> SideEffect {
        match self.ranking.increment(query).await {
            Ok(()) => SideEffect::Applied,
            Err(e) => {
                tracing::warn!(stage = "ranking_increment", query, error = %e, "Ranking increment failed");
                SideEffect::Absorbed
            }
        }
    }
}
