//! # 인기 검색어 랭킹
//!
//! Redis Sorted Set(`search_ranking`) 하나에 검색어별 점수를 쌓습니다.
//! - 증가: `ZINCRBY search_ranking 1 <keyword>` (Redis가 원자적으로 처리하므로
//!   동시 요청끼리 read-modify-write 경쟁이 없습니다)
//! - 조회: `ZREVRANGE search_ranking 0 n-1 WITHSCORES` (점수 내림차순)
//!
//! 점수는 오르기만 하고 이 서버가 지우거나 초기화하지 않습니다.
//! 점수가 같을 때의 순서는 저장소에 맡깁니다.

use super::redis_handle::{is_unreachable, RedisHandle};
use crate::models::RankingEntry;
use async_trait::async_trait;
use redis::AsyncCommands;
use std::sync::Arc;
use thiserror::Error;

/// 랭킹을 저장하는 Sorted Set 키
pub const RANKING_KEY: &str = "search_ranking";

/// `GET /ranking`이 돌려주는 최대 항목 수
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Error)]
pub enum RankingError {
    /// 랭킹 저장소에 도달할 수 없음
    #[error("ranking store unreachable: {0}")]
    Unavailable(String),

    /// 저장소가 응답했지만 명령이 실패했거나 값이 이상함
    #[error("ranking store failure: {0}")]
    Malformed(String),
}

impl From<redis::RedisError> for RankingError {
    fn from(err: redis::RedisError) -> Self {
        if is_unreachable(&err) {
            RankingError::Unavailable(err.to_string())
        } else {
            RankingError::Malformed(err.to_string())
        }
    }
}

/// 랭킹 저장소 포트
///
/// `increment`는 저장소 수준에서 원자적이어야 합니다.
#[async_trait]
pub trait RankingStore: Send + Sync {
    async fn increment(&self, keyword: &str, by: i64) -> Result<(), RankingError>;

    /// 점수 내림차순 상위 `n`개 `(검색어, 점수)`
    async fn top_n(&self, n: usize) -> Result<Vec<(String, i64)>, RankingError>;
}

/// Redis Sorted Set 구현
pub struct RedisRankingStore {
    redis: RedisHandle,
    key: String,
}

impl RedisRankingStore {
    pub fn new(redis: RedisHandle) -> Self {
        Self {
            redis,
            key: RANKING_KEY.to_string(),
        }
    }
}

#[async_trait]
impl RankingStore for RedisRankingStore {
    async fn increment(&self, keyword: &str, by: i64) -> Result<(), RankingError> {
        let mut conn = self.redis.connection().await?;
        let _: f64 = conn.zincr(&self.key, keyword, by).await?;
        Ok(())
    }

    async fn top_n(&self, n: usize) -> Result<Vec<(String, i64)>, RankingError> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let mut conn = self.redis.connection().await?;
        // Sorted Set 점수는 부동소수점이지만 여기서는 항상 정수만 더합니다
        let entries: Vec<(String, f64)> = conn
            .zrevrange_withscores(&self.key, 0, n as isize - 1)
            .await?;

        Ok(entries
            .into_iter()
            .map(|(keyword, score)| (keyword, score.round() as i64))
            .collect())
    }
}

/// 랭킹 집계기: 점수 증가와 순위표 조회
#[derive(Clone)]
pub struct RankingAggregator {
    store: Arc<dyn RankingStore>,
}

impl RankingAggregator {
    pub fn new(store: Arc<dyn RankingStore>) -> Self {
        Self { store }
    }

    /// 검색어 점수를 정확히 1 올립니다. 호출할 때마다 누적됩니다.
    pub async fn increment(&self, keyword: &str) -> Result<(), RankingError> {
        self.store.increment(keyword, 1).await
    }

    /// 상위 `n`개에 1부터 시작하는 순위를 붙여 돌려줍니다.
    ///
    /// 순위는 점수 차이와 상관없이 출력 위치로만 매깁니다.
    /// 저장소가 비어 있으면 빈 목록입니다 (에러 아님).
    pub async fn top(&self, n: usize) -> Result<Vec<RankingEntry>, RankingError> {
        let mut entries = self.store.top_n(n).await?;
        entries.truncate(n);

        Ok(entries
            .into_iter()
            .enumerate()
            .map(|(position, (keyword, score))| RankingEntry {
                rank: position + 1,
                keyword,
                score,
            })
            .collect())
    }
}
