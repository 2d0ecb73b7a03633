//! 테스트 전용 메모리 구현들
//!
//! 각 포트(캐시, 검색 인덱스, 상품 저장소, 랭킹 저장소)를 메모리로 구현하고,
//! 장애 스위치와 호출 횟수 카운터를 달아 둡니다.

use crate::models::{BrandSummary, IngredientSummary, ProductRecord};
use crate::services::cache::{CacheError, SearchCache};
use crate::services::hydrator::{ProductStore, StoreError};
use crate::services::index::{IndexError, SearchIndex};
use crate::services::ranking::{RankingAggregator, RankingError, RankingStore};
use crate::services::search::{SearchService, SearchSettings};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// id만 다른 단순한 상품 레코드
pub fn record(id: i64) -> ProductRecord {
    ProductRecord {
        id,
        name: format!("Product {id}"),
        brand: Some(BrandSummary {
            id: 100 + id,
            name: format!("Brand {id}"),
            website_url: None,
        }),
        price: 1000 * id,
        ingredients: vec![IngredientSummary {
            id: 200 + id,
            name: format!("Ingredient {id}"),
            ewg_score: 1,
        }],
        image_url: None,
        created_at: "2024-01-01 00:00:00".to_string(),
    }
}

// ── 캐시 ──

#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
    unavailable: AtomicBool,
    get_calls: AtomicUsize,
    last_ttl: Mutex<Option<Duration>>,
}

impl MemoryCache {
    pub fn set_unavailable(&self, down: bool) {
        self.unavailable.store(down, Ordering::SeqCst);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// 마지막 `set` 호출에 전달된 TTL
    pub fn last_ttl(&self) -> Option<Duration> {
        *self.last_ttl.lock().unwrap()
    }

    fn check(&self) -> Result<(), CacheError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(CacheError("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SearchCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.check()?;
        *self.last_ttl.lock().unwrap() = Some(ttl);
        self.put_raw(key, value);
        Ok(())
    }
}

// ── 검색 인덱스 ──

enum IndexMode {
    Answer(HashMap<String, Vec<i64>>),
    Unavailable,
    Broken,
}

pub struct FakeIndex {
    mode: IndexMode,
    calls: AtomicUsize,
}

impl FakeIndex {
    /// 등록한 검색어는 주어진 ID 목록을, 그 외 검색어는 빈 목록을 돌려줍니다.
    pub fn returning(answers: &[(&str, Vec<i64>)]) -> Self {
        let map = answers
            .iter()
            .map(|(q, ids)| (q.to_string(), ids.clone()))
            .collect();
        Self {
            mode: IndexMode::Answer(map),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            mode: IndexMode::Unavailable,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn broken() -> Self {
        Self {
            mode: IndexMode::Broken,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchIndex for FakeIndex {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<i64>, IndexError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.mode {
            IndexMode::Answer(map) => {
                let mut ids = map.get(query).cloned().unwrap_or_default();
                ids.truncate(limit);
                Ok(ids)
            }
            IndexMode::Unavailable => Err(IndexError::Unavailable("connection refused".into())),
            IndexMode::Broken => Err(IndexError::Other("Unexpected ES error".into())),
        }
    }
}

// ── 상품 저장소 ──

pub struct FakeStore {
    records: Option<Vec<ProductRecord>>,
    fetch_calls: AtomicUsize,
}

impl FakeStore {
    pub fn with_records(records: Vec<ProductRecord>) -> Self {
        Self {
            records: Some(records),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            records: None,
            fetch_calls: AtomicUsize::new(0),
        }
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductStore for FakeStore {
    /// 등록된 순서 그대로(= 요청 ID 순서와 무관하게) 돌려줍니다.
    async fn fetch_by_ids(&self, ids: &[i64]) -> Result<Vec<ProductRecord>, StoreError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let records = self
            .records
            .as_ref()
            .ok_or_else(|| StoreError::Backend("disk I/O error".into()))?;
        Ok(records
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }
}

// ── 랭킹 저장소 ──

#[derive(Default)]
pub struct MemoryRanking {
    scores: Mutex<HashMap<String, i64>>,
    unavailable: AtomicBool,
    increment_calls: AtomicUsize,
}

impl MemoryRanking {
    pub fn set_unavailable(&self, down: bool) {
        self.unavailable.store(down, Ordering::SeqCst);
    }

    pub fn seed(&self, keyword: &str, score: i64) {
        *self
            .scores
            .lock()
            .unwrap()
            .entry(keyword.to_string())
            .or_insert(0) += score;
    }

    pub fn score(&self, keyword: &str) -> Option<i64> {
        self.scores.lock().unwrap().get(keyword).copied()
    }

    pub fn increment_calls(&self) -> usize {
        self.increment_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), RankingError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(RankingError::Unavailable("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RankingStore for MemoryRanking {
    async fn increment(&self, keyword: &str, by: i64) -> Result<(), RankingError> {
        self.increment_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.seed(keyword, by);
        Ok(())
    }

    /// 점수 내림차순, 같은 점수는 검색어 사전순 (결정적인 순서)
    async fn top_n(&self, n: usize) -> Result<Vec<(String, i64)>, RankingError> {
        self.check()?;
        let mut entries: Vec<(String, i64)> = self
            .scores
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(n);
        Ok(entries)
    }
}

// ── 조립 ──

/// 메모리 구현으로 조립한 `SearchService`와, 검증용으로 들고 있는 각 구현
pub struct Harness {
    pub service: Arc<SearchService>,
    pub cache: Arc<MemoryCache>,
    pub index: Arc<FakeIndex>,
    pub store: Arc<FakeStore>,
    pub ranking: Arc<MemoryRanking>,
}

impl Harness {
    pub fn new(index: FakeIndex, store: FakeStore) -> Self {
        let cache = Arc::new(MemoryCache::default());
        let index = Arc::new(index);
        let store = Arc::new(store);
        let ranking = Arc::new(MemoryRanking::default());

        let service = SearchService::new(
            cache.clone(),
            index.clone(),
            store.clone(),
            RankingAggregator::new(ranking.clone()),
            SearchSettings::default(),
        );

        Self {
            service: Arc::new(service),
            cache,
            index,
            store,
            ranking,
        }
    }
}
