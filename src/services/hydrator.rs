//! # 결과 하이드레이션(Hydration)
//!
//! 검색 인덱스가 준 ID 목록을 원본 저장소의 전체 레코드로 바꿉니다.
//!
//! 원본 저장소의 `fetch_by_ids`는 `WHERE id IN (...)` 조회라 순서를 보장하지 않습니다.
//! 그래서 가져온 레코드를 ID로 찾을 수 있게 맵에 넣은 뒤,
//! ID 목록 순서대로 다시 꺼내 관련도 순서를 복원합니다.
//! 페이지네이션은 순서를 복원한 **다음**에 적용합니다.

use crate::models::{ProductRecord, ResultPage};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// `page_size`의 상한
pub const MAX_PAGE_SIZE: usize = 100;

/// 원본 저장소 조회 실패
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store error: {0}")]
    Backend(String),
}

/// 원본 상품 저장소 포트
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// 주어진 ID들의 상품을 순서 보장 없이 돌려줍니다. 없는 ID는 그냥 빠집니다.
    async fn fetch_by_ids(&self, ids: &[i64]) -> Result<Vec<ProductRecord>, StoreError>;
}

/// 해석이 끝난 페이지 파라미터
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1부터 시작
    pub page: usize,
    /// 1 ~ `MAX_PAGE_SIZE`
    pub page_size: usize,
}

impl Pagination {
    /// 요청 파라미터에 기본값과 범위 제한을 적용합니다.
    ///
    /// - `page`: 없거나 1보다 작으면 1
    /// - `page_size`: 없으면 `default_size`, 그 뒤 [1, 100]으로 자름
    pub fn resolve(page: Option<i64>, page_size: Option<i64>, default_size: usize) -> Self {
        let page_size = match page_size {
            Some(size) => size.clamp(1, MAX_PAGE_SIZE as i64) as usize,
            None => default_size.clamp(1, MAX_PAGE_SIZE),
        };
        Self {
            page: page.unwrap_or(1).max(1) as usize,
            page_size,
        }
    }

    /// 쿼리스트링 원문에서 페이지 파라미터를 해석합니다.
    ///
    /// 정수로 읽을 수 없는 값(`page=abc`)은 주지 않은 것과 같게 취급합니다.
    pub fn from_query(page: Option<&str>, page_size: Option<&str>, default_size: usize) -> Self {
        Self::resolve(parse_number(page), parse_number(page_size), default_size)
    }

    fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse().ok())
}

/// ID 목록을 관련도 순서를 유지한 결과 페이지로 바꿉니다.
///
/// ID 목록이 비어 있으면 저장소를 호출하지 않고 빈 페이지를 돌려줍니다.
/// 인덱스에는 있는데 저장소에서 사라진 ID는 결과에서 빠집니다.
pub async fn hydrate(
    store: &dyn ProductStore,
    query: &str,
    ids: &[i64],
    pagination: Pagination,
) -> Result<ResultPage, StoreError> {
    if ids.is_empty() {
        return Ok(ResultPage::empty());
    }

    let fetched = store.fetch_by_ids(ids).await?;
    let ordered = restore_order(ids, fetched);
    if ordered.len() < ids.len() {
        tracing::debug!(
            query,
            indexed = ids.len(),
            found = ordered.len(),
            "Some indexed products are missing from the store"
        );
    }

    Ok(paginate(query, ordered, pagination))
}

/// 저장소가 준 레코드를 `ids` 순서대로 재배열합니다.
///
/// `HashMap::remove`로 꺼내므로 ID가 중복되어도 레코드는 한 번만 나옵니다.
fn restore_order(ids: &[i64], fetched: Vec<ProductRecord>) -> Vec<ProductRecord> {
    let mut by_id: HashMap<i64, ProductRecord> =
        fetched.into_iter().map(|record| (record.id, record)).collect();

    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

fn paginate(query: &str, ordered: Vec<ProductRecord>, pagination: Pagination) -> ResultPage {
    let count = ordered.len();
    let offset = pagination.offset();

    let results: Vec<ProductRecord> = ordered
        .into_iter()
        .skip(offset)
        .take(pagination.page_size)
        .collect();

    let next = (offset.saturating_add(pagination.page_size) < count)
        .then(|| page_link(query, pagination.page + 1, pagination.page_size));
    let previous = (pagination.page > 1)
        .then(|| page_link(query, pagination.page - 1, pagination.page_size));

    ResultPage {
        count,
        next,
        previous,
        results,
    }
}

/// 페이지 이동 링크 (상대 경로)
fn page_link(query: &str, page: usize, page_size: usize) -> String {
    format!(
        "/api/products/search?q={}&page={}&page_size={}",
        urlencoding::encode(query),
        page,
        page_size
    )
}
