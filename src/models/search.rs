//! # 검색/랭킹 모델 정의

use crate::models::ProductRecord;
use serde::{Deserialize, Serialize};

/// `GET /search?q=..&page=..&page_size=..` 쿼리 파라미터
///
/// `q`가 아예 없는 요청도 400으로 응답해야 하므로 `Option`으로 받습니다.
/// (필수 필드로 두면 Axum이 검증 전에 자체 에러를 반환합니다)
///
/// `page`, `page_size`도 같은 이유로 문자열 그대로 받고,
/// 숫자 해석과 범위 보정은 `Pagination::from_query`가 합니다.
/// `page=-1`이나 `page=abc`가 JSON이 아닌 400으로 튕겨나가지 않게 하기 위함입니다.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// 검색 결과 한 페이지
///
/// `results`의 순서는 항상 검색 인덱스가 돌려준 관련도 순서입니다.
/// 캐시에는 이 구조체 전체가 JSON으로 통째로 저장됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    /// 이 검색어로 찾은 전체 상품 수
    pub count: usize,
    /// 다음 페이지 링크 (마지막 페이지면 null)
    pub next: Option<String>,
    /// 이전 페이지 링크 (첫 페이지면 null)
    pub previous: Option<String>,
    pub results: Vec<ProductRecord>,
}

impl ResultPage {
    /// 결과가 하나도 없는 페이지
    pub fn empty() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

/// 인기 검색어 한 줄: `{ "rank": 1, "keyword": "toner", "score": 3 }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 출력 위치로 매기는 1부터 시작하는 순위 (점수가 같아도 1, 2, 3...)
    pub rank: usize,
    pub keyword: String,
    pub score: i64,
}
