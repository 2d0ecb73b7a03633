//! # 상품 검색 / 인기 검색어 API 라우트 핸들러
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | GET | /api/products/search?q=키워드&page=1&page_size=10 | 상품 검색 |
//! | GET | /api/products/ranking | 인기 검색어 상위 10개 |
//!
//! ## 응답
//! - 검색 성공: `200 { "count", "next", "previous", "results": [...] }`
//! - 검색어 오류: `400 { "error" }`
//! - 의존성 장애: `503 { "error", "detail" }`
//! - 그 외: `500 { "error", "detail" }`
//!
//! 핸들러는 얇게 두고, 실제 흐름은 `services::search::SearchService`에 있습니다.

use crate::{
    error::{AppError, ValidationError},
    models::{RankingEntry, ResultPage, SearchParams},
    services::{ranking::DEFAULT_TOP_N, search::SearchService},
};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use std::sync::Arc;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// `SearchService`는 Arc로 감싸서 clone 비용 없이 공유합니다.
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchService>,
}

/// 상품을 검색합니다.
///
/// `GET /api/products/search?q=toner` → `ResultPage`
///
/// `q`가 없어도 `Query` 추출은 성공하고(`Option`), 검증은 서비스가 합니다.
/// 쿼리스트링 해석 자체가 실패하면 Axum 기본(text/plain) 대신 JSON 400으로 돌려줍니다.
pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<ResultPage>, AppError> {
    let Query(params) = params.map_err(|rejection| {
        tracing::debug!(stage = "normalize", error = %rejection, "Query string rejected");
        AppError::Validation(ValidationError::MalformedQuery)
    })?;
    let page = state.search.search(&params).await?;
    Ok(Json(page))
}

/// 인기 검색어 순위를 조회합니다.
///
/// `GET /api/products/ranking` → `[{ "rank": 1, "keyword": "toner", "score": 3 }, ...]`
pub async fn ranking(State(state): State<AppState>) -> Result<Json<Vec<RankingEntry>>, AppError> {
    let entries = state.search.ranking(DEFAULT_TOP_N).await?;
    Ok(Json(entries))
}
