//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 라우터 조립 함수입니다.
//!
//! 각 하위 모듈:
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `search`: 상품 검색과 인기 검색어 랭킹

pub mod health;
pub mod search;

pub use health::*;
pub use search::*;

use crate::error::panic_response;
use axum::{routing::get, Router};
use tower_http::{
    catch_panic::CatchPanicLayer, // 핸들러 패닉 → 500 응답
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// 전체 라우터를 조립합니다.
///
/// main.rs와 HTTP 레벨 테스트가 같은 라우터를 쓰도록 함수로 분리해 둡니다.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        // 상품 검색 (캐시 + 전문검색 + 랭킹 집계)
        .route("/search", get(search))
        // 인기 검색어 상위 10개
        .route("/ranking", get(ranking))
        .route("/health", get(health_check))
        .with_state(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/products", api_routes)
        .layer(cors)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}
