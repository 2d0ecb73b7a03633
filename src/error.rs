//! # 에러 처리 모듈
//!
//! 검색 파이프라인에서 발생할 수 있는 모든 에러 타입을 정의하고,
//! 각 단계의 실패를 HTTP 응답으로 **분류(classify)**합니다.
//!
//! | 실패 | 결과 |
//! |------|------|
//! | 검색어 비어있음 / 100자 초과 | 400, 어떤 의존성도 호출하지 않음 |
//! | 검색 인덱스 연결 불가 | 503, 의존성 이름(Elasticsearch) 포함 |
//! | 랭킹 조회(`top`) 중 Redis 연결 불가 | 503, 의존성 이름(Redis) 포함 |
//! | 랭킹 증가(`increment`) 실패 | 로그만 남기고 무시 (이 모듈까지 오지 않음) |
//! | 캐시 읽기/쓰기 실패 | 로그만 남기고 캐시 미스/무시로 처리 (이 모듈까지 오지 않음) |
//! | 그 외 예상하지 못한 실패 | 500, 일반 메시지만 노출 |
//!
//! 흡수(soft failure)되는 실패는 `services::search`에서 처리되고,
//! 여기에는 요청을 중단시키는 실패만 도달합니다.

use crate::services::{hydrator::StoreError, index::IndexError, ranking::RankingError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::any::Any;
use std::fmt;
use thiserror::Error;

/// 검색어 길이 상한 (문자 수 기준)
pub const MAX_QUERY_CHARS: usize = 100;

/// 검색어 검증 실패 사유
///
/// `Copy`: 필드가 없는 작은 enum이라 복사 비용이 없습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 검색어가 없거나, 앞뒤 공백을 제거하니 빈 문자열인 경우
    #[error("Search query is required")]
    Empty,

    /// 공백 제거 후 100자를 넘는 경우
    #[error("Search query must be 100 characters or fewer")]
    TooLong,

    /// 쿼리스트링 자체를 해석할 수 없는 경우 (예: `q`가 두 번 나옴)
    #[error("Query string could not be parsed")]
    MalformedQuery,
}

/// 응답에 이름이 드러나는 외부 의존성
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    SearchIndex,
    RankingStore,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dependency::SearchIndex => f.write_str("Elasticsearch"),
            Dependency::RankingStore => f.write_str("Redis"),
        }
    }
}

/// 요청을 중단시키는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 잘못된 검색어 (HTTP 400)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// 외부 의존성에 연결할 수 없음 (HTTP 503)
    #[error("{dependency} is unavailable: {detail}")]
    DependencyUnavailable {
        dependency: Dependency,
        detail: String,
    },

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// ── 단계별 실패 → AppError 분류 ──
// `?` 연산자가 각 협력자의 에러를 자동으로 AppError로 바꿀 수 있도록
// From 트레이트를 구현합니다.

impl From<IndexError> for AppError {
    /// 인덱스에 도달조차 못한 경우만 503이고, 나머지(잘못된 쿼리, 인덱스 내부 오류)는 500입니다.
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::Unavailable(detail) => AppError::DependencyUnavailable {
                dependency: Dependency::SearchIndex,
                detail,
            },
            IndexError::Other(detail) => AppError::Internal(format!("search index: {detail}")),
        }
    }
}

impl From<StoreError> for AppError {
    /// 원본 저장소 조회 실패는 재시도 없이 내부 오류로 분류합니다.
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(e) => AppError::Database(e),
            StoreError::Backend(detail) => AppError::Internal(format!("product store: {detail}")),
        }
    }
}

impl From<RankingError> for AppError {
    /// 랭킹 조회 경로에서만 사용됩니다. 증가 경로의 실패는 여기까지 오지 않습니다.
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::Unavailable(detail) => AppError::DependencyUnavailable {
                dependency: Dependency::RankingStore,
                detail,
            },
            RankingError::Malformed(detail) => AppError::Internal(format!("ranking store: {detail}")),
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 로그는 실패한 단계와 검색어를 아는 `SearchService`가 남기므로 여기서는 남기지 않습니다.
    /// 내부 에러(Internal, Database)의 실제 내용은 클라이언트에 보내지 않고,
    /// 의존성 이름이 없는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(reason) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": reason.to_string() })),
            )
                .into_response(),
            AppError::DependencyUnavailable { dependency, detail } => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": format!("{dependency} is unavailable"),
                    "detail": detail,
                })),
            )
                .into_response(),
            AppError::Internal(_) | AppError::Database(_) => internal_error_response(),
        }
    }
}

/// 500 응답 본문. 어떤 의존성이 원인인지 드러내지 않습니다.
fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal server error",
            "detail": "An unexpected error occurred",
        })),
    )
        .into_response()
}

/// 핸들러 안에서 패닉이 나도 프로세스는 계속 살아있고, 그 요청은 500으로 끝납니다.
///
/// `tower_http::catch_panic::CatchPanicLayer::custom()`에 넘기는 함수입니다.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    // 패닉 페이로드는 보통 &str 또는 String입니다
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = %message, "Request handler panicked");
    internal_error_response()
}
