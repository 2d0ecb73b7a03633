//! # 헬스체크(Health Check) 핸들러
//!
//! - `GET /api/products/health` → `{ "status": "ok" }`
//!
//! 프로세스가 요청을 받을 수 있는지만 확인합니다.
//! Redis나 Elasticsearch 상태는 보지 않습니다. 검색 경로는 그 둘이 내려가도
//! 정해진 방식으로 응답하도록 만들어져 있기 때문입니다.

use axum::Json;
use serde_json::{json, Value};

/// `GET /health`: 항상 200을 반환합니다.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
