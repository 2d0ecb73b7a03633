//! # 서비스 계층
//!
//! 검색 파이프라인의 각 단계와, 외부 협력자(캐시/검색 인덱스/랭킹 저장소/상품 저장소)의
//! 포트(트레이트)와 어댑터를 모아둔 모듈입니다.
//!
//! - `query`: 검색어 검증/정규화
//! - `cache`: 검색 결과 캐시 포트 + Redis 어댑터
//! - `index`: 검색 인덱스 포트 + Elasticsearch 어댑터
//! - `hydrator`: ID 목록 → 관련도 순서를 유지한 결과 페이지
//! - `ranking`: 인기 검색어 집계 포트 + Redis 어댑터
//! - `search`: 위 단계들을 묶는 cache-aside 오케스트레이터
//! - `reindex`: 원본 저장소의 상품을 검색 인덱스로 밀어넣는 동기화 작업
//! - `redis_handle`: 캐시와 랭킹이 공유하는 Redis 연결

pub mod cache;
pub mod hydrator;
pub mod index;
pub mod query;
pub mod ranking;
pub mod redis_handle;
pub mod reindex;
pub mod search;
