//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 상품/브랜드/성분 원본 데이터를 SQLite에서 읽어오는 함수들입니다.
//! 검색 파이프라인은 `services::hydrator::ProductStore` 트레이트를 통해서만
//! 이 모듈을 사용합니다.

pub mod products;

pub use products::*;
