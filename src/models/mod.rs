//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `product`: 상품/브랜드/성분 원본 행과, 검색 결과로 내보내는 `ProductRecord`
//! - `search`: 검색 요청 파라미터, 결과 페이지, 랭킹 항목
//!
//! `pub use X::*;`로 하위 모듈의 항목을 재공개하여
//! `crate::models::ProductRecord`처럼 짧게 접근할 수 있게 합니다.

pub mod product;
pub mod search;

pub use product::*;
pub use search::*;
