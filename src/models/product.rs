//! # 상품 모델 정의
//!
//! DB 테이블 한 행에 대응하는 `*Row` 구조체와,
//! 검색 응답에 실리는 `ProductRecord`를 분리해 둡니다.
//! 응답 모양은 저장소의 테이블 구조와 무관하게 항상 같은 필드를 가집니다.

use serde::{Deserialize, Serialize};

/// `products` 테이블 한 행
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub brand_id: Option<i64>,
    pub price: i64,
    pub image_url: Option<String>,
    pub created_at: String,
}

/// 상품에 딸린 브랜드 정보 (응답용)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BrandSummary {
    pub id: i64,
    pub name: String,
    pub website_url: Option<String>,
}

/// 상품에 딸린 성분 정보 (응답용)
///
/// `ewg_score`: 1~10 사이의 EWG 안전 등급
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientSummary {
    pub id: i64,
    pub name: String,
    pub ewg_score: i64,
}

/// `product_ingredients` JOIN `ingredients` 결과 한 행
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductIngredientRow {
    pub product_id: i64,
    pub id: i64,
    pub name: String,
    pub ewg_score: i64,
}

/// 검색 결과 한 건
///
/// 하이드레이터(hydrator)가 원본 저장소에서 읽어 조립합니다.
/// 캐시에 JSON으로 저장했다가 그대로 다시 읽어야 하므로
/// `Serialize`와 `Deserialize`를 모두 derive합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    /// 브랜드가 삭제되었거나 연결되지 않은 상품은 null
    pub brand: Option<BrandSummary>,
    pub price: i64,
    pub ingredients: Vec<IngredientSummary>,
    pub image_url: Option<String>,
    pub created_at: String,
}

impl ProductRecord {
    /// 원본 행과 관계 데이터로 응답용 레코드를 조립합니다.
    pub fn assemble(
        row: ProductRow,
        brand: Option<BrandSummary>,
        ingredients: Vec<IngredientSummary>,
    ) -> Self {
        Self {
            id: row.id,
            name: row.name,
            brand,
            price: row.price,
            ingredients,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}
