//! # 상품 데이터베이스 쿼리 모듈
//!
//! 검색 결과 하이드레이션에 필요한 조회만 담당합니다.
//!
//! ## 테이블 구조
//! - `products`: 상품 (brand_id로 브랜드 참조)
//! - `brands`: 브랜드
//! - `ingredients`: 성분 (EWG 등급 포함)
//! - `product_ingredients`: 상품과 성분의 다대다(N:M) 관계 테이블
//!
//! 상품 N개를 조회할 때 상품마다 브랜드/성분을 따로 조회하면 1 + 2N번의 쿼리가 나갑니다.
//! 여기서는 `IN (...)` 조회 3번으로 끝내고 메모리에서 합칩니다.

use crate::models::*;
use crate::services::hydrator::{ProductStore, StoreError};
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashMap;

/// SQLite 기반 상품 저장소
///
/// `SqlitePool`은 내부적으로 Arc라서 clone해도 같은 풀을 가리킵니다.
#[derive(Clone)]
pub struct SqliteProductStore {
    pool: SqlitePool,
}

impl SqliteProductStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 전체 상품 ID (재색인용)
    pub async fn list_ids(&self) -> Result<Vec<i64>, StoreError> {
        let ids = sqlx::query_scalar::<_, i64>("SELECT id FROM products ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }
}

#[async_trait]
impl ProductStore for SqliteProductStore {
    async fn fetch_by_ids(&self, ids: &[i64]) -> Result<Vec<ProductRecord>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = fetch_product_rows(&self.pool, ids).await?;

        let brand_ids: Vec<i64> = rows.iter().filter_map(|r| r.brand_id).collect();
        let brands = fetch_brands(&self.pool, &brand_ids).await?;
        let mut ingredients = fetch_ingredients(&self.pool, ids).await?;

        let records = rows
            .into_iter()
            .map(|row| {
                // 브랜드는 여러 상품이 공유할 수 있으므로 remove가 아니라 clone으로 꺼냅니다
                let brand = row.brand_id.and_then(|id| brands.get(&id).cloned());
                let product_ingredients = ingredients.remove(&row.id).unwrap_or_default();
                ProductRecord::assemble(row, brand, product_ingredients)
            })
            .collect();

        Ok(records)
    }
}

/// `(?, ?, ?)` 형태의 바인딩 목록을 쿼리 끝에 붙입니다.
///
/// `QueryBuilder::separated`: 값 사이에 구분자를 넣어주는 도우미.
/// 값은 문자열로 이어붙이지 않고 `push_bind`로 바인딩하므로 SQL 인젝션이 불가능합니다.
fn push_id_list(builder: &mut QueryBuilder<'_, Sqlite>, ids: &[i64]) {
    builder.push(" (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

async fn fetch_product_rows(pool: &SqlitePool, ids: &[i64]) -> Result<Vec<ProductRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT id, name, brand_id, price, image_url, created_at FROM products WHERE id IN",
    );
    push_id_list(&mut builder, ids);

    builder.build_query_as::<ProductRow>().fetch_all(pool).await
}

async fn fetch_brands(
    pool: &SqlitePool,
    brand_ids: &[i64],
) -> Result<HashMap<i64, BrandSummary>, sqlx::Error> {
    if brand_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut builder =
        QueryBuilder::<Sqlite>::new("SELECT id, name, website_url FROM brands WHERE id IN");
    push_id_list(&mut builder, brand_ids);

    let brands = builder
        .build_query_as::<BrandSummary>()
        .fetch_all(pool)
        .await?;
    Ok(brands.into_iter().map(|b| (b.id, b)).collect())
}

/// 상품 ID → 성분 목록 (성분 ID 순)
async fn fetch_ingredients(
    pool: &SqlitePool,
    product_ids: &[i64],
) -> Result<HashMap<i64, Vec<IngredientSummary>>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new(
        r#"
        SELECT pi.product_id, i.id, i.name, i.ewg_score
        FROM product_ingredients pi
        JOIN ingredients i ON i.id = pi.ingredient_id
        WHERE pi.product_id IN"#,
    );
    push_id_list(&mut builder, product_ids);
    builder.push(" ORDER BY pi.product_id, i.id");

    let rows = builder
        .build_query_as::<ProductIngredientRow>()
        .fetch_all(pool)
        .await?;

    let mut grouped: HashMap<i64, Vec<IngredientSummary>> = HashMap::new();
    for row in rows {
        grouped.entry(row.product_id).or_default().push(IngredientSummary {
            id: row.id,
            name: row.name,
            ewg_score: row.ewg_score,
        });
    }
    Ok(grouped)
}
