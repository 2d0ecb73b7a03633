//! # 검색 인덱스 동기화
//!
//! 원본 저장소의 상품을 검색 인덱스에 (다시) 넣습니다.
//! 서버 시작 시 `REINDEX_ON_START=true`일 때 한 번 실행됩니다.
//! 개별 상품 색인 실패는 건너뛰고 로그만 남기며, 성공한 개수를 돌려줍니다.

use super::hydrator::{ProductStore, StoreError};
use super::index::ElasticsearchIndex;

/// 한 번에 원본 저장소에서 읽어오는 상품 수
const BATCH_SIZE: usize = 100;

pub async fn reindex_catalog(
    index: &ElasticsearchIndex,
    store: &dyn ProductStore,
    ids: &[i64],
) -> Result<usize, StoreError> {
    let mut indexed = 0;

    for chunk in ids.chunks(BATCH_SIZE) {
        let products = store.fetch_by_ids(chunk).await?;
        for product in &products {
            match index.index_product(product).await {
                Ok(()) => indexed += 1,
                Err(e) => tracing::warn!(product_id = product.id, error = %e, "Failed to index product"),
            }
        }
    }

    tracing::info!(indexed, total = ids.len(), "Catalog reindex finished");
    Ok(indexed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{record, FakeStore};

    #[tokio::test]
    async fn unreachable_index_indexes_nothing_but_reads_every_batch() {
        let store = FakeStore::with_records((1..=250).map(record).collect());
        let index = ElasticsearchIndex::new("http://127.0.0.1:1", "products").unwrap();
        let ids: Vec<i64> = (1..=250).collect();

        let indexed = reindex_catalog(&index, &store, &ids).await.unwrap();

        assert_eq!(indexed, 0);
        assert_eq!(store.fetch_calls(), 3);
    }

    #[tokio::test]
    async fn store_failure_aborts() {
        let index = ElasticsearchIndex::new("http://127.0.0.1:1", "products").unwrap();
        let result = reindex_catalog(&index, &FakeStore::failing(), &[1]).await;
        assert!(matches!(result, Err(StoreError::Backend(_))));
    }
}
