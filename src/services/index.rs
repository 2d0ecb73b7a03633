//! # 검색 인덱스 포트와 Elasticsearch 어댑터
//!
//! 검색 인덱스는 "검색어 → 관련도 내림차순 상품 ID 목록"만 책임집니다.
//! 상품의 실제 내용은 인덱스가 아니라 원본 저장소(SQLite)에서 가져옵니다.
//!
//! ## 검색 대상 필드
//! - `name`: 상품명
//! - `brand.name`: 브랜드명 (object 필드)
//! - `ingredients.name`: 성분명 (nested 필드라 `nested` 쿼리가 따로 필요)
//!
//! 모든 절에 `fuzziness: "AUTO"`를 걸어 글자 수에 따라 편집 거리를
//! 자동으로 허용합니다. ("tonr" → "toner")
//!
//! ## 실패 분류
//! - 연결 실패, 타임아웃, HTTP 503 → [`IndexError::Unavailable`]
//! - 그 외 (잘못된 쿼리 거부, 인덱스 내부 오류, 응답 형식 이상) → [`IndexError::Other`]

use crate::models::ProductRecord;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    /// 인덱스에 도달할 수 없음
    #[error("search index unreachable: {0}")]
    Unavailable(String),

    /// 도달은 했지만 요청이 실패함
    #[error("search index failure: {0}")]
    Other(String),
}

/// 검색 인덱스 포트
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// 관련도 내림차순으로 최대 `limit`개의 상품 ID를 돌려줍니다. 빈 목록일 수 있습니다.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<i64>, IndexError>;
}

/// Elasticsearch REST API 어댑터
pub struct ElasticsearchIndex {
    client: reqwest::Client,
    base_url: String,
    index: String,
}

impl ElasticsearchIndex {
    pub fn new(base_url: &str, index: &str) -> Result<Self, IndexError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(2))
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| IndexError::Other(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            index: index.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}{}", self.base_url, self.index, path)
    }

    /// 인덱스가 없으면 매핑과 함께 생성합니다. 새로 만들었으면 true.
    pub async fn ensure_index(&self) -> Result<bool, IndexError> {
        let head = self
            .client
            .head(self.url(""))
            .send()
            .await
            .map_err(classify_transport)?;

        if head.status().is_success() {
            return Ok(false);
        }
        if head.status() != StatusCode::NOT_FOUND {
            return Err(status_error(head.status(), String::new()));
        }

        let response = self
            .client
            .put(self.url(""))
            .json(&index_definition())
            .send()
            .await
            .map_err(classify_transport)?;
        ensure_success(response).await?;

        tracing::info!(index = %self.index, "Created search index");
        Ok(true)
    }

    /// 상품 하나를 인덱스에 넣거나 갱신합니다 (문서 ID = 상품 ID).
    pub async fn index_product(&self, product: &ProductRecord) -> Result<(), IndexError> {
        let response = self
            .client
            .put(self.url(&format!("/_doc/{}", product.id)))
            .json(&product_document(product))
            .send()
            .await
            .map_err(classify_transport)?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl SearchIndex for ElasticsearchIndex {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<i64>, IndexError> {
        let response = self
            .client
            .post(self.url("/_search"))
            .json(&search_body(query, limit))
            .send()
            .await
            .map_err(classify_transport)?;
        let response = ensure_success(response).await?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| IndexError::Other(format!("invalid response body: {e}")))?;
        parse_hit_ids(&body)
    }
}

/// 다중 필드 fuzzy 검색 요청 본문
///
/// `_source: false`: 문서 본문은 필요 없고 `_id`만 받습니다.
pub fn search_body(query: &str, limit: usize) -> Value {
    json!({
        "size": limit,
        "_source": false,
        "query": {
            "bool": {
                "should": [
                    {
                        "multi_match": {
                            "query": query,
                            "fields": ["name", "brand.name"],
                            "fuzziness": "AUTO"
                        }
                    },
                    {
                        "nested": {
                            "path": "ingredients",
                            "query": {
                                "match": {
                                    "ingredients.name": {
                                        "query": query,
                                        "fuzziness": "AUTO"
                                    }
                                }
                            }
                        }
                    }
                ],
                "minimum_should_match": 1
            }
        }
    })
}

/// `hits.hits[]._id`를 응답 순서(관련도 순) 그대로 정수 ID로 바꿉니다.
pub fn parse_hit_ids(body: &Value) -> Result<Vec<i64>, IndexError> {
    let hits = body
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .ok_or_else(|| IndexError::Other("response has no hits array".to_string()))?;

    hits.iter()
        .map(|hit| {
            let raw = hit
                .get("_id")
                .and_then(Value::as_str)
                .ok_or_else(|| IndexError::Other("hit without _id".to_string()))?;
            raw.parse::<i64>()
                .map_err(|_| IndexError::Other(format!("non-numeric document id {raw:?}")))
        })
        .collect()
}

/// 인덱스 설정과 매핑 (샤드 1개, 레플리카 0개)
fn index_definition() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 0
        },
        "mappings": {
            "properties": {
                "id": { "type": "long" },
                "name": { "type": "text" },
                "price": { "type": "integer" },
                "image_url": { "type": "keyword" },
                "brand": {
                    "properties": {
                        "name": { "type": "text" }
                    }
                },
                "ingredients": {
                    "type": "nested",
                    "properties": {
                        "name": { "type": "text" },
                        "ewg_score": { "type": "integer" }
                    }
                }
            }
        }
    })
}

/// 관계 데이터를 평면화한 색인용 문서
fn product_document(product: &ProductRecord) -> Value {
    json!({
        "id": product.id,
        "name": product.name,
        "price": product.price,
        "image_url": product.image_url,
        "brand": product.brand.as_ref().map(|b| json!({ "name": b.name })),
        "ingredients": product
            .ingredients
            .iter()
            .map(|i| json!({ "name": i.name, "ewg_score": i.ewg_score }))
            .collect::<Vec<_>>(),
    })
}

/// 전송 계층 에러 분류. 연결/타임아웃만 "도달 불가"입니다.
fn classify_transport(err: reqwest::Error) -> IndexError {
    if err.is_connect() || err.is_timeout() {
        IndexError::Unavailable(err.to_string())
    } else {
        IndexError::Other(err.to_string())
    }
}

fn status_error(status: StatusCode, body: String) -> IndexError {
    if status == StatusCode::SERVICE_UNAVAILABLE {
        IndexError::Unavailable(format!("HTTP {status}"))
    } else {
        IndexError::Other(format!("HTTP {status}: {body}"))
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, IndexError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    // 에러 본문은 진단용으로만 쓰므로 읽기 실패는 무시합니다
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BrandSummary, IngredientSummary};

    #[test]
    fn search_body_targets_all_fields_with_auto_fuzziness() {
        let body = search_body("tonr", 25);

        assert_eq!(body["size"], 25);
        let should = body["query"]["bool"]["should"].as_array().unwrap();
        assert_eq!(should[0]["multi_match"]["fields"], json!(["name", "brand.name"]));
        assert_eq!(should[0]["multi_match"]["fuzziness"], "AUTO");
        assert_eq!(should[1]["nested"]["path"], "ingredients");
        assert_eq!(
            should[1]["nested"]["query"]["match"]["ingredients.name"]["fuzziness"],
            "AUTO"
        );
    }

    #[test]
    fn hit_ids_keep_relevance_order() {
        let body = json!({
            "hits": { "hits": [ { "_id": "5" }, { "_id": "2" }, { "_id": "9" } ] }
        });
        assert_eq!(parse_hit_ids(&body).unwrap(), vec![5, 2, 9]);
    }

    #[test]
    fn empty_hits_are_not_an_error() {
        let body = json!({ "hits": { "hits": [] } });
        assert!(parse_hit_ids(&body).unwrap().is_empty());
    }

    #[test]
    fn malformed_responses_are_other_failures() {
        assert!(matches!(parse_hit_ids(&json!({})), Err(IndexError::Other(_))));
        let bad_id = json!({ "hits": { "hits": [ { "_id": "abc" } ] } });
        assert!(matches!(parse_hit_ids(&bad_id), Err(IndexError::Other(_))));
    }

    #[test]
    fn only_503_status_means_unavailable() {
        assert!(matches!(
            status_error(StatusCode::SERVICE_UNAVAILABLE, String::new()),
            IndexError::Unavailable(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, "parse error".into()),
            IndexError::Other(_)
        ));
    }

    #[test]
    fn product_document_flattens_relations() {
        let product = ProductRecord {
            id: 3,
            name: "Green Tea Toner".into(),
            brand: Some(BrandSummary {
                id: 1,
                name: "Innisfree".into(),
                website_url: None,
            }),
            price: 15000,
            ingredients: vec![IngredientSummary {
                id: 7,
                name: "Green Tea Extract".into(),
                ewg_score: 1,
            }],
            image_url: None,
            created_at: "2024-01-01 00:00:00".into(),
        };

        let doc = product_document(&product);
        assert_eq!(doc["brand"]["name"], "Innisfree");
        assert_eq!(doc["ingredients"][0]["name"], "Green Tea Extract");
        assert_eq!(doc["ingredients"][0]["ewg_score"], 1);
    }

    #[tokio::test]
    async fn unreachable_host_is_unavailable() {
        // 포트 1번은 보통 열려 있지 않아 즉시 연결 거부됩니다
        let index = ElasticsearchIndex::new("http://127.0.0.1:1", "products").unwrap();
        let err = index.search("toner", 10).await.unwrap_err();
        assert!(matches!(err, IndexError::Unavailable(_)));
    }
}
