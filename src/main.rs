//! # PurePick 검색 서버 진입점
//!
//! 화장품 카탈로그를 상품명/브랜드명/성분명으로 전문검색하고,
//! 같은 검색어의 반복 요청은 캐시로 흡수하며,
//! 검색이 성공할 때마다 인기 검색어 랭킹을 올립니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 연결 풀 생성과 마이그레이션
//! 4. Redis / Elasticsearch 어댑터 생성 (연결 실패해도 서버는 뜸)
//! 5. (선택) 검색 인덱스 재색인
//! 6. 라우터 설정과 HTTP 서버 시작

mod config;
mod db;
mod error;
mod models;
mod routes;
mod services;

#[cfg(test)]
mod testing;

use anyhow::Result;
use config::Config;
use db::SqliteProductStore;
use routes::AppState;
use services::{
    cache::RedisCache,
    index::ElasticsearchIndex,
    ranking::{RankingAggregator, RedisRankingStore},
    redis_handle::RedisHandle,
    reindex::reindex_catalog,
    search::{SearchService, SearchSettings},
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅 초기화 ──
    // RUST_LOG가 없으면 purepick, tower_http, axum 모듈을 debug 레벨로 설정
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "purepick=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting PurePick server on {}:{}", config.host, config.port);

    // ── 4단계: SQLite 연결 풀 + 마이그레이션 ──
    // create_if_missing: DB 파일이 없으면 새로 만듭니다
    let connect_options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    let store = Arc::new(SqliteProductStore::new(pool));

    // ── 5단계: 외부 협력자 어댑터 ──
    // Redis는 URL만 검증하고, 실제 연결은 첫 요청에서 맺습니다.
    let redis = RedisHandle::open(&config.redis_url)?;
    let index = Arc::new(ElasticsearchIndex::new(
        &config.elasticsearch_url,
        &config.elasticsearch_index,
    )?);

    // ── 6단계: (선택) 재색인 ──
    // 실패해도 서버 시작을 막지 않습니다. 검색 요청 시점에 다시 분류됩니다.
    if config.reindex_on_start {
        match index.ensure_index().await {
            Ok(_) => match store.list_ids().await {
                Ok(ids) => {
                    if let Err(e) = reindex_catalog(&index, store.as_ref(), &ids).await {
                        tracing::warn!("Reindex aborted: {}", e);
                    }
                }
                Err(e) => tracing::warn!("Could not list products for reindex: {}", e),
            },
            Err(e) => tracing::warn!("Search index not ready, skipping reindex: {}", e),
        }
    }

    // ── 7단계: 검색 서비스 조립 ──
    let search = SearchService::new(
        Arc::new(RedisCache::new(redis.clone())),
        index,
        store,
        RankingAggregator::new(Arc::new(RedisRankingStore::new(redis))),
        SearchSettings {
            cache_ttl: Duration::from_secs(config.search_cache_ttl_secs),
            max_hits: config.search_max_hits,
            default_page_size: config.search_page_size,
        },
    );

    let app = routes::router(AppState {
        search: Arc::new(search),
    });

    // ── 8단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
