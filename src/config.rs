//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: 상품 원본 데이터가 들어있는 SQLite 데이터베이스 경로 (필수)
//! - `REDIS_URL`: 검색 결과 캐시와 인기 검색어 랭킹을 저장하는 Redis 주소
//! - `ELASTICSEARCH_URL` / `ELASTICSEARCH_INDEX`: 전문검색 인덱스 주소와 인덱스 이름
//! - `SEARCH_CACHE_TTL_SECS`: 검색 결과 캐시 유지 시간 (초)
//! - `SEARCH_MAX_HITS`: 검색 인덱스에서 가져올 최대 상품 ID 개수
//! - `SEARCH_PAGE_SIZE`: 기본 페이지 크기
//! - `REINDEX_ON_START`: 서버 시작 시 전체 상품을 검색 인덱스에 다시 넣을지 여부
//! - `HOST` / `PORT`: 서버 바인딩 주소와 포트

use std::env;
use std::str::FromStr;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 각 어댑터(캐시, 검색 인덱스, 랭킹 저장소)를 만들 때 사용됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 경로 (예: "sqlite:data/purepick.db")
    pub database_url: String,
    /// Redis 접속 주소 (예: "redis://127.0.0.1:6379")
    pub redis_url: String,
    /// Elasticsearch 접속 주소 (예: "http://127.0.0.1:9200")
    pub elasticsearch_url: String,
    /// 상품 문서가 저장된 인덱스 이름
    pub elasticsearch_index: String,
    /// 검색 결과 캐시 TTL (초). 기본 1시간
    pub search_cache_ttl_secs: u64,
    /// 검색 한 번에 인덱스에서 가져올 최대 ID 수
    pub search_max_hits: usize,
    /// `page_size` 파라미터가 없을 때 사용하는 기본 페이지 크기
    pub search_page_size: usize,
    /// true면 시작 시 DB의 모든 상품을 인덱스에 다시 색인합니다
    pub reindex_on_start: bool,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 8000)
    pub port: u16,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    /// 숫자 값을 파싱할 수 없으면 조용히 기본값을 사용합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?, // 필수: 없으면 에러
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            elasticsearch_url: env::var("ELASTICSEARCH_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:9200".to_string()),
            elasticsearch_index: env::var("ELASTICSEARCH_INDEX")
                .unwrap_or_else(|_| "products".to_string()),
            search_cache_ttl_secs: parse_or("SEARCH_CACHE_TTL_SECS", 3600),
            search_max_hits: parse_or("SEARCH_MAX_HITS", 100),
            search_page_size: parse_or("SEARCH_PAGE_SIZE", 10),
            reindex_on_start: parse_or("REINDEX_ON_START", false),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 8000),
        })
    }
}

/// 환경변수를 읽어 `T`로 파싱합니다. 없거나 파싱에 실패하면 `default`를 돌려줍니다.
///
/// 제네릭 `T: FromStr`: `"3600".parse::<u64>()`, `"true".parse::<bool>()`처럼
/// 문자열에서 만들 수 있는 모든 타입에 같은 함수를 쓸 수 있게 합니다.
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}
