//! # Redis 연결 핸들
//!
//! 캐시와 랭킹 저장소가 하나의 `ConnectionManager`를 공유합니다.
//! 연결은 처음 사용할 때 맺습니다. 서버 시작 시점에 Redis가 내려가 있어도
//! 서버는 뜨고, 이후 요청에서 Redis가 살아나면 그때 연결됩니다.

use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{Client, RedisError, RedisResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// 연결 시도와 명령 응답에 거는 시간 제한
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(2);
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(2);

/// 여러 요청이 동시에 써도 안전한 Redis 핸들
///
/// `Clone`해도 같은 `OnceCell`(Arc)을 가리키므로 연결은 한 번만 맺어집니다.
#[derive(Clone)]
pub struct RedisHandle {
    client: Client,
    connection: Arc<OnceCell<ConnectionManager>>,
}

impl RedisHandle {
    /// URL만 검증하고 실제 연결은 하지 않습니다.
    pub fn open(url: &str) -> Result<Self, RedisError> {
        Ok(Self {
            client: Client::open(url)?,
            connection: Arc::new(OnceCell::new()),
        })
    }

    /// 공유 연결을 가져옵니다. 아직 없으면 이번 호출에서 연결합니다.
    ///
    /// 연결에 실패하면 셀은 비어 있는 채로 남으므로 다음 호출이 다시 시도합니다.
    /// `ConnectionManager`는 내부적으로 다중화(multiplexed)되어 있어
    /// clone해서 각 요청이 따로 들고 있어도 됩니다.
    pub async fn connection(&self) -> RedisResult<ConnectionManager> {
        let manager = self
            .connection
            .get_or_try_init(|| {
                let config = ConnectionManagerConfig::new()
                    .set_connection_timeout(CONNECTION_TIMEOUT)
                    .set_response_timeout(RESPONSE_TIMEOUT);
                ConnectionManager::new_with_config(self.client.clone(), config)
            })
            .await?;
        Ok(manager.clone())
    }
}

/// Redis에 도달하지 못한 실패인지(true), 명령 자체가 잘못된 실패인지(false) 구분합니다.
pub fn is_unreachable(err: &RedisError) -> bool {
    err.is_io_error() || err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped()
}
