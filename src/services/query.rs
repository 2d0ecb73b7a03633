//! # 검색어 정규화
//!
//! 앞뒤 공백만 제거합니다. 대소문자 변환이나 토큰 분리는 하지 않습니다.
//! 오타 허용(fuzziness) 같은 유사 매칭은 전부 검색 인덱스가 담당합니다.

use crate::error::{ValidationError, MAX_QUERY_CHARS};

/// 원본 검색어를 검증하고 정규화된 문자열을 돌려줍니다.
///
/// - `None`, 빈 문자열, 공백뿐인 문자열 → `ValidationError::Empty`
/// - 공백 제거 후 100자 초과 → `ValidationError::TooLong`
///
/// 길이는 바이트가 아니라 문자(`char`) 수로 셉니다.
/// 한글 "토너"는 6바이트지만 2글자입니다.
pub fn normalize(raw: Option<&str>) -> Result<String, ValidationError> {
    let trimmed = raw.unwrap_or_default().trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    if trimmed.chars().count() > MAX_QUERY_CHARS {
        return Err(ValidationError::TooLong);
    }

    Ok(trimmed.to_string())
}
