//! 홀딩스 분석 시스템의 에러 타입.
//!
//! 이 모듈은 날짜 범위 해석 단계에서 발생하는, 사용자가 직접 수정할 수 있는
//! 에러를 정의합니다. 모두 HTTP 400으로 매핑됩니다.

use thiserror::Error;

use crate::range::MAX_RANGE_DAYS;

/// 날짜 범위 해석 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// 인식할 수 없는 timeframe 단축어
    #[error("유효하지 않은 timeframe: '{0}' (허용: 1D, 1W, 1M, 3M, 6M, 1Y)")]
    InvalidTimeframe(String),

    /// start_date가 end_date보다 이후
    #[error("start_date가 end_date보다 이후입니다")]
    StartAfterEnd,

    /// 조회 범위가 최대 허용 일수를 초과
    #[error("조회 범위 {days}일이 최대 {MAX_RANGE_DAYS}일을 초과합니다")]
    RangeTooLong { days: i64 },
}

/// 날짜 범위 해석 Result 타입.
pub type RangeResult<T> = Result<T, RangeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_limit() {
        let err = RangeError::RangeTooLong { days: 400 };
        assert!(err.to_string().contains("400"));
        assert!(err.to_string().contains("365"));
    }

    #[test]
    fn test_invalid_timeframe_lists_tokens() {
        let err = RangeError::InvalidTimeframe("2W".to_string());
        assert!(err.to_string().contains("2W"));
        assert!(err.to_string().contains("1D"));
    }
}
