//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.
//! 에러 분류 원칙: 사용자가 파라미터를 고쳐서 해결할 수 있으면 400,
//! 서버/저장소 문제면 500입니다. 500 응답의 메시지는 일반적인 문구만
//! 담고, 상세 원인은 서버 로그에만 남깁니다.

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

use holdings_data::EngineError;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "INVALID_RANGE",
///   "message": "조회 범위 400일이 최대 365일을 초과합니다",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "INVALID_RANGE", "QUERY_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 에러 코드 반환.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// 에러 메시지 반환.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 400 Bad Request 응답 생성 헬퍼.
pub fn bad_request(
    code: impl Into<String>,
    message: impl Into<String>,
) -> (StatusCode, Json<ApiErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiErrorResponse::new(code, message)),
    )
}

/// 500 Internal Server Error 응답 생성 헬퍼.
pub fn internal_error(
    code: impl Into<String>,
    message: impl Into<String>,
) -> (StatusCode, Json<ApiErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiErrorResponse::new(code, message)),
    )
}

/// 조회 엔진 에러를 HTTP 응답으로 변환합니다.
///
/// 날짜 범위 에러는 메시지를 그대로 노출하고 (사용자가 수정 가능),
/// 저장소 에러는 상세를 로그에만 남기고 일반 메시지를 반환합니다.
pub fn engine_error_response(err: EngineError) -> (StatusCode, Json<ApiErrorResponse>) {
    match err {
        EngineError::InvalidRange(e) => bad_request("INVALID_RANGE", e.to_string()),
        EngineError::Query(e) => {
            error!(error = %e, "Holdings query failed");
            internal_error("QUERY_ERROR", "조회 실행에 실패했습니다")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdings_core::RangeError;
    use holdings_data::DataError;

    #[test]
    fn test_api_error_response_new() {
        let error = ApiErrorResponse::new("TEST_ERROR", "Test message");
        assert_eq!(error.code, "TEST_ERROR");
        assert_eq!(error.message, "Test message");
        assert!(error.timestamp.is_some());
        assert!(error.details.is_none());
    }

    #[test]
    fn test_json_serialization_skips_empty_fields() {
        let mut error = ApiErrorResponse::new("NOT_FOUND", "Resource not found");
        error.timestamp = None;
        let json = serde_json::to_string(&error).unwrap();

        assert!(!json.contains("timestamp"));
        assert!(!json.contains("details"));
        assert!(json.contains(r#""code":"NOT_FOUND""#));
    }

    #[test]
    fn test_invalid_range_maps_to_400_with_message() {
        let err = EngineError::InvalidRange(RangeError::StartAfterEnd);
        let (status, Json(body)) = engine_error_response(err);

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "INVALID_RANGE");
        assert!(!body.message.is_empty());
    }

    #[test]
    fn test_query_error_maps_to_500_without_detail() {
        let err = EngineError::Query(DataError::QueryError("relation missing".to_string()));
        let (status, Json(body)) = engine_error_response(err);

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "QUERY_ERROR");
        // 내부 상세는 응답에 노출하지 않음
        assert!(!body.message.contains("relation"));
    }
}
