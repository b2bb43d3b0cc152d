//! 홀딩스 분석 endpoint.
//!
//! 단일 조회 엔드포인트로 요약, 차트 시리즈, 결과 테이블 페이지를
//! 한 번에 반환합니다. 모든 파라미터 검증은 DB 접근 전에 수행됩니다.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use holdings_core::{GroupBy, Pagination, Timeframe};
use holdings_data::{AnalyticsRequest, TablePage};

use crate::error::{
    bad_request, engine_error_response, internal_error, ApiErrorResponse, ApiResult,
};
use crate::state::AppState;

// ==================== Request/Response 타입 ====================

/// 홀딩스 분석 조회 파라미터.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct HoldingsQuery {
    /// 날짜 범위 단축어 (1D | 1W | 1M | 3M | 6M | 1Y), 명시적 날짜보다 우선
    pub timeframe: Option<String>,
    /// 범위 시작일 (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// 범위 종료일 (YYYY-MM-DD)
    pub end_date: Option<String>,
    /// 증권사 ID 완전 일치 필터
    pub broker_id: Option<i32>,
    /// 종목 부분 일치 필터 (대소문자 무시)
    pub symbol: Option<String>,
    /// 집계 차원 (broker_id | symbol | none, 기본값: broker_id)
    pub group_by: Option<String>,
    /// 페이지 크기 (1~1000, 기본값: 50)
    pub limit: Option<i64>,
    /// 페이지 시작 위치 (0 이상, 기본값: 0)
    pub offset: Option<i64>,
}

/// 집계 요약.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Summary {
    /// 수량 합계
    pub total_volume: Decimal,
    /// 거래 대금 합계
    pub total_turnover: Decimal,
    /// 집계 차원의 distinct 엔티티 수
    pub active_entities: i64,
}

/// 차트 포인트 (달력 날짜별 합계).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChartItem {
    /// 날짜 (YYYY-MM-DD)
    pub date: String,
    /// 수량 합계
    pub volume: Decimal,
    /// 거래 대금 합계
    pub turnover: Decimal,
}

/// 페이지네이션 메타데이터.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub limit: i64,
    pub offset: i64,
    /// 슬라이싱 전 전체 행/그룹 수
    pub total: i64,
}

/// 홀딩스 분석 응답.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HoldingsAnalyticsResponse {
    /// 집계 요약
    pub summary: Summary,
    /// 날짜별 차트 시리즈 (오름차순)
    pub chart_data: Vec<ChartItem>,
    /// 결과 테이블 페이지 (그룹핑 모드면 집계 행, 아니면 원본 레코드)
    #[schema(value_type = Vec<Object>)]
    pub table_data: TablePage,
    /// 페이지네이션 메타데이터
    pub pagination: PaginationMeta,
}

// ==================== 날짜 파싱 ====================

/// NaiveDate로 유연하게 파싱합니다.
///
/// 지원 형식:
/// - ISO 8601: `2024-01-15`
/// - 슬래시 구분: `2024/01/15`
/// - 압축형: `20240115` (YYYYMMDD)
fn parse_date_flexible(s: &str, field_name: &str) -> Result<NaiveDate, ApiErrorResponse> {
    const FORMATS: &[&str] = &[
        "YYYY-MM-DD (2024-01-15)",
        "YYYY/MM/DD (2024/01/15)",
        "YYYYMMDD (20240115)",
    ];

    // YYYY-MM-DD 형식
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    // YYYY/MM/DD 형식
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y/%m/%d") {
        return Ok(date);
    }

    // YYYYMMDD 형식
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y%m%d") {
        return Ok(date);
    }

    Err(ApiErrorResponse::with_details(
        "INVALID_DATE",
        format!("{field_name} 날짜 형식이 유효하지 않습니다: '{s}'"),
        serde_json::json!({
            "field": field_name,
            "value": s,
            "supported_formats": FORMATS,
        }),
    ))
}

// ==================== 핸들러 ====================

/// 홀딩스 분석 조회.
///
/// GET /api/v1/holdings
#[utoipa::path(
    get,
    path = "/api/v1/holdings",
    tag = "holdings",
    params(HoldingsQuery),
    responses(
        (status = 200, description = "분석 결과", body = HoldingsAnalyticsResponse),
        (status = 400, description = "유효하지 않은 파라미터", body = ApiErrorResponse),
        (status = 500, description = "조회 실행 실패", body = ApiErrorResponse)
    )
)]
pub async fn get_holdings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HoldingsQuery>,
) -> ApiResult<Json<HoldingsAnalyticsResponse>> {
    // 파라미터 검증은 전부 DB 접근 전에 수행
    let timeframe = match query.timeframe {
        Some(ref s) => Some(
            s.parse::<Timeframe>()
                .map_err(|e| bad_request("INVALID_TIMEFRAME", e.to_string()))?,
        ),
        None => None,
    };

    let start_date = match query.start_date {
        Some(ref s) => Some(
            parse_date_flexible(s, "start_date")
                .map_err(|e| (StatusCode::BAD_REQUEST, Json(e)))?,
        ),
        None => None,
    };

    let end_date = match query.end_date {
        Some(ref s) => Some(
            parse_date_flexible(s, "end_date")
                .map_err(|e| (StatusCode::BAD_REQUEST, Json(e)))?,
        ),
        None => None,
    };

    let group_by = match query.group_by {
        Some(ref s) => s
            .parse::<GroupBy>()
            .map_err(|e| bad_request("INVALID_GROUP_BY", e))?,
        None => GroupBy::default(),
    };

    let pagination = Pagination::validate(query.limit, query.offset)
        .map_err(|e| bad_request("INVALID_PAGINATION", e))?;

    let engine = state
        .engine
        .as_ref()
        .ok_or_else(|| internal_error("DB_NOT_CONFIGURED", "데이터베이스가 설정되지 않았습니다"))?;

    let request = AnalyticsRequest {
        timeframe,
        start_date,
        end_date,
        broker_id: query.broker_id,
        symbol: query.symbol,
        group_by,
        pagination,
    };

    let result = engine
        .query(&request)
        .await
        .map_err(engine_error_response)?;

    Ok(Json(HoldingsAnalyticsResponse {
        summary: Summary {
            total_volume: result.summary.total_volume,
            total_turnover: result.summary.total_turnover,
            active_entities: result.summary.active_entities,
        },
        chart_data: result
            .chart
            .into_iter()
            .map(|p| ChartItem {
                date: p.date.to_string(),
                volume: p.volume,
                turnover: p.turnover,
            })
            .collect(),
        table_data: result.table,
        pagination: PaginationMeta {
            limit: pagination.limit,
            offset: pagination.offset,
            total: result.total,
        },
    }))
}

/// 홀딩스 라우터 생성.
pub fn holdings_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_holdings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::state::create_test_state;

    fn test_app() -> Router {
        let state = Arc::new(create_test_state());
        Router::new()
            .nest("/api/v1/holdings", holdings_router())
            .with_state(state)
    }

    async fn get_error(uri: &str) -> (StatusCode, ApiErrorResponse) {
        let response = test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiErrorResponse = serde_json::from_slice(&body).unwrap();
        (status, error)
    }

    #[test]
    fn test_parse_date_flexible_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date_flexible("2024-01-15", "start_date").unwrap(), expected);
        assert_eq!(parse_date_flexible("2024/01/15", "start_date").unwrap(), expected);
        assert_eq!(parse_date_flexible("20240115", "start_date").unwrap(), expected);
    }

    #[test]
    fn test_parse_date_flexible_rejects_garbage() {
        let err = parse_date_flexible("15-01-2024", "end_date").unwrap_err();
        assert_eq!(err.code, "INVALID_DATE");
        assert!(err.message.contains("end_date"));
        assert!(err.details.is_some());
    }

    #[tokio::test]
    async fn test_invalid_timeframe_returns_400() {
        let (status, error) = get_error("/api/v1/holdings?timeframe=2W").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error.code, "INVALID_TIMEFRAME");
    }

    #[tokio::test]
    async fn test_invalid_date_returns_400() {
        let (status, error) = get_error("/api/v1/holdings?start_date=not-a-date").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error.code, "INVALID_DATE");
    }

    #[tokio::test]
    async fn test_invalid_group_by_returns_400() {
        let (status, error) = get_error("/api/v1/holdings?group_by=exchange").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error.code, "INVALID_GROUP_BY");
    }

    #[tokio::test]
    async fn test_limit_zero_returns_400() {
        let (status, error) = get_error("/api/v1/holdings?limit=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error.code, "INVALID_PAGINATION");
    }

    #[tokio::test]
    async fn test_limit_over_max_returns_400() {
        let (status, error) = get_error("/api/v1/holdings?limit=1001").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error.code, "INVALID_PAGINATION");
    }

    #[tokio::test]
    async fn test_negative_offset_returns_400() {
        let (status, error) = get_error("/api/v1/holdings?offset=-1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error.code, "INVALID_PAGINATION");
    }

    #[tokio::test]
    async fn test_without_db_returns_500() {
        // 파라미터는 전부 유효하므로 검증을 통과하고 DB 미설정에서 실패
        let (status, error) = get_error("/api/v1/holdings?timeframe=1M&limit=10").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.code, "DB_NOT_CONFIGURED");
    }
}
