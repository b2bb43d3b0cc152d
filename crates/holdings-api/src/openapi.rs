//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiErrorResponse;
use crate::routes::{
    ChartItem, ComponentHealth, ComponentStatus, HealthResponse, HoldingsAnalyticsResponse,
    PaginationMeta, Summary,
};

/// Holdings API 문서.
///
/// 모든 엔드포인트와 스키마를 포함하는 OpenAPI 3.0 스펙입니다.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Holdings Analytics API",
        version = "0.1.0",
        description = r#"
# 홀딩스 분석 REST API

증권사별/종목별 보유 현황을 조회하는 읽기 전용 분석 API입니다.

## 주요 기능

- **요약**: 기간 내 수량/거래 대금 합계, 활성 엔티티 수
- **차트**: 날짜별 합계 시리즈
- **테이블**: 증권사 또는 종목별 집계 페이지 (원본 레코드 모드 지원)

## 날짜 범위

`timeframe` 단축어(1D, 1W, 1M, 3M, 6M, 1Y)가 명시적 날짜보다 우선합니다.
날짜 파라미터가 전혀 없으면 가장 최근 거래일 하루를 조회합니다.
명시적 범위는 최대 365일입니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(
            name = "Holdings Analytics Team",
            url = "https://github.com/user/holdings-analytics"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "holdings", description = "홀딩스 분석 - 요약/차트/테이블 조회")
    ),
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Common =====
            ApiErrorResponse,

            // ===== Holdings =====
            HoldingsAnalyticsResponse,
            Summary,
            ChartItem,
            PaginationMeta,
        )
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::holdings::get_holdings,
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// `/swagger-ui`에서 대화형 문서를, `/api-docs/openapi.json`에서
/// OpenAPI JSON 스펙을 제공합니다.
pub fn swagger_ui_router() -> Router {
    Router::new().merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();

        assert!(json.contains("/api/v1/holdings"));
        assert!(json.contains("/health/ready"));
    }
}
