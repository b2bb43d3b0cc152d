//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/v1/holdings` - 홀딩스 분석 조회

pub mod health;
pub mod holdings;

pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use holdings::{
    holdings_router, ChartItem, HoldingsAnalyticsResponse, HoldingsQuery, PaginationMeta, Summary,
};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // API v1 엔드포인트
        .nest("/api/v1/holdings", holdings_router())
}
