//! 홀딩스 분석 REST API.
//!
//! Axum 기반의 읽기 전용 분석 API를 제공합니다.
//! 엔드포인트 목록은 `routes` 모듈을 참고하세요.

pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

pub use error::{ApiErrorResponse, ApiResult};
pub use state::AppState;
