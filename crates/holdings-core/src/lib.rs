//! # Holdings Core
//!
//! 홀딩스 분석 API의 핵심 도메인 타입을 제공합니다.
//!
//! 이 크레이트는 I/O 없이 순수 로직만 포함합니다:
//! - 날짜 범위 해석 (timeframe 단축어, 명시적 범위, 기본 정책)
//! - 집계 차원(그룹핑) 타입
//! - 페이지네이션 검증
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod error;
pub mod logging;
pub mod range;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use range::{resolve, DateRange, Timeframe, MAX_RANGE_DAYS};
pub use types::*;
