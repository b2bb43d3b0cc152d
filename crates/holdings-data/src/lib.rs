//! 홀딩스 데이터 접근 및 조회 엔진.
//!
//! 이 crate는 다음을 제공합니다:
//! - `holdings` 테이블에 대한 PostgreSQL 읽기 전용 저장소
//! - 테스트에서 인메모리 fake로 대체 가능한 저장소 trait
//! - 요약/차트/테이블/카운트를 하나의 결과로 조립하는 조회 엔진

pub mod engine;
pub mod error;
pub mod postgres;
pub mod store;

pub use error::{DataError, Result};

// 저장소 타입 재내보내기
pub use postgres::{Database, DatabaseConfig, PostgresHoldingsStore};
pub use store::{
    AggregateRow, ChartPoint, HoldingRecord, HoldingsFilter, HoldingsStore, SummaryRow,
};

// 조회 엔진 재내보내기
pub use engine::{
    AnalyticsRequest, AnalyticsResult, EngineError, HoldingsQueryEngine, TablePage,
};
