//! 홀딩스 조회 엔진.
//!
//! 해석된 날짜 범위 + 선택적 필터 + 그룹핑 모드를 받아
//! 요약, 차트 시리즈, 결과 페이지, 전체 카운트를 하나의 결과로 조립합니다.
//!
//! 네 개의 읽기는 모두 동일한 필터 조건을 공유하며 순차 실행됩니다.
//! 저장소가 변하지 않는 한 같은 입력은 항상 같은 결과를 반환합니다.
//! 부수 효과와 캐싱은 없습니다.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use holdings_core::{resolve, DateRange, GroupBy, Pagination, RangeError, Timeframe};

use crate::error::DataError;
use crate::store::{
    AggregateRow, ChartPoint, HoldingRecord, HoldingsFilter, HoldingsStore, SummaryRow,
};

/// 조회 엔진 에러.
#[derive(Debug, Error)]
pub enum EngineError {
    /// 날짜 범위 해석 실패 (사용자 수정 가능, HTTP 400)
    #[error(transparent)]
    InvalidRange(#[from] RangeError),

    /// 저장소 접근 실패 (HTTP 500)
    #[error("쿼리 실행 실패: {0}")]
    Query(#[from] DataError),
}

/// 분석 조회 요청.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsRequest {
    /// 날짜 범위 단축어 (명시적 날짜보다 우선)
    pub timeframe: Option<Timeframe>,
    /// 명시적 범위 시작일
    pub start_date: Option<NaiveDate>,
    /// 명시적 범위 종료일
    pub end_date: Option<NaiveDate>,
    /// 증권사 ID 완전 일치 필터
    pub broker_id: Option<i32>,
    /// 종목 부분 일치 필터 (대소문자 무시)
    pub symbol: Option<String>,
    /// 집계 차원
    pub group_by: GroupBy,
    /// 페이지네이션
    pub pagination: Pagination,
}

/// 결과 테이블 페이지.
///
/// 그룹핑 모드면 엔티티별 집계 행, 아니면 원본 레코드입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TablePage {
    Grouped(Vec<AggregateRow>),
    Records(Vec<HoldingRecord>),
}

impl TablePage {
    /// 페이지에 담긴 행 수.
    pub fn len(&self) -> usize {
        match self {
            Self::Grouped(rows) => rows.len(),
            Self::Records(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 분석 조회 결과.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsResult {
    /// 실제 적용된 날짜 범위
    pub range: DateRange,
    /// 집계 요약
    pub summary: SummaryRow,
    /// 날짜별 차트 시리즈 (오름차순)
    pub chart: Vec<ChartPoint>,
    /// 결과 페이지
    pub table: TablePage,
    /// 슬라이싱 전 전체 행/그룹 수 (페이지네이션 total)
    pub total: i64,
}

/// 홀딩스 조회 엔진.
///
/// 저장소는 trait으로 주입되므로 테스트에서 인메모리 fake로 대체할 수
/// 있습니다. 엔진 자체는 상태가 없습니다.
pub struct HoldingsQueryEngine<S> {
    store: S,
}

impl<S: HoldingsStore> HoldingsQueryEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 내부 저장소 참조.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// 분석 조회를 실행합니다.
    ///
    /// 처리 순서: 날짜 범위 해석 → 필터 구성 → 요약 → 차트 →
    /// 결과 페이지 → 전체 카운트. 전체 카운트는 결과 페이지와 동일한
    /// 모집단(그룹 또는 원본 행)을 셉니다.
    pub async fn query(&self, request: &AnalyticsRequest) -> Result<AnalyticsResult, EngineError> {
        let range = self.resolve_range(request).await?;

        let filter = HoldingsFilter {
            range,
            broker_id: request.broker_id,
            symbol: request.symbol.clone(),
        };

        let summary = self.store.summary(&filter, request.group_by).await?;
        let chart = self.store.chart(&filter).await?;

        let Pagination { limit, offset } = request.pagination;
        let (table, total) = if request.group_by.column().is_some() {
            let rows = self
                .store
                .grouped_page(&filter, request.group_by, limit, offset)
                .await?;
            let total = self.store.grouped_count(&filter, request.group_by).await?;
            (TablePage::Grouped(rows), total)
        } else {
            let rows = self.store.record_page(&filter, limit, offset).await?;
            let total = self.store.record_count(&filter).await?;
            (TablePage::Records(rows), total)
        };

        debug!(
            group_by = request.group_by.as_str(),
            rows = table.len(),
            total,
            "Analytics query completed"
        );

        Ok(AnalyticsResult {
            range,
            summary,
            chart,
            table,
            total,
        })
    }

    /// 요청의 날짜 파라미터를 범위로 해석합니다.
    ///
    /// 날짜 파라미터가 전혀 없을 때만 저장소의 최근 거래일을 조회합니다.
    async fn resolve_range(&self, request: &AnalyticsRequest) -> Result<DateRange, EngineError> {
        let needs_fallback = request.timeframe.is_none()
            && request.start_date.is_none()
            && request.end_date.is_none();

        let last_trade_date = if needs_fallback {
            self.store.last_trade_date().await?
        } else {
            None
        };

        let range = resolve(
            request.timeframe,
            request.start_date,
            request.end_date,
            last_trade_date,
            Utc::now(),
        )?;

        Ok(range)
    }
}
