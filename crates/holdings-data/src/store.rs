//! 홀딩스 저장소 추상화.
//!
//! 조회 엔진이 사용하는 읽기 전용 저장소 trait과 행 타입을 정의합니다.
//! 프로세스 전역 저장소 핸들은 전역 싱글턴이 아니라 주입되는 의존성으로
//! 모델링하여, 테스트에서 인메모리 fake로 대체할 수 있게 합니다.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use holdings_core::{DateRange, GroupBy};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::Result;

/// 요청당 한 번 만들어지는 필터 기준.
///
/// 한 요청의 모든 읽기(요약, 차트, 페이지, 카운트)는 이 필터가 의미하는
/// 동일한 논리 조건을 공유합니다:
///
/// ```sql
/// quantity > 0
///   AND trade_date BETWEEN range.start AND range.end
///   AND (broker_id = :broker_id)       -- 설정된 경우
///   AND (symbol ILIKE '%:symbol%')     -- 설정된 경우, 대소문자 무시
/// ```
///
/// `quantity <= 0` 레코드는 취소된 거래로 간주되어 모든 분석에서 제외됩니다.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingsFilter {
    /// 해석된 inclusive 날짜 범위
    pub range: DateRange,
    /// 증권사 ID 완전 일치 필터
    pub broker_id: Option<i32>,
    /// 종목 부분 일치 필터 (대소문자 무시)
    pub symbol: Option<String>,
}

/// 거래 레코드 (holdings 테이블 한 행).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct HoldingRecord {
    pub id: i32,
    pub broker_id: i32,
    pub symbol: String,
    /// 거래 수량 (음수/0이면 분석 대상에서 제외)
    pub quantity: Decimal,
    /// 거래 대금
    pub turnover: Decimal,
    pub trade_date: DateTime<Utc>,
}

/// 집계 요약 행.
///
/// 매칭 행이 없으면 합계는 null이 아니라 0입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// 수량 합계
    pub total_volume: Decimal,
    /// 거래 대금 합계
    pub total_turnover: Decimal,
    /// 그룹핑 차원의 distinct 엔티티 수
    pub active_entities: i64,
}

impl SummaryRow {
    /// 매칭 행이 없을 때의 요약.
    pub fn zero() -> Self {
        Self {
            total_volume: Decimal::ZERO,
            total_turnover: Decimal::ZERO,
            active_entities: 0,
        }
    }
}

/// 차트 포인트 — 달력 날짜별 합계.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub volume: Decimal,
    pub turnover: Decimal,
}

/// 집계 행 — 그룹핑 엔티티별 합계.
///
/// 그룹핑 차원에 따라 `broker_id` 또는 `symbol` 중 하나만 채워집니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broker_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub quantity: Decimal,
    pub turnover: Decimal,
}

/// 읽기 전용 홀딩스 저장소.
///
/// 모든 메서드는 단발성 읽기입니다. 실패는 즉시 전파되고 재시도하지
/// 않습니다. 구현체는 요청 간 공유 가능해야 합니다 (`Send + Sync`).
#[async_trait]
pub trait HoldingsStore: Send + Sync {
    /// 저장소에 존재하는 가장 최근 거래일 (quantity > 0 기준).
    ///
    /// 날짜 파라미터가 없는 요청의 기본 윈도우 결정에 사용됩니다.
    /// 저장소가 비어 있으면 `None`.
    async fn last_trade_date(&self) -> Result<Option<NaiveDate>>;

    /// 요약: SUM(quantity), SUM(turnover), COUNT(DISTINCT 그룹핑 컬럼).
    ///
    /// `group_by`가 `None` 모드면 broker_id를 distinct 차원으로 사용합니다.
    async fn summary(&self, filter: &HoldingsFilter, group_by: GroupBy) -> Result<SummaryRow>;

    /// 범위 내 달력 날짜별 합계, 날짜 오름차순.
    async fn chart(&self, filter: &HoldingsFilter) -> Result<Vec<ChartPoint>>;

    /// 그룹핑 엔티티별 집계 페이지, 수량 합계 내림차순.
    ///
    /// `group_by`는 집계 컬럼이 있는 모드여야 합니다
    /// (`BrokerId` 또는 `Symbol`).
    async fn grouped_page(
        &self,
        filter: &HoldingsFilter,
        group_by: GroupBy,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AggregateRow>>;

    /// 그룹핑 엔티티의 distinct 수 (페이지네이션 total).
    async fn grouped_count(&self, filter: &HoldingsFilter, group_by: GroupBy) -> Result<i64>;

    /// 원본 레코드 페이지, trade_date 내림차순 (동순위는 quantity 내림차순).
    async fn record_page(
        &self,
        filter: &HoldingsFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<HoldingRecord>>;

    /// 매칭 원본 레코드 수 (페이지네이션 total).
    async fn record_count(&self, filter: &HoldingsFilter) -> Result<i64>;
}
