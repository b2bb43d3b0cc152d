//! 집계 차원 및 페이지네이션 타입.
//!
//! 그룹핑은 차원별 분기 대신 전략 파라미터로 모델링합니다:
//! 요약/테이블/카운트 로직은 한 번만 작성되고 `GroupBy`가 제공하는
//! 컬럼 셀렉터로 파라미터화됩니다.

use serde::{Deserialize, Serialize};

/// 기본 페이지 크기.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// 최대 페이지 크기.
pub const MAX_PAGE_SIZE: i64 = 1000;

/// 집계 차원.
///
/// 요약/테이블 행이 어떤 엔티티 기준으로 묶이는지 결정합니다.
/// `None`은 원본 레코드를 집계 없이 그대로 반환하는 모드입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// 증권사별 집계
    BrokerId,
    /// 종목별 집계
    Symbol,
    /// 집계 없음 (원본 레코드 반환)
    None,
}

impl Default for GroupBy {
    fn default() -> Self {
        Self::BrokerId
    }
}

impl GroupBy {
    /// 집계 대상 컬럼명. `None` 모드는 집계 컬럼이 없습니다.
    pub fn column(&self) -> Option<&'static str> {
        match self {
            Self::BrokerId => Some("broker_id"),
            Self::Symbol => Some("symbol"),
            Self::None => None,
        }
    }

    /// 요약의 active_entities 계산에 쓰는 DISTINCT 컬럼명.
    ///
    /// 집계 없음 모드는 broker_id를 기본 차원으로 사용합니다.
    pub fn distinct_column(&self) -> &'static str {
        self.column().unwrap_or("broker_id")
    }

    /// 쿼리 파라미터 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BrokerId => "broker_id",
            Self::Symbol => "symbol",
            Self::None => "none",
        }
    }
}

impl std::str::FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "broker_id" => Ok(Self::BrokerId),
            "symbol" => Ok(Self::Symbol),
            "none" => Ok(Self::None),
            _ => Err(format!(
                "Unknown group_by: '{}' (allowed: broker_id, symbol, none)",
                s
            )),
        }
    }
}

/// 페이지네이션 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 페이지 크기 (1..=1000)
    pub limit: i64,
    /// 시작 오프셋 (>= 0)
    pub offset: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl Pagination {
    /// 선택적 파라미터를 검증하여 페이지네이션을 생성합니다.
    ///
    /// limit이 1..=1000 범위를 벗어나거나 offset이 음수면 에러 메시지를
    /// 반환합니다. 생략된 값은 기본값(limit 50, offset 0)을 사용합니다.
    pub fn validate(limit: Option<i64>, offset: Option<i64>) -> Result<Self, String> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
        let offset = offset.unwrap_or(0);

        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(format!(
                "limit must be between 1 and {} (got {})",
                MAX_PAGE_SIZE, limit
            ));
        }
        if offset < 0 {
            return Err(format!("offset must be >= 0 (got {})", offset));
        }

        Ok(Self { limit, offset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_group_by_parse() {
        assert_eq!(GroupBy::from_str("broker_id").unwrap(), GroupBy::BrokerId);
        assert_eq!(GroupBy::from_str("symbol").unwrap(), GroupBy::Symbol);
        assert_eq!(GroupBy::from_str("none").unwrap(), GroupBy::None);
        assert!(GroupBy::from_str("date").is_err());
        assert!(GroupBy::from_str("BROKER_ID").is_err());
    }

    #[test]
    fn test_group_by_columns() {
        assert_eq!(GroupBy::BrokerId.column(), Some("broker_id"));
        assert_eq!(GroupBy::Symbol.column(), Some("symbol"));
        assert_eq!(GroupBy::None.column(), None);

        // 집계 없음 모드의 요약 차원은 broker_id
        assert_eq!(GroupBy::None.distinct_column(), "broker_id");
        assert_eq!(GroupBy::Symbol.distinct_column(), "symbol");
    }

    #[test]
    fn test_group_by_default() {
        assert_eq!(GroupBy::default(), GroupBy::BrokerId);
    }

    #[test]
    fn test_pagination_defaults() {
        let p = Pagination::validate(None, None).unwrap();
        assert_eq!(p.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_pagination_bounds() {
        assert!(Pagination::validate(Some(1), Some(0)).is_ok());
        assert!(Pagination::validate(Some(1000), Some(0)).is_ok());
        assert!(Pagination::validate(Some(0), Some(0)).is_err());
        assert!(Pagination::validate(Some(1001), Some(0)).is_err());
        assert!(Pagination::validate(Some(50), Some(-1)).is_err());
    }
}
