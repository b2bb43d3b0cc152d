//! 날짜 범위 해석.
//!
//! 요청의 날짜 관련 파라미터(timeframe 단축어, 명시적 start/end, 또는 없음)를
//! 구체적인 inclusive `[start, end]` 타임스탬프 범위로 변환합니다.
//!
//! # 기본 정책
//!
//! 날짜 파라미터가 전혀 없으면 **최근 거래일 단일 윈도우** 정책을 적용합니다:
//! 저장소의 가장 최근 trade_date 하루가 범위가 되고, 저장소가 비어 있으면
//! 오늘 날짜로 대체됩니다. (제품 이력상 존재했던 "최근 30일" 정책은
//! 채택하지 않습니다 — DESIGN.md 참고.)

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RangeError;

/// 명시적 범위의 최대 허용 일수.
pub const MAX_RANGE_DAYS: i64 = 365;

/// 날짜 범위 단축어.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    /// 1일
    OneDay,
    /// 1주
    OneWeek,
    /// 1개월 (30일)
    OneMonth,
    /// 3개월 (90일)
    ThreeMonths,
    /// 6개월 (180일)
    SixMonths,
    /// 1년 (365일)
    OneYear,
}

impl Timeframe {
    /// 모든 단축어.
    pub const ALL: [Timeframe; 6] = [
        Self::OneDay,
        Self::OneWeek,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
    ];

    /// 단축어가 의미하는 고정 일수.
    pub fn days(&self) -> i64 {
        match self {
            Self::OneDay => 1,
            Self::OneWeek => 7,
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::OneYear => 365,
        }
    }

    /// 쿼리 파라미터 토큰.
    pub fn token(&self) -> &'static str {
        match self {
            Self::OneDay => "1D",
            Self::OneWeek => "1W",
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::SixMonths => "6M",
            Self::OneYear => "1Y",
        }
    }
}

impl std::str::FromStr for Timeframe {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "1D" => Ok(Self::OneDay),
            "1W" => Ok(Self::OneWeek),
            "1M" => Ok(Self::OneMonth),
            "3M" => Ok(Self::ThreeMonths),
            "6M" => Ok(Self::SixMonths),
            "1Y" => Ok(Self::OneYear),
            _ => Err(RangeError::InvalidTimeframe(s.to_string())),
        }
    }
}

/// 해석된 inclusive 타임스탬프 범위.
///
/// 불변식: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// 범위 시작 (inclusive)
    pub start: DateTime<Utc>,
    /// 범위 끝 (inclusive)
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// 하루짜리 윈도우 (00:00:00 ~ 23:59:59.999999999).
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: start_of_day(date),
            end: end_of_day(date),
        }
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_nano_opt(23, 59, 59, 999_999_999).unwrap())
}

/// 날짜 파라미터를 구체적인 범위로 해석합니다.
///
/// 우선순위:
/// 1. `timeframe` 단축어: `[now - 고정일수, now]`
/// 2. 날짜 없음: `last_trade_date`(저장소의 최근 거래일) 하루,
///    없으면 오늘 하루
/// 3. start/end 중 하나만: 해당 날짜 하루
/// 4. 둘 다: start 00:00 ~ end 23:59:59.999...; start > end이거나
///    범위가 365일을 초과하면 실패
///
/// `now`는 결정적 테스트를 위해 주입합니다. `last_trade_date`는 2번 경로가
/// 필요할 때만 호출자가 저장소에서 조회하여 전달합니다.
pub fn resolve(
    timeframe: Option<Timeframe>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    last_trade_date: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> Result<DateRange, RangeError> {
    if let Some(tf) = timeframe {
        return Ok(DateRange {
            start: now - Duration::days(tf.days()),
            end: now,
        });
    }

    match (start_date, end_date) {
        (None, None) => {
            let date = last_trade_date.unwrap_or_else(|| now.date_naive());
            Ok(DateRange::single_day(date))
        }
        (Some(d), None) | (None, Some(d)) => Ok(DateRange::single_day(d)),
        (Some(start), Some(end)) => {
            if start > end {
                return Err(RangeError::StartAfterEnd);
            }
            let days = (end - start).num_days();
            if days > MAX_RANGE_DAYS {
                return Err(RangeError::RangeTooLong { days });
            }
            Ok(DateRange {
                start: start_of_day(start),
                end: end_of_day(end),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_timeframe_parse_tokens() {
        assert_eq!(Timeframe::from_str("1D").unwrap(), Timeframe::OneDay);
        assert_eq!(Timeframe::from_str("1w").unwrap(), Timeframe::OneWeek);
        assert_eq!(Timeframe::from_str("1M").unwrap(), Timeframe::OneMonth);
        assert_eq!(Timeframe::from_str("3M").unwrap(), Timeframe::ThreeMonths);
        assert_eq!(Timeframe::from_str("6M").unwrap(), Timeframe::SixMonths);
        assert_eq!(Timeframe::from_str("1Y").unwrap(), Timeframe::OneYear);

        assert_eq!(
            Timeframe::from_str("2W"),
            Err(RangeError::InvalidTimeframe("2W".to_string()))
        );
        assert!(Timeframe::from_str("").is_err());
    }

    #[test]
    fn test_timeframe_spans() {
        let now = fixed_now();
        for tf in Timeframe::ALL {
            let range = resolve(Some(tf), None, None, None, now).unwrap();
            assert_eq!(range.end, now, "{:?}: end must be now", tf);
            assert_eq!(
                range.end - range.start,
                Duration::days(tf.days()),
                "{:?}: span must equal the token's fixed duration",
                tf
            );
        }
    }

    #[test]
    fn test_timeframe_wins_over_explicit_dates() {
        let now = fixed_now();
        let range = resolve(
            Some(Timeframe::OneWeek),
            Some(date(2020, 1, 1)),
            Some(date(2020, 1, 2)),
            None,
            now,
        )
        .unwrap();
        assert_eq!(range.end, now);
    }

    #[test]
    fn test_no_dates_uses_last_trade_date() {
        let range = resolve(None, None, None, Some(date(2024, 6, 13)), fixed_now()).unwrap();
        assert_eq!(range, DateRange::single_day(date(2024, 6, 13)));
    }

    #[test]
    fn test_no_dates_empty_store_falls_back_to_today() {
        let now = fixed_now();
        let range = resolve(None, None, None, None, now).unwrap();
        assert_eq!(range, DateRange::single_day(now.date_naive()));
    }

    #[test]
    fn test_single_sided_date_becomes_one_day_window() {
        let now = fixed_now();
        let d = date(2024, 3, 1);

        let from_start = resolve(None, Some(d), None, None, now).unwrap();
        let from_end = resolve(None, None, Some(d), None, now).unwrap();

        assert_eq!(from_start, DateRange::single_day(d));
        assert_eq!(from_end, DateRange::single_day(d));
    }

    #[test]
    fn test_explicit_range_day_bounds() {
        let range = resolve(
            None,
            Some(date(2024, 1, 1)),
            Some(date(2024, 1, 31)),
            None,
            fixed_now(),
        )
        .unwrap();

        assert_eq!(
            range.start,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(range.end.date_naive(), date(2024, 1, 31));
        assert_eq!(range.end.time().hour(), 23);
        assert!(range.start <= range.end);
    }

    #[test]
    fn test_range_cap_boundary_365_passes_366_fails() {
        let start = date(2023, 1, 1);

        // 정확히 365일 차이는 통과
        let ok = resolve(None, Some(start), Some(date(2024, 1, 1)), None, fixed_now());
        assert!(ok.is_ok());

        // 366일 차이는 실패
        let err = resolve(None, Some(start), Some(date(2024, 1, 2)), None, fixed_now());
        assert_eq!(err, Err(RangeError::RangeTooLong { days: 366 }));
    }

    #[test]
    fn test_start_after_end_fails() {
        let err = resolve(
            None,
            Some(date(2024, 2, 1)),
            Some(date(2024, 1, 1)),
            None,
            fixed_now(),
        );
        assert_eq!(err, Err(RangeError::StartAfterEnd));
    }
}
