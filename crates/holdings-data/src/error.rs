//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 데이터 관련 오류.
///
/// 저장소는 읽기 전용이므로 쓰기 경로의 변형(duplicate/insert 등)은 없습니다.
/// 모든 변형은 HTTP 500으로 매핑되며, 재시도하지 않습니다.
#[derive(Debug, Error)]
pub enum DataError {
    /// 데이터베이스 연결 오류
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// 쿼리 실행 오류
    #[error("Query error: {0}")]
    QueryError(String),

    /// 레코드를 찾을 수 없음
    #[error("Record not found: {0}")]
    NotFound(String),

    /// 잘못된 데이터 형식
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// 마이그레이션 오류
    #[error("Migration error: {0}")]
    MigrationError(String),

    /// 연결 풀 소진
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DataError::NotFound("Row not found".to_string()),
            sqlx::Error::PoolTimedOut => DataError::PoolExhausted,
            sqlx::Error::Database(db_err) => DataError::QueryError(db_err.message().to_string()),
            _ => DataError::QueryError(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlx_row_not_found_maps_to_not_found() {
        let err: DataError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DataError::NotFound(_)));
    }

    #[test]
    fn test_sqlx_pool_timeout_maps_to_exhausted() {
        let err: DataError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DataError::PoolExhausted));
    }
}
