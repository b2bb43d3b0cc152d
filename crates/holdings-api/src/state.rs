//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 모든 API 핸들러에서 공유되는 상태를 관리합니다.
//! Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.

use std::sync::Arc;

use holdings_data::{Database, HoldingsQueryEngine, PostgresHoldingsStore};

/// 애플리케이션 공유 상태.
///
/// 이 구조체는 모든 API 핸들러에서 접근할 수 있는 공유 리소스를 포함합니다.
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 풀 래퍼 (헬스 체크용)
    pub db: Option<Database>,

    /// 홀딩스 조회 엔진 - DB 연결이 설정된 경우에만 존재
    pub engine: Option<Arc<HoldingsQueryEngine<PostgresHoldingsStore>>>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성 (DB 연결 없음).
    pub fn new() -> Self {
        Self {
            db: None,
            engine: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 데이터베이스 연결 설정.
    ///
    /// DB 연결이 설정되면 조회 엔진도 함께 생성됩니다.
    pub fn with_database(mut self, db: Database) -> Self {
        let store = PostgresHoldingsStore::new(db.clone());
        self.engine = Some(Arc::new(HoldingsQueryEngine::new(store)));
        self.db = Some(db);
        self
    }

    /// 데이터베이스 연결 설정 여부 확인.
    pub fn has_db(&self) -> bool {
        self.db.is_some()
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        if let Some(db) = &self.db {
            db.health_check().await.unwrap_or(false)
        } else {
            false
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// 테스트용 AppState 생성 헬퍼.
///
/// 실제 DB 연결 없이 핸들러를 테스트할 수 있는 최소한의 상태를 생성합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    AppState::new()
}
