//! 홀딩스 분석 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! 헬스 체크와 홀딩스 분석 조회 엔드포인트를 제공합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use holdings_api::openapi::swagger_ui_router;
use holdings_api::routes::create_api_router;
use holdings_api::state::AppState;
use holdings_core::config::AppConfig;
use holdings_core::logging::{init_logging, LogConfig, LogFormat};
use holdings_data::{Database, DatabaseConfig};

/// 소켓 주소 구성.
///
/// # Errors
/// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
fn socket_addr(config: &AppConfig) -> Result<SocketAddr, std::net::AddrParseError> {
    format!("{}:{}", config.server.host, config.server.port).parse()
}

/// AppState 초기화.
///
/// DATABASE_URL이 설정되어 있으면 연결 풀을 생성하고 연결을 검증합니다.
/// 연결에 실패하면 DB 없이 시작합니다 (홀딩스 조회는 500 반환).
async fn create_app_state(config: &AppConfig) -> AppState {
    let state = AppState::new();

    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        warn!("DATABASE_URL not set, holdings queries will be disabled");
        return state;
    };

    let db_config = DatabaseConfig {
        url: database_url,
        max_connections: config.database.max_connections,
        connect_timeout_secs: config.database.connect_timeout_secs,
        idle_timeout_secs: config.database.idle_timeout_secs,
        ..Default::default()
    };

    match Database::connect(&db_config).await {
        Ok(db) => {
            // 연결 검증
            match db.health_check().await {
                Ok(_) => info!("Connected to PostgreSQL successfully"),
                Err(e) => {
                    error!("Failed to verify database connection: {}", e);
                    return state;
                }
            }

            // 마이그레이션 (RUN_MIGRATIONS=true인 경우)
            let run_migrations = std::env::var("RUN_MIGRATIONS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false);
            if run_migrations {
                if let Err(e) = db.migrate().await {
                    error!("Migration failed: {}", e);
                    return state;
                }
            }

            state.with_database(db)
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            state
        }
    }
}

/// CORS 미들웨어 구성.
///
/// CORS_ORIGINS 환경변수가 설정되어 있으면 해당 origin만 허용합니다.
/// 설정되지 않으면 개발 모드로 간주하여 모든 origin을 허용합니다.
///
/// # 환경변수
///
/// - `CORS_ORIGINS`: 쉼표로 구분된 허용 origin 목록
///   예: `https://dashboard.example.com,https://admin.example.com`
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            // 프로덕션: 특정 origin만 허용
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            // 개발: 모든 origin 허용
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600))
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(create_api_router().with_state(state))
        // OpenAPI 문서 및 Swagger UI
        .merge(swagger_ui_router())
        // 미들웨어
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer())
}

/// OpenAPI 스펙 내보내기 처리.
///
/// `--export-openapi` 플래그 또는 `EXPORT_OPENAPI` 환경변수가 설정된 경우
/// OpenAPI JSON 스펙을 stdout으로 출력하고 종료합니다.
fn handle_export_openapi() -> Result<(), Box<dyn std::error::Error>> {
    use holdings_api::openapi::ApiDoc;
    use utoipa::OpenApi as _;

    let export_flag = std::env::args().any(|arg| arg == "--export-openapi");
    let export_env = std::env::var("EXPORT_OPENAPI")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    if export_flag || export_env {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec)?;
        println!("{}", json);
        std::process::exit(0);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // OpenAPI 내보내기 처리 (서버 시작 전)
    handle_export_openapi()?;

    // 설정 로드 (config/default.toml + HOLDINGS__* 환경변수)
    let config = AppConfig::load_default()?;

    // tracing 초기화
    let log_format = config
        .logging
        .format
        .parse::<LogFormat>()
        .unwrap_or_default();
    init_logging(LogConfig::new(&config.logging.level).with_format(log_format))?;

    info!("Starting Holdings Analytics API server...");

    let addr = socket_addr(&config).map_err(|e| {
        error!(
            host = %config.server.host,
            port = config.server.port,
            error = %e,
            "소켓 주소 설정이 유효하지 않습니다. HOLDINGS__SERVER__HOST, HOLDINGS__SERVER__PORT를 확인하세요."
        );
        e
    })?;

    // AppState 생성 (DB 연결 포함)
    let state = Arc::new(create_app_state(&config).await);

    info!(
        version = %state.version,
        has_db = state.has_db(),
        "Application state initialized"
    );

    // 라우터 생성
    let app = create_router(state);

    // 서버 시작
    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown 처리
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
