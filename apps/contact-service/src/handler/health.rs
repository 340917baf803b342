//! # ヘルスチェックハンドラ
//!
//! Contact Service の稼働状態を確認するためのエンドポイント。認証不要。
//!
//! - `/health` - Liveness Check（常に `"healthy"` を返す）
//! - `/health/ready` - Readiness Check（PostgreSQL / Redis の接続状態を確認）
//!
//! レスポンス型は [`contactbook_shared::HealthResponse`] / [`contactbook_shared::ReadinessResponse`] を参照。

use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use contactbook_infra::{InfraError, SessionManager, db};
use contactbook_shared::{CheckStatus, HealthResponse, ReadinessResponse};
use sqlx::PgPool;

/// 個別チェックのタイムアウト
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Liveness Check エンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status:  "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness Check 用の State
pub struct ReadinessState {
    pub pool:            PgPool,
    pub session_manager: Arc<dyn SessionManager>,
}

/// Readiness Check エンドポイント
///
/// PostgreSQL と Redis の接続状態を並行チェックする。
/// 全チェック OK → 200、1 つでも失敗 → 503。
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let (database, redis) = tokio::join!(
        check("database", db::ping(&state.pool)),
        check("redis", state.session_manager.ping()),
    );

    let mut checks = HashMap::new();
    checks.insert("database".to_string(), database);
    checks.insert("redis".to_string(), redis);

    let response = ReadinessResponse::from_checks(checks);
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

async fn check(name: &'static str, ping: impl Future<Output = Result<(), InfraError>>) -> CheckStatus {
    match tokio::time::timeout(CHECK_TIMEOUT, ping).await {
        Ok(Ok(())) => CheckStatus::Ok,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, check = name, "readiness check failed");
            CheckStatus::Error
        }
        Err(_) => {
            tracing::warn!(check = name, "readiness check timed out");
            CheckStatus::Error
        }
    }
}
