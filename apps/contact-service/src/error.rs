//! # Contact Service エラー定義
//!
//! Contact Service 固有のエラーと、HTTP レスポンスへの変換を定義する。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contactbook_domain::DomainError;
use contactbook_infra::InfraError;
use contactbook_shared::ErrorResponse;
use thiserror::Error;

/// Contact Service で発生するエラー
#[derive(Debug, Error)]
pub enum CoreError {
    /// リソースが見つからない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 不正なリクエスト
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// 未認証（セッションなし・期限切れ）
    #[error("認証が必要です: {0}")]
    Unauthorized(String),

    /// 競合（メールアドレス重複）
    #[error("競合が発生しました: {0}")]
    Conflict(String),

    /// データベースエラー
    #[error("データベースエラー: {0}")]
    Database(#[from] InfraError),

    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => CoreError::BadRequest(msg),
            e @ DomainError::NotFound { .. } => CoreError::NotFound(e.to_string()),
            DomainError::Conflict(msg) => CoreError::Conflict(msg),
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let body = match &self {
            CoreError::NotFound(msg) => ErrorResponse::not_found(msg.clone()),
            CoreError::BadRequest(msg) => ErrorResponse::bad_request(msg.clone()),
            CoreError::Unauthorized(msg) => ErrorResponse::unauthorized(msg.clone()),
            CoreError::Conflict(msg) => ErrorResponse::conflict(msg.clone()),
            CoreError::Database(e) => {
                tracing::error!(
                    error.category = "infrastructure",
                    error.kind = "database",
                    span_trace = %e.span_trace(),
                    "データベースエラー: {}",
                    e
                );
                ErrorResponse::internal_error()
            }
            CoreError::Internal(msg) => {
                tracing::error!(error.category = "internal", "内部エラー: {}", msg);
                ErrorResponse::internal_error()
            }
        };

        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}
