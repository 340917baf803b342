//! # セッション参照
//!
//! 外部の認証サービスが Redis に書き込んだセッションを読み取り、
//! リクエストの認証ユーザーを解決する。このサービスはセッションを作成・削除しない。
//!
//! ## Redis キー設計
//!
//! | キー | 値 |
//! |-----|-----|
//! | `session:{session_id}` | [`SessionData`] (JSON) |
//!
//! TTL は書き込み側（認証サービス）が設定する。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use contactbook_domain::user::UserId;
use redis::{AsyncCommands, aio::ConnectionManager};
use serde::{Deserialize, Serialize};

use crate::InfraError;

/// セッションデータ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    user_id:    UserId,
    email:      String,
    created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(user_id: UserId, email: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            email: email.into(),
            created_at,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// セッション参照トレイト
#[async_trait]
pub trait SessionManager: Send + Sync {
    /// セッションを取得する
    ///
    /// 存在しない（期限切れを含む）場合は `None`。
    async fn get(&self, session_id: &str) -> Result<Option<SessionData>, InfraError>;

    /// 接続確認（readiness check 用）
    async fn ping(&self) -> Result<(), InfraError>;
}

/// Redis を使用したセッションマネージャ
pub struct RedisSessionManager {
    conn: ConnectionManager,
}

impl RedisSessionManager {
    /// 新しい RedisSessionManager を作成する
    ///
    /// - `redis_url`: Redis 接続 URL（例: `redis://localhost:6379`）
    pub async fn new(redis_url: &str) -> Result<Self, InfraError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }

    fn session_key(session_id: &str) -> String {
        format!("session:{session_id}")
    }
}

#[async_trait]
impl SessionManager for RedisSessionManager {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn get(&self, session_id: &str) -> Result<Option<SessionData>, InfraError> {
        let key = Self::session_key(session_id);
        let mut conn = self.conn.clone();

        let result: Option<String> = conn.get(&key).await?;

        match result {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn ping(&self) -> Result<(), InfraError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
