//! # PostgreSQL データベース接続管理
//!
//! 接続プールの作成、マイグレーション、リクエスト単位のトランザクションを扱う。
//!
//! ## 設計方針
//!
//! - **接続プール**: 起動時に一度だけ作成し、アプリケーション全体で共有する
//! - **書き込みはトランザクション必須**: 書き込みリポジトリメソッドは
//!   [`TxContext`] を引数に取る。`commit()` せずにドロップするとロールバックされるため、
//!   途中で `?` による早期リターンが起きても接続は必ず解放される
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use contactbook_infra::db;
//!
//! let pool = db::create_pool("postgres://localhost/contactbook").await?;
//! db::run_migrations(&pool).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, Transaction, postgres::PgPoolOptions};

use crate::error::InfraError;

/// データベースマイグレーションを実行する
///
/// `migrations/` のファイルを `sqlx::migrate!()` で埋め込み、未適用のものだけ順番に適用する。
/// sqlx が advisory lock を取るため、複数プロセスから同時に呼び出しても安全。
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// PostgreSQL 接続プールを作成する
///
/// # 設定値
///
/// - `max_connections(10)`: 最大接続数
/// - `acquire_timeout(5秒)`: 接続取得のタイムアウト
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// DB 疎通確認（readiness check 用）
#[tracing::instrument(skip_all, level = "debug")]
pub async fn ping(pool: &PgPool) -> Result<(), InfraError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

// =============================================================================
// TxContext
// =============================================================================

/// トランザクションコンテキスト
///
/// 書き込みリポジトリメソッドの必須引数。
/// トランザクションなしの書き込みはコンパイルエラーになる。
///
/// # ライフサイクル
///
/// 1. `TransactionManager::begin()` で作成
/// 2. 書き込みメソッドに `&mut TxContext` として渡す
/// 3. `commit()` でコミット、またはドロップでロールバック
pub struct TxContext(TxContextInner);

enum TxContextInner {
    Pg(Transaction<'static, Postgres>),
    #[cfg(any(test, feature = "test-utils"))]
    Mock,
}

impl TxContext {
    pub(crate) async fn begin_pg(pool: &PgPool) -> Result<Self, InfraError> {
        Ok(Self(TxContextInner::Pg(pool.begin().await?)))
    }

    /// テスト用のモック TxContext を作成する
    ///
    /// Mock リポジトリはインメモリ実装のため `conn()` を呼ばない。
    #[cfg(any(test, feature = "test-utils"))]
    pub fn mock() -> Self {
        Self(TxContextInner::Mock)
    }

    /// トランザクションをコミットする
    ///
    /// 呼ばずにドロップすると、sqlx が自動的にロールバックする。
    pub async fn commit(self) -> Result<(), InfraError> {
        match self.0 {
            TxContextInner::Pg(tx) => {
                tx.commit().await?;
                Ok(())
            }
            #[cfg(any(test, feature = "test-utils"))]
            TxContextInner::Mock => Ok(()),
        }
    }

    /// トランザクション内の DB コネクションを取得する
    pub(crate) fn conn(&mut self) -> Result<&mut PgConnection, InfraError> {
        match &mut self.0 {
            TxContextInner::Pg(tx) => Ok(&mut **tx),
            #[cfg(any(test, feature = "test-utils"))]
            TxContextInner::Mock => Err(InfraError::unexpected(
                "Mock TxContext では DB コネクションを取得できません",
            )),
        }
    }
}

// =============================================================================
// TransactionManager
// =============================================================================

/// トランザクション管理 trait
///
/// ユースケース層は PgPool に直接依存せず、この trait 経由でトランザクションを開始する。
#[async_trait]
pub trait TransactionManager: Send + Sync {
    /// トランザクションを開始し、TxContext を返す
    async fn begin(&self) -> Result<TxContext, InfraError>;
}

/// Postgres 用 TransactionManager 実装
pub struct PgTransactionManager {
    pool: PgPool,
}

impl PgTransactionManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionManager for PgTransactionManager {
    async fn begin(&self) -> Result<TxContext, InfraError> {
        TxContext::begin_pg(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_tx_contextはsendを実装している() {
        assert_send::<TxContext>();
    }

    #[test]
    fn test_transaction_manager_traitはsendとsyncを実装している() {
        assert_send_sync::<PgTransactionManager>();
        assert_send_sync::<Box<dyn TransactionManager>>();
    }

    #[tokio::test]
    async fn test_mock_tx_contextはコミットできる() {
        let tx = TxContext::mock();
        assert!(tx.commit().await.is_ok());
    }

    #[test]
    fn test_mock_tx_contextのconnはエラーを返す() {
        let mut tx = TxContext::mock();
        assert!(tx.conn().is_err());
    }
}
