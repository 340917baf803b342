//! # Contactbook インフラ層
//!
//! 外部システム（PostgreSQL, Redis）との接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プール、マイグレーション、トランザクション
//! - **データアクセス**: 所有者スコープ付きの連絡先リポジトリ
//! - **セッション参照**: 認証サービスが発行したセッションの読み取り（Redis）
//!
//! ## 依存関係
//!
//! ```text
//! contact-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL 接続管理と [`TxContext`](db::TxContext)
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ実装
//! - [`session`] - セッション参照

pub mod db;
pub mod error;
pub mod repository;
pub mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use db::{PgTransactionManager, TransactionManager, TxContext};
pub use error::{InfraError, InfraErrorKind};
pub use session::{RedisSessionManager, SessionData, SessionManager};
