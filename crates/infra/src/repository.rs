//! # リポジトリ実装
//!
//! 連絡先のデータアクセス層。
//!
//! ## 設計方針
//!
//! - **所有者スコープ**: すべてのメソッドが `&UserId` を必須引数に取り、
//!   SQL の WHERE 句に所有者条件を組み込む（取得後のチェックには頼らない）
//! - **不在は `Option`**: 見つからないことはエラーではなく `None` で表す
//! - **テスタビリティ**: トレイト経由でモック可能な設計

pub mod contact_repository;

pub use contact_repository::{ContactRepository, PostgresContactRepository};
