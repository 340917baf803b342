//! # Contact Service ライブラリ
//!
//! 連絡先 API のユースケース・ハンドラ・ルーター構築を公開する。
//! 統合テストからも同じルーターを組み立てられるよう、`main.rs` から分離している。
//!
//! ## モジュール構成
//!
//! - `app_builder`: ルーター構築
//! - `auth`: セッション Cookie による認証
//! - `config`: 環境変数からの設定読み込み
//! - `error`: サービスエラーと HTTP レスポンス変換
//! - `handler`: HTTP ハンドラ
//! - `usecase`: ユースケース

pub mod app_builder;
pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
