//! # Contactbook ドメイン層
//!
//! 連絡先管理のドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! contact-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、Redis）に一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`birthday`] - 誕生日ウィンドウ（年を無視した月日の範囲判定）
//! - [`clock`] - 時刻プロバイダ
//! - [`contact`] - 連絡先エンティティと入力ペイロード
//! - [`error`] - ドメインエラー
//! - [`user`] - 所有ユーザーの識別子
//! - [`value_objects`] - バリデーション付き値オブジェクト
//!
//! ## 使用例
//!
//! ```rust
//! use chrono::NaiveDate;
//! use contactbook_domain::birthday::BirthdayWindow;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 12, 29).unwrap();
//! let window = BirthdayWindow::starting(today);
//!
//! // 年末をまたいでも翌年 1 月 2 日の誕生日は対象に含まれる
//! assert!(window.contains(NaiveDate::from_ymd_opt(1990, 1, 2).unwrap()));
//! ```

#[macro_use]
mod macros;

pub mod birthday;
pub mod clock;
pub mod contact;
pub mod error;
pub mod user;
pub mod value_objects;

pub use error::DomainError;
