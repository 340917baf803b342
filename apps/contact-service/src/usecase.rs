//! # ユースケース層
//!
//! リポジトリを組み合わせて業務操作を実行する。
//! 不在（`None`）やメール重複を [`CoreError`](crate::error::CoreError) に変換するのはこの層の責務。

pub mod contact;

pub use contact::{ContactInput, ContactUseCaseImpl};
