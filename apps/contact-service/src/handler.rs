//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、業務ロジックはユースケース層に委譲

pub mod contact;
pub mod health;

pub use contact::{
    ContactDto,
    ContactRequest,
    ContactState,
    create_contact,
    delete_contact,
    get_contact,
    list_contacts,
    next_week_birthday,
    search_by_firstname,
    search_by_lastname,
    update_contact,
};
pub use health::{ReadinessState, health_check, readiness_check};
