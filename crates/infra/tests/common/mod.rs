//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用するユーザー作成・連絡先生成ヘルパー。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use contactbook_domain::{contact::ContactPayload, user::UserId};
use sqlx::PgPool;

/// テスト用の固定日時
pub fn test_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_767_225_600, 0).unwrap()
}

/// users テーブルにユーザーを作成する
///
/// contacts.user_id の外部キーを満たすために使う。
pub async fn insert_user(pool: &PgPool, email: &str) -> UserId {
    let user_id = UserId::new();
    sqlx::query("INSERT INTO users (id, email, created_at) VALUES ($1, $2, $3)")
        .bind(user_id.as_uuid())
        .bind(email)
        .bind(test_now())
        .execute(pool)
        .await
        .unwrap();
    user_id
}

/// 連絡先ペイロードを作成する
pub fn payload(firstname: &str, lastname: &str, email: &str, birthday: NaiveDate) -> ContactPayload {
    ContactPayload::parse(firstname, lastname, "+81 90-1234-5678", email, birthday, "").unwrap()
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
