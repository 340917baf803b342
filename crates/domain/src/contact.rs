//! # 連絡先
//!
//! 連絡先エンティティと、作成・更新で共通に使う入力ペイロードを定義する。
//!
//! ## 設計方針
//!
//! - **所有者必須**: すべての連絡先はちょうど 1 人のユーザーに属する
//! - **全置換更新**: 更新は [`ContactPayload`] で全フィールドを上書きする（部分更新なし）
//! - **ID は DB 採番**: `ContactId` は BIGSERIAL で採番された 1 以上の整数
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use chrono::NaiveDate;
//! use contactbook_domain::contact::{ContactId, ContactPayload};
//!
//! let payload = ContactPayload::parse(
//!     "Taro",
//!     "Yamada",
//!     "+81 90-1234-5678",
//!     "taro@example.com",
//!     NaiveDate::from_ymd_opt(1990, 4, 1).unwrap(),
//!     "",
//! )?;
//! assert_eq!(payload.firstname.as_str(), "Taro");
//!
//! assert!(ContactId::new(0).is_err());
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    DomainError,
    user::UserId,
    value_objects::{Email, FirstName, LastName, Notes, Phone},
};

/// 連絡先 ID
///
/// # 不変条件
///
/// - 1 以上の正整数
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    derive_more::Display,
)]
#[display("{_0}")]
pub struct ContactId(i64);

impl ContactId {
    /// 指定した値から連絡先 ID を作成する
    ///
    /// 0 以下は `DomainError::Validation` を返す。
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if value <= 0 {
            return Err(DomainError::Validation(
                "連絡先 ID は 1 以上である必要があります".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// 連絡先の入力ペイロード（作成・更新共通）
///
/// 各フィールドは検証済みの値オブジェクト。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactPayload {
    pub firstname: FirstName,
    pub lastname:  LastName,
    pub phone:     Phone,
    pub email:     Email,
    pub birthday:  NaiveDate,
    pub notes:     Notes,
}

impl ContactPayload {
    /// 生の入力値を検証してペイロードを組み立てる
    ///
    /// 最初に見つかった検証エラーを返す。
    pub fn parse(
        firstname: impl Into<String>,
        lastname: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
        birthday: NaiveDate,
        notes: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            firstname: FirstName::new(firstname)?,
            lastname: LastName::new(lastname)?,
            phone: Phone::new(phone)?,
            email: Email::new(email)?,
            birthday,
            notes: Notes::new(notes)?,
        })
    }
}

/// 連絡先エンティティ
///
/// # 不変条件
///
/// - `user_id` は必須で、作成後に変わらない
/// - `updated_at >= created_at`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    id:         ContactId,
    user_id:    UserId,
    payload:    ContactPayload,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Contact {
    /// 永続化済みのデータから連絡先を復元する
    pub fn from_db(
        id: ContactId,
        user_id: UserId,
        payload: ContactPayload,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            payload,
            created_at,
            updated_at,
        }
    }

    /// 全フィールドを置き換えた新しい状態を返す
    pub fn replaced(self, payload: ContactPayload, now: DateTime<Utc>) -> Self {
        Self {
            payload,
            updated_at: now,
            ..self
        }
    }

    pub fn id(&self) -> ContactId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    pub fn payload(&self) -> &ContactPayload {
        &self.payload
    }

    pub fn firstname(&self) -> &FirstName {
        &self.payload.firstname
    }

    pub fn lastname(&self) -> &LastName {
        &self.payload.lastname
    }

    pub fn phone(&self) -> &Phone {
        &self.payload.phone
    }

    pub fn email(&self) -> &Email {
        &self.payload.email
    }

    pub fn birthday(&self) -> NaiveDate {
        self.payload.birthday
    }

    pub fn notes(&self) -> &Notes {
        &self.payload.notes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn payload(firstname: &str, notes: &str) -> ContactPayload {
        ContactPayload::parse(
            firstname,
            "Smith",
            "090-0000-0000",
            "john@example.com",
            NaiveDate::from_ymd_opt(1985, 6, 5).unwrap(),
            notes,
        )
        .unwrap()
    }

    fn created_at() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    #[case(i64::MIN)]
    fn test_contact_id_0以下は拒否される(#[case] value: i64) {
        assert!(matches!(ContactId::new(value), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_contact_id_1以上は受け付ける() {
        assert_eq!(ContactId::new(1).unwrap().as_i64(), 1);
        assert_eq!(ContactId::new(42).unwrap().to_string(), "42");
    }

    #[test]
    fn test_parse_不正なメールアドレスでバリデーションエラー() {
        let result = ContactPayload::parse(
            "John",
            "Smith",
            "090-0000-0000",
            "not-an-email",
            NaiveDate::from_ymd_opt(1985, 6, 5).unwrap(),
            "",
        );

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_replaced_は全フィールドとupdated_atを置き換える() {
        let user_id = UserId::new();
        let contact = Contact::from_db(
            ContactId::new(1).unwrap(),
            user_id.clone(),
            payload("John", "古いメモ"),
            created_at(),
            created_at(),
        );
        let later = DateTime::from_timestamp(1_700_000_600, 0).unwrap();

        let updated = contact.replaced(payload("Jane", ""), later);

        assert_eq!(updated.firstname().as_str(), "Jane");
        assert!(updated.notes().is_empty());
        assert_eq!(updated.updated_at(), later);
        assert_eq!(updated.created_at(), created_at());
        assert!(updated.is_owned_by(&user_id));
    }

    #[test]
    fn test_is_owned_by_は他ユーザーでfalse() {
        let contact = Contact::from_db(
            ContactId::new(1).unwrap(),
            UserId::new(),
            payload("John", ""),
            created_at(),
            created_at(),
        );

        assert!(!contact.is_owned_by(&UserId::new()));
    }
}
