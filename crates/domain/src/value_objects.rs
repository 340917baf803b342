//! # 値オブジェクト
//!
//! 連絡先の各フィールドを表す値オブジェクト。生成時に検証を行い、
//! 不正な値がユースケース層やリポジトリに届かないようにする。
//!
//! | 型 | ラップ対象 | 用途 |
//! |---|-----------|------|
//! | [`FirstName`] | `String` | 名（1〜50 文字） |
//! | [`LastName`] | `String` | 姓（1〜50 文字） |
//! | [`Email`] | `String` | メールアドレス |
//! | [`Phone`] | `String` | 電話番号 |
//! | [`Notes`] | `String` | 自由記述メモ（空を許容） |

use serde::{Deserialize, Serialize};

use crate::DomainError;

define_validated_string! {
    /// 名
    pub struct FirstName {
        label: "名",
        max_length: 50,
    }
}

define_validated_string! {
    /// 姓
    pub struct LastName {
        label: "姓",
        max_length: 50,
    }
}

/// メールアドレス（値オブジェクト）
///
/// 比較はリポジトリ側で大文字小文字を無視して行うため、
/// ここでは入力の表記をそのまま保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// メールアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - `local@domain` の形式
    /// - 最大 255 文字
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスは必須です".to_string(),
            ));
        }

        let Some((local, domain)) = value.split_once('@') else {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        };

        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        }

        if value.len() > 255 {
            return Err(DomainError::Validation(
                "メールアドレスは255文字以内である必要があります".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// 大文字小文字を無視して一致するか
    pub fn matches_ignore_case(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.to_lowercase()
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 電話番号（値オブジェクト）
///
/// 国際表記（`+81 90-1234-5678`）や括弧付き表記を許容するため、
/// 数字・空白・`+ - ( ) .` のみを受け付け、数字を 1 文字以上含むことを要求する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone(String);

impl Phone {
    const MAX_LENGTH: usize = 30;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::Validation("電話番号は必須です".to_string()));
        }

        if value.chars().count() > Self::MAX_LENGTH {
            return Err(DomainError::Validation(format!(
                "電話番号は {} 文字以内である必要があります",
                Self::MAX_LENGTH
            )));
        }

        let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.');
        if !value.chars().all(allowed) || !value.chars().any(|c| c.is_ascii_digit()) {
            return Err(DomainError::Validation(
                "電話番号の形式が不正です".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 自由記述メモ（値オブジェクト）
///
/// 空文字列を許容する。内容を保持するため trim しない。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notes(String);

impl Notes {
    const MAX_LENGTH: usize = 1000;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.chars().count() > Self::MAX_LENGTH {
            return Err(DomainError::Validation(format!(
                "メモは {} 文字以内である必要があります",
                Self::MAX_LENGTH
            )));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
