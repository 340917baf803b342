//! # ContactRepository
//!
//! 連絡先の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **所有者条件は SQL 側**: `WHERE ... AND user_id = $n` で他ユーザーの行を一切読まない
//! - **書き込みは 1 文**: 更新・削除は `... WHERE id AND user_id RETURNING` で
//!   存在確認と書き込みを同時に行う
//! - **大文字小文字を無視した完全一致**: 姓・名・メールアドレスの検索は
//!   `lower(col) = lower($n)`。LIKE/ILIKE を使わないため `%` や `_` も文字どおりに比較される

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use contactbook_domain::{
    birthday::BirthdayWindow,
    contact::{Contact, ContactId, ContactPayload},
    user::UserId,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{db::TxContext, error::InfraError};

/// 連絡先リポジトリトレイト
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// ユーザーの全連絡先を取得する
    async fn find_all(&self, user_id: &UserId) -> Result<Vec<Contact>, InfraError>;

    /// ID で連絡先を検索する（他ユーザーの連絡先は `None`）
    async fn find_by_id(
        &self,
        user_id: &UserId,
        id: ContactId,
    ) -> Result<Option<Contact>, InfraError>;

    /// メールアドレスで連絡先を検索する（大文字小文字を無視した完全一致）
    ///
    /// 更新で重複が生じうるため、複数ある場合は ID の最も小さいものを返す。
    async fn find_by_email(
        &self,
        user_id: &UserId,
        email: &str,
    ) -> Result<Option<Contact>, InfraError>;

    /// 名で連絡先を検索する（大文字小文字を無視した完全一致）
    async fn find_by_firstname(
        &self,
        user_id: &UserId,
        firstname: &str,
    ) -> Result<Vec<Contact>, InfraError>;

    /// 姓で連絡先を検索する（大文字小文字を無視した完全一致）
    async fn find_by_lastname(
        &self,
        user_id: &UserId,
        lastname: &str,
    ) -> Result<Vec<Contact>, InfraError>;

    /// 誕生日（月日）がウィンドウ内にある連絡先を取得する
    async fn find_by_birthday_window(
        &self,
        user_id: &UserId,
        window: &BirthdayWindow,
    ) -> Result<Vec<Contact>, InfraError>;

    /// 連絡先を挿入し、採番された ID を含む連絡先を返す
    async fn insert(
        &self,
        tx: &mut TxContext,
        user_id: &UserId,
        payload: &ContactPayload,
        now: DateTime<Utc>,
    ) -> Result<Contact, InfraError>;

    /// 連絡先の全フィールドを上書きする
    ///
    /// 対象が存在しない（または他ユーザーの）場合は `None`。
    async fn update(
        &self,
        tx: &mut TxContext,
        user_id: &UserId,
        id: ContactId,
        payload: &ContactPayload,
        now: DateTime<Utc>,
    ) -> Result<Option<Contact>, InfraError>;

    /// 連絡先を削除し、削除した連絡先を返す
    ///
    /// 対象が存在しない（または他ユーザーの）場合は `None`。
    async fn delete(
        &self,
        tx: &mut TxContext,
        user_id: &UserId,
        id: ContactId,
    ) -> Result<Option<Contact>, InfraError>;
}

/// `contacts` テーブルの行
#[derive(Debug, sqlx::FromRow)]
struct ContactRow {
    id:         i64,
    user_id:    Uuid,
    firstname:  String,
    lastname:   String,
    email:      String,
    phone:      String,
    birthday:   NaiveDate,
    notes:      String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ContactRow> for Contact {
    type Error = InfraError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        // DB の CHECK 制約と列長によりドメイン検証は通る前提だが、
        // 手作業で投入された行に備えて Unexpected として扱う
        let id = ContactId::new(row.id).map_err(|e| InfraError::unexpected(e.to_string()))?;
        let payload = ContactPayload::parse(
            row.firstname,
            row.lastname,
            row.phone,
            row.email,
            row.birthday,
            row.notes,
        )
        .map_err(|e| InfraError::unexpected(format!("contacts.id={}: {e}", row.id)))?;

        Ok(Contact::from_db(
            id,
            UserId::from_uuid(row.user_id),
            payload,
            row.created_at,
            row.updated_at,
        ))
    }
}

fn into_contacts(rows: Vec<ContactRow>) -> Result<Vec<Contact>, InfraError> {
    rows.into_iter().map(Contact::try_from).collect()
}

/// PostgreSQL 実装の ContactRepository
#[derive(Debug, Clone)]
pub struct PostgresContactRepository {
    pool: PgPool,
}

impl PostgresContactRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PostgresContactRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
    async fn find_all(&self, user_id: &UserId) -> Result<Vec<Contact>, InfraError> {
        let rows = sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT id, user_id, firstname, lastname, email, phone, birthday, notes,
                   created_at, updated_at
            FROM contacts
            WHERE user_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        into_contacts(rows)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%user_id, %id))]
    async fn find_by_id(
        &self,
        user_id: &UserId,
        id: ContactId,
    ) -> Result<Option<Contact>, InfraError> {
        let row = sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT id, user_id, firstname, lastname, email, phone, birthday, notes,
                   created_at, updated_at
            FROM contacts
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.as_i64())
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Contact::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
    async fn find_by_email(
        &self,
        user_id: &UserId,
        email: &str,
    ) -> Result<Option<Contact>, InfraError> {
        let row = sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT id, user_id, firstname, lastname, email, phone, birthday, notes,
                   created_at, updated_at
            FROM contacts
            WHERE user_id = $1 AND lower(email) = lower($2)
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Contact::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
    async fn find_by_firstname(
        &self,
        user_id: &UserId,
        firstname: &str,
    ) -> Result<Vec<Contact>, InfraError> {
        let rows = sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT id, user_id, firstname, lastname, email, phone, birthday, notes,
                   created_at, updated_at
            FROM contacts
            WHERE user_id = $1 AND lower(firstname) = lower($2)
            ORDER BY id ASC
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(firstname)
        .fetch_all(&self.pool)
        .await?;

        into_contacts(rows)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
    async fn find_by_lastname(
        &self,
        user_id: &UserId,
        lastname: &str,
    ) -> Result<Vec<Contact>, InfraError> {
        let rows = sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT id, user_id, firstname, lastname, email, phone, birthday, notes,
                   created_at, updated_at
            FROM contacts
            WHERE user_id = $1 AND lower(lastname) = lower($2)
            ORDER BY id ASC
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(lastname)
        .fetch_all(&self.pool)
        .await?;

        into_contacts(rows)
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(%user_id, start = %window.start(), end = %window.end())
    )]
    async fn find_by_birthday_window(
        &self,
        user_id: &UserId,
        window: &BirthdayWindow,
    ) -> Result<Vec<Contact>, InfraError> {
        // 月日キー（month * 100 + day）で比較する。
        // 年末をまたぐ場合（$4 = true）は start 以上 OR end 以下。
        let rows = sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT id, user_id, firstname, lastname, email, phone, birthday, notes,
                   created_at, updated_at
            FROM (
                SELECT *,
                       (EXTRACT(MONTH FROM birthday) * 100 + EXTRACT(DAY FROM birthday))::int
                           AS birthday_key
                FROM contacts
                WHERE user_id = $1
            ) AS owned
            WHERE CASE
                WHEN $4 THEN birthday_key >= $2 OR birthday_key <= $3
                ELSE birthday_key BETWEEN $2 AND $3
            END
            ORDER BY id ASC
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(window.start_key())
        .bind(window.end_key())
        .bind(window.wraps_year())
        .fetch_all(&self.pool)
        .await?;

        into_contacts(rows)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
    async fn insert(
        &self,
        tx: &mut TxContext,
        user_id: &UserId,
        payload: &ContactPayload,
        now: DateTime<Utc>,
    ) -> Result<Contact, InfraError> {
        let row = sqlx::query_as::<_, ContactRow>(
            r#"
            INSERT INTO contacts
                (user_id, firstname, lastname, email, phone, birthday, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id, user_id, firstname, lastname, email, phone, birthday, notes,
                      created_at, updated_at
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(payload.firstname.as_str())
        .bind(payload.lastname.as_str())
        .bind(payload.email.as_str())
        .bind(payload.phone.as_str())
        .bind(payload.birthday)
        .bind(payload.notes.as_str())
        .bind(now)
        .fetch_one(tx.conn()?)
        .await?;

        Contact::try_from(row)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%user_id, %id))]
    async fn update(
        &self,
        tx: &mut TxContext,
        user_id: &UserId,
        id: ContactId,
        payload: &ContactPayload,
        now: DateTime<Utc>,
    ) -> Result<Option<Contact>, InfraError> {
        let row = sqlx::query_as::<_, ContactRow>(
            r#"
            UPDATE contacts
            SET firstname = $3,
                lastname = $4,
                email = $5,
                phone = $6,
                birthday = $7,
                notes = $8,
                updated_at = $9
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, firstname, lastname, email, phone, birthday, notes,
                      created_at, updated_at
            "#,
        )
        .bind(id.as_i64())
        .bind(user_id.as_uuid())
        .bind(payload.firstname.as_str())
        .bind(payload.lastname.as_str())
        .bind(payload.email.as_str())
        .bind(payload.phone.as_str())
        .bind(payload.birthday)
        .bind(payload.notes.as_str())
        .bind(now)
        .fetch_optional(tx.conn()?)
        .await?;

        row.map(Contact::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%user_id, %id))]
    async fn delete(
        &self,
        tx: &mut TxContext,
        user_id: &UserId,
        id: ContactId,
    ) -> Result<Option<Contact>, InfraError> {
        let row = sqlx::query_as::<_, ContactRow>(
            r#"
            DELETE FROM contacts
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, firstname, lastname, email, phone, birthday, notes,
                      created_at, updated_at
            "#,
        )
        .bind(id.as_i64())
        .bind(user_id.as_uuid())
        .fetch_optional(tx.conn()?)
        .await?;

        row.map(Contact::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresContactRepository>();
        assert_send_sync::<Box<dyn ContactRepository>>();
    }

    #[test]
    fn test_不正な行はunexpectedエラーに変換される() {
        let row = ContactRow {
            id:         1,
            user_id:    Uuid::now_v7(),
            firstname:  "   ".to_string(),
            lastname:   "Smith".to_string(),
            email:      "john@example.com".to_string(),
            phone:      "090".to_string(),
            birthday:   NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            notes:      String::new(),
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            updated_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };

        let result = Contact::try_from(row);

        assert!(matches!(
            result.map_err(|e| e.to_string()),
            Err(msg) if msg.contains("contacts.id=1")
        ));
    }
}
