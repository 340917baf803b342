//! 連絡先管理ユースケース

use std::sync::Arc;

use chrono::NaiveDate;
use contactbook_domain::{
    birthday::BirthdayWindow,
    clock::Clock,
    contact::{Contact, ContactId, ContactPayload},
    user::UserId,
};
use contactbook_infra::{TransactionManager, repository::ContactRepository};

use crate::error::CoreError;

const DUPLICATE_EMAIL_MESSAGE: &str = "このメールアドレスの連絡先は既に登録されています";

/// 連絡先の作成・更新の入力
///
/// 更新は全項目置き換えのため、作成と同じ形をとる。
pub struct ContactInput {
    pub firstname: String,
    pub lastname:  String,
    pub phone:     String,
    pub email:     String,
    pub birthday:  NaiveDate,
    /// 省略時は空文字
    pub notes:     Option<String>,
}

impl ContactInput {
    fn into_payload(self) -> Result<ContactPayload, CoreError> {
        Ok(ContactPayload::parse(
            self.firstname,
            self.lastname,
            self.phone,
            self.email,
            self.birthday,
            self.notes.unwrap_or_default(),
        )?)
    }
}

/// 連絡先管理ユースケース
///
/// すべての操作は認証済みユーザーの `UserId` をとり、そのユーザーの連絡先だけを扱う。
pub struct ContactUseCaseImpl {
    contact_repository:  Arc<dyn ContactRepository>,
    transaction_manager: Arc<dyn TransactionManager>,
    clock:               Arc<dyn Clock>,
}

impl ContactUseCaseImpl {
    pub fn new(
        contact_repository: Arc<dyn ContactRepository>,
        transaction_manager: Arc<dyn TransactionManager>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            contact_repository,
            transaction_manager,
            clock,
        }
    }

    /// 連絡先一覧を取得する
    pub async fn list_contacts(&self, user_id: &UserId) -> Result<Vec<Contact>, CoreError> {
        Ok(self.contact_repository.find_all(user_id).await?)
    }

    /// 連絡先を 1 件取得する
    pub async fn get_contact(&self, user_id: &UserId, id: ContactId) -> Result<Contact, CoreError> {
        self.contact_repository
            .find_by_id(user_id, id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// 姓で検索する（大文字小文字を無視した完全一致）
    ///
    /// 保存される姓は前後の空白を除いた値のため、検索語も同様に除く。
    pub async fn search_by_lastname(
        &self,
        user_id: &UserId,
        lastname: &str,
    ) -> Result<Vec<Contact>, CoreError> {
        Ok(self
            .contact_repository
            .find_by_lastname(user_id, lastname.trim())
            .await?)
    }

    /// 名で検索する（大文字小文字を無視した完全一致）
    pub async fn search_by_firstname(
        &self,
        user_id: &UserId,
        firstname: &str,
    ) -> Result<Vec<Contact>, CoreError> {
        Ok(self
            .contact_repository
            .find_by_firstname(user_id, firstname.trim())
            .await?)
    }

    /// 今日から 7 日後までに誕生日を迎える連絡先を取得する
    pub async fn upcoming_birthdays(&self, user_id: &UserId) -> Result<Vec<Contact>, CoreError> {
        let window = BirthdayWindow::starting(self.clock.today());
        Ok(self
            .contact_repository
            .find_by_birthday_window(user_id, &window)
            .await?)
    }

    /// 連絡先を作成する
    ///
    /// 1. 入力値バリデーション
    /// 2. 同一ユーザー内のメールアドレス重複確認
    /// 3. トランザクション内で挿入・コミット
    pub async fn create_contact(
        &self,
        user_id: &UserId,
        input: ContactInput,
    ) -> Result<Contact, CoreError> {
        let payload = input.into_payload()?;

        if self
            .contact_repository
            .find_by_email(user_id, payload.email.as_str())
            .await?
            .is_some()
        {
            return Err(CoreError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string()));
        }

        let now = self.clock.now();
        let mut tx = self.transaction_manager.begin().await?;
        let contact = self
            .contact_repository
            .insert(&mut tx, user_id, &payload, now)
            .await?;
        tx.commit().await?;

        tracing::info!(contact_id = %contact.id(), "連絡先を作成しました");
        Ok(contact)
    }

    /// 連絡先を全項目置き換えで更新する
    ///
    /// メールアドレスの重複確認は作成時のみ。更新では同じユーザーの別の連絡先と
    /// 同じメールアドレスにしてもよい。
    pub async fn update_contact(
        &self,
        user_id: &UserId,
        id: ContactId,
        input: ContactInput,
    ) -> Result<Contact, CoreError> {
        let payload = input.into_payload()?;

        let now = self.clock.now();
        let mut tx = self.transaction_manager.begin().await?;
        let contact = self
            .contact_repository
            .update(&mut tx, user_id, id, &payload, now)
            .await?
            .ok_or_else(|| not_found(id))?;
        tx.commit().await?;

        Ok(contact)
    }

    /// 連絡先を削除する
    pub async fn delete_contact(&self, user_id: &UserId, id: ContactId) -> Result<(), CoreError> {
        let mut tx = self.transaction_manager.begin().await?;
        self.contact_repository
            .delete(&mut tx, user_id, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        tx.commit().await?;

        tracing::info!(contact_id = %id, "連絡先を削除しました");
        Ok(())
    }
}

fn not_found(id: ContactId) -> CoreError {
    CoreError::NotFound(format!("連絡先が見つかりません: {id}"))
}
