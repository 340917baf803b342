//! # テスト用モック
//!
//! ユースケーステスト・ハンドラテストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! contactbook-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! 検索条件は PostgreSQL 実装と同じ意味（所有者スコープ、大文字小文字を無視した完全一致、
//! 月日キーによる誕生日ウィンドウ）で再現する。

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use contactbook_domain::{
    birthday::BirthdayWindow,
    contact::{Contact, ContactId, ContactPayload},
    user::UserId,
};

use crate::{
    db::{TransactionManager, TxContext},
    error::InfraError,
    repository::ContactRepository,
    session::{SessionData, SessionManager},
};

// ===== MockContactRepository =====

#[derive(Default)]
struct ContactStore {
    contacts: Vec<Contact>,
    last_id:  i64,
}

#[derive(Clone, Default)]
pub struct MockContactRepository {
    store: Arc<Mutex<ContactStore>>,
}

impl MockContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保持している連絡先の件数（全ユーザー合計）
    pub fn len(&self) -> usize {
        self.store.lock().unwrap().contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn filter_owned(&self, user_id: &UserId, pred: impl Fn(&Contact) -> bool) -> Vec<Contact> {
        self.store
            .lock()
            .unwrap()
            .contacts
            .iter()
            .filter(|c| c.is_owned_by(user_id) && pred(c))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ContactRepository for MockContactRepository {
    async fn find_all(&self, user_id: &UserId) -> Result<Vec<Contact>, InfraError> {
        Ok(self.filter_owned(user_id, |_| true))
    }

    async fn find_by_id(
        &self,
        user_id: &UserId,
        id: ContactId,
    ) -> Result<Option<Contact>, InfraError> {
        Ok(self.filter_owned(user_id, |c| c.id() == id).into_iter().next())
    }

    async fn find_by_email(
        &self,
        user_id: &UserId,
        email: &str,
    ) -> Result<Option<Contact>, InfraError> {
        Ok(self
            .filter_owned(user_id, |c| c.email().matches_ignore_case(email))
            .into_iter()
            .next())
    }

    async fn find_by_firstname(
        &self,
        user_id: &UserId,
        firstname: &str,
    ) -> Result<Vec<Contact>, InfraError> {
        let needle = firstname.to_lowercase();
        Ok(self.filter_owned(user_id, |c| c.firstname().as_str().to_lowercase() == needle))
    }

    async fn find_by_lastname(
        &self,
        user_id: &UserId,
        lastname: &str,
    ) -> Result<Vec<Contact>, InfraError> {
        let needle = lastname.to_lowercase();
        Ok(self.filter_owned(user_id, |c| c.lastname().as_str().to_lowercase() == needle))
    }

    async fn find_by_birthday_window(
        &self,
        user_id: &UserId,
        window: &BirthdayWindow,
    ) -> Result<Vec<Contact>, InfraError> {
        Ok(self.filter_owned(user_id, |c| window.contains(c.birthday())))
    }

    async fn insert(
        &self,
        _tx: &mut TxContext,
        user_id: &UserId,
        payload: &ContactPayload,
        now: DateTime<Utc>,
    ) -> Result<Contact, InfraError> {
        let mut store = self.store.lock().unwrap();
        store.last_id += 1;
        let id = ContactId::new(store.last_id).map_err(|e| InfraError::unexpected(e.to_string()))?;
        let contact = Contact::from_db(id, user_id.clone(), payload.clone(), now, now);
        store.contacts.push(contact.clone());
        Ok(contact)
    }

    async fn update(
        &self,
        _tx: &mut TxContext,
        user_id: &UserId,
        id: ContactId,
        payload: &ContactPayload,
        now: DateTime<Utc>,
    ) -> Result<Option<Contact>, InfraError> {
        let mut store = self.store.lock().unwrap();
        let Some(slot) = store
            .contacts
            .iter_mut()
            .find(|c| c.id() == id && c.is_owned_by(user_id))
        else {
            return Ok(None);
        };
        let updated = slot.clone().replaced(payload.clone(), now);
        *slot = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(
        &self,
        _tx: &mut TxContext,
        user_id: &UserId,
        id: ContactId,
    ) -> Result<Option<Contact>, InfraError> {
        let mut store = self.store.lock().unwrap();
        let Some(pos) = store
            .contacts
            .iter()
            .position(|c| c.id() == id && c.is_owned_by(user_id))
        else {
            return Ok(None);
        };
        Ok(Some(store.contacts.remove(pos)))
    }
}

// ===== MockTransactionManager =====

/// モック TxContext を返す TransactionManager
pub struct MockTransactionManager;

#[async_trait]
impl TransactionManager for MockTransactionManager {
    async fn begin(&self) -> Result<TxContext, InfraError> {
        Ok(TxContext::mock())
    }
}

// ===== MockSessionManager =====

/// セッション ID → セッションデータのインメモリ実装
#[derive(Clone, Default)]
pub struct MockSessionManager {
    sessions: Arc<Mutex<HashMap<String, SessionData>>>,
}

impl MockSessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定ユーザーのセッションを登録する
    pub fn insert(&self, session_id: impl Into<String>, user_id: &UserId) {
        let data = SessionData::new(user_id.clone(), "owner@example.com", Utc::now());
        self.sessions.lock().unwrap().insert(session_id.into(), data);
    }
}

#[async_trait]
impl SessionManager for MockSessionManager {
    async fn get(&self, session_id: &str) -> Result<Option<SessionData>, InfraError> {
        Ok(self.sessions.lock().unwrap().get(session_id).cloned())
    }

    async fn ping(&self) -> Result<(), InfraError> {
        Ok(())
    }
}
