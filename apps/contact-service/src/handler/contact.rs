//! # 連絡先ハンドラ
//!
//! 認証済みユーザー自身の連絡先を操作する API を提供する。
//!
//! ## エンドポイント
//!
//! - `GET /contacts` - 連絡先一覧
//! - `GET /contacts/{id}` - 連絡先取得
//! - `GET /contacts/search_by_lastname/{lastname}` - 姓で検索
//! - `GET /contacts/search_by_firstname/{firstname}` - 名で検索
//! - `GET /contacts/next_week_birthday` - 7 日以内に誕生日を迎える連絡先
//! - `POST /contacts` - 連絡先作成
//! - `PUT /contacts/{id}` - 連絡先更新（全項目置き換え）
//! - `DELETE /contacts/{id}` - 連絡先削除

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use contactbook_domain::contact::{Contact, ContactId};
use contactbook_infra::SessionManager;
use contactbook_shared::ApiResponse;
use serde::{Deserialize, Serialize};

use crate::{
    auth::AuthenticatedUser,
    error::CoreError,
    usecase::{ContactInput, ContactUseCaseImpl},
};

/// 連絡先 API の共有状態
pub struct ContactState {
    pub usecase:         ContactUseCaseImpl,
    pub session_manager: Arc<dyn SessionManager>,
}

// --- リクエスト/レスポンス型 ---

/// 連絡先作成・更新リクエスト
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub firstname: String,
    pub lastname:  String,
    pub phone:     String,
    pub email:     String,
    /// `YYYY-MM-DD`
    pub birthday:  NaiveDate,
    #[serde(default)]
    pub notes:     Option<String>,
}

impl From<ContactRequest> for ContactInput {
    fn from(req: ContactRequest) -> Self {
        Self {
            firstname: req.firstname,
            lastname:  req.lastname,
            phone:     req.phone,
            email:     req.email,
            birthday:  req.birthday,
            notes:     req.notes,
        }
    }
}

/// 連絡先 DTO
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ContactDto {
    pub id:         i64,
    pub firstname:  String,
    pub lastname:   String,
    pub email:      String,
    pub phone:      String,
    pub birthday:   NaiveDate,
    pub notes:      String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Contact> for ContactDto {
    fn from(c: &Contact) -> Self {
        Self {
            id:         c.id().as_i64(),
            firstname:  c.firstname().as_str().to_string(),
            lastname:   c.lastname().as_str().to_string(),
            email:      c.email().as_str().to_string(),
            phone:      c.phone().as_str().to_string(),
            birthday:   c.birthday(),
            notes:      c.notes().as_str().to_string(),
            created_at: c.created_at().to_rfc3339(),
            updated_at: c.updated_at().to_rfc3339(),
        }
    }
}

fn to_dtos(contacts: &[Contact]) -> Vec<ContactDto> {
    contacts.iter().map(ContactDto::from).collect()
}

// --- ハンドラ ---

/// GET /contacts
#[tracing::instrument(skip_all, fields(user_id = %auth.user_id()))]
pub async fn list_contacts(
    State(state): State<Arc<ContactState>>,
    auth: AuthenticatedUser,
) -> Result<impl IntoResponse, CoreError> {
    let contacts = state.usecase.list_contacts(auth.user_id()).await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(to_dtos(&contacts)))))
}

/// GET /contacts/{id}
///
/// ## レスポンス
///
/// - `200 OK`: 連絡先
/// - `400 Bad Request`: ID が正の整数でない
/// - `404 Not Found`: 連絡先が見つからない（他ユーザーの連絡先を含む）
#[tracing::instrument(skip_all, fields(user_id = %auth.user_id(), %id))]
pub async fn get_contact(
    State(state): State<Arc<ContactState>>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, CoreError> {
    let id = ContactId::new(id)?;

    let contact = state.usecase.get_contact(auth.user_id(), id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(ContactDto::from(&contact)))))
}

/// GET /contacts/search_by_lastname/{lastname}
///
/// 一致がなくても `200 OK` で空配列を返す。
#[tracing::instrument(skip_all, fields(user_id = %auth.user_id()))]
pub async fn search_by_lastname(
    State(state): State<Arc<ContactState>>,
    auth: AuthenticatedUser,
    Path(lastname): Path<String>,
) -> Result<impl IntoResponse, CoreError> {
    let contacts = state
        .usecase
        .search_by_lastname(auth.user_id(), &lastname)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(to_dtos(&contacts)))))
}

/// GET /contacts/search_by_firstname/{firstname}
///
/// 一致がなくても `200 OK` で空配列を返す。
#[tracing::instrument(skip_all, fields(user_id = %auth.user_id()))]
pub async fn search_by_firstname(
    State(state): State<Arc<ContactState>>,
    auth: AuthenticatedUser,
    Path(firstname): Path<String>,
) -> Result<impl IntoResponse, CoreError> {
    let contacts = state
        .usecase
        .search_by_firstname(auth.user_id(), &firstname)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(to_dtos(&contacts)))))
}

/// GET /contacts/next_week_birthday
#[tracing::instrument(skip_all, fields(user_id = %auth.user_id()))]
pub async fn next_week_birthday(
    State(state): State<Arc<ContactState>>,
    auth: AuthenticatedUser,
) -> Result<impl IntoResponse, CoreError> {
    let contacts = state.usecase.upcoming_birthdays(auth.user_id()).await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(to_dtos(&contacts)))))
}

/// POST /contacts
///
/// ## レスポンス
///
/// - `201 Created`: 作成された連絡先
/// - `400 Bad Request`: バリデーションエラー
/// - `409 Conflict`: 同じメールアドレスの連絡先が既に存在する
#[tracing::instrument(skip_all, fields(user_id = %auth.user_id()))]
pub async fn create_contact(
    State(state): State<Arc<ContactState>>,
    auth: AuthenticatedUser,
    Json(req): Json<ContactRequest>,
) -> Result<impl IntoResponse, CoreError> {
    let contact = state
        .usecase
        .create_contact(auth.user_id(), req.into())
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(ContactDto::from(&contact)))))
}

/// PUT /contacts/{id}
///
/// ## レスポンス
///
/// - `200 OK`: 更新後の連絡先
/// - `400 Bad Request`: バリデーションエラー、ID が正の整数でない
/// - `404 Not Found`: 連絡先が見つからない
#[tracing::instrument(skip_all, fields(user_id = %auth.user_id(), %id))]
pub async fn update_contact(
    State(state): State<Arc<ContactState>>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(req): Json<ContactRequest>,
) -> Result<impl IntoResponse, CoreError> {
    let id = ContactId::new(id)?;

    let contact = state
        .usecase
        .update_contact(auth.user_id(), id, req.into())
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(ContactDto::from(&contact)))))
}

/// DELETE /contacts/{id}
///
/// ## レスポンス
///
/// - `204 No Content`: 削除成功
/// - `400 Bad Request`: ID が正の整数でない
/// - `404 Not Found`: 連絡先が見つからない
#[tracing::instrument(skip_all, fields(user_id = %auth.user_id(), %id))]
pub async fn delete_contact(
    State(state): State<Arc<ContactState>>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, CoreError> {
    let id = ContactId::new(id)?;

    state.usecase.delete_contact(auth.user_id(), id).await?;

    Ok(StatusCode::NO_CONTENT)
}
