//! # ルーター構築
//!
//! 連絡先 API とヘルスチェックのルートを 1 つの `Router` にまとめる。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handler::{
    ContactState,
    ReadinessState,
    create_contact,
    delete_contact,
    get_contact,
    health_check,
    list_contacts,
    next_week_birthday,
    readiness_check,
    search_by_firstname,
    search_by_lastname,
    update_contact,
};

/// アプリケーション全体のルーターを構築する
///
/// 一覧・作成・誕生日ルートは末尾スラッシュ付きでも受け付ける。
/// 静的セグメント（`next_week_birthday` 等）は `{id}` より優先してマッチする。
pub fn build_router(
    contact_state: Arc<ContactState>,
    readiness_state: Arc<ReadinessState>,
) -> Router {
    let contacts = Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route("/contacts/", get(list_contacts).post(create_contact))
        .route("/contacts/next_week_birthday", get(next_week_birthday))
        .route("/contacts/next_week_birthday/", get(next_week_birthday))
        .route(
            "/contacts/search_by_lastname/{lastname}",
            get(search_by_lastname),
        )
        .route(
            "/contacts/search_by_firstname/{firstname}",
            get(search_by_firstname),
        )
        .route(
            "/contacts/{id}",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
        .with_state(contact_state);

    let health = Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .with_state(readiness_state);

    Router::new()
        .merge(contacts)
        .merge(health)
        .layer(TraceLayer::new_for_http())
}
