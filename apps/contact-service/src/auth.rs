//! # セッション認証
//!
//! `session_id` Cookie を Redis のセッションに解決し、認証済みユーザーを取り出す。
//!
//! - Cookie なし / セッションなし（期限切れを含む）→ 401
//! - Redis エラー → 500

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use contactbook_domain::user::UserId;
use contactbook_infra::SessionManager;

use crate::{error::CoreError, handler::ContactState};

/// セッション Cookie 名
pub const SESSION_COOKIE_NAME: &str = "session_id";

/// 認証済みユーザー
///
/// `/contacts` 配下のすべてのハンドラが引数にとる extractor。
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    user_id: UserId,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

impl FromRequestParts<Arc<ContactState>> for AuthenticatedUser {
    type Rejection = CoreError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ContactState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let user_id = authenticate(state.session_manager.as_ref(), &jar).await?;
        Ok(Self { user_id })
    }
}

/// Cookie のセッション ID からユーザーを解決する
pub async fn authenticate(
    session_manager: &dyn SessionManager,
    jar: &CookieJar,
) -> Result<UserId, CoreError> {
    let session_id = jar
        .get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(unauthorized)?;

    match session_manager.get(&session_id).await {
        Ok(Some(session)) => Ok(session.user_id().clone()),
        Ok(None) => Err(unauthorized()),
        Err(e) => {
            tracing::error!(
                error.category = "infrastructure",
                error.kind = "session",
                "セッション取得で内部エラー: {}",
                e
            );
            Err(CoreError::Internal("セッションを取得できません".to_string()))
        }
    }
}

fn unauthorized() -> CoreError {
    CoreError::Unauthorized("ログインが必要です".to_string())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum_extra::extract::cookie::Cookie;
    use contactbook_infra::{InfraError, SessionData, mock::MockSessionManager};
    use pretty_assertions::assert_eq;

    use super::*;

    /// 常に失敗するセッションマネージャ
    struct FailingSessionManager;

    #[async_trait]
    impl SessionManager for FailingSessionManager {
        async fn get(&self, _session_id: &str) -> Result<Option<SessionData>, InfraError> {
            Err(InfraError::unexpected("redis down"))
        }

        async fn ping(&self) -> Result<(), InfraError> {
            Err(InfraError::unexpected("redis down"))
        }
    }

    fn jar_with(session_id: &str) -> CookieJar {
        CookieJar::new().add(Cookie::new(SESSION_COOKIE_NAME, session_id.to_string()))
    }

    #[tokio::test]
    async fn test_有効なセッションはユーザーidに解決される() {
        let sessions = MockSessionManager::new();
        let user_id = UserId::new();
        sessions.insert("s-1", &user_id);

        let result = authenticate(&sessions, &jar_with("s-1")).await.unwrap();

        assert_eq!(result, user_id);
    }

    #[tokio::test]
    async fn test_cookieがなければunauthorized() {
        let sessions = MockSessionManager::new();

        let result = authenticate(&sessions, &CookieJar::new()).await;

        assert!(matches!(result, Err(CoreError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_未知のセッションはunauthorized() {
        let sessions = MockSessionManager::new();

        let result = authenticate(&sessions, &jar_with("expired")).await;

        assert!(matches!(result, Err(CoreError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_セッションストアの障害はinternal() {
        let result = authenticate(&FailingSessionManager, &jar_with("s-1")).await;

        assert!(matches!(result, Err(CoreError::Internal(_))));
    }
}
