//! # API レスポンスエンベロープ
//!
//! 公開 API の統一レスポンス形式 `{ "data": T }` を提供する。

use serde::{Deserialize, Serialize};

/// 公開 API の統一レスポンス型
///
/// 連絡先 API のすべての成功レスポンス（204 を除く）は `{ "data": T }` 形式で返す。
///
/// ## 使用例
///
/// ```
/// use contactbook_shared::ApiResponse;
///
/// let response = ApiResponse::new(vec!["Alice", "Bob"]);
/// assert_eq!(response.data.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// 新しい `ApiResponse` を作成する
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
