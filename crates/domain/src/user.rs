//! # ユーザー
//!
//! 連絡先を所有するユーザーの識別子。
//! ユーザー自体のライフサイクル（登録・ログイン）は外部の認証サービスが管理し、
//! このサービスはセッションから解決された [`UserId`] だけを扱う。

define_uuid_id! {
    /// ユーザー ID（一意識別子）
    ///
    /// UUID v7 を使用し、生成順にソート可能。
    pub struct UserId;
}
