//! # Contact Service サーバー
//!
//! 認証済みユーザーごとの連絡先（アドレス帳）を管理する API サーバー。
//!
//! ## 役割
//!
//! - **連絡先 CRUD**: 作成・取得・全項目更新・削除
//! - **検索**: 姓・名の完全一致（大文字小文字を無視）、7 日以内の誕生日
//! - **認証**: 外部の認証サービスが発行した `session_id` Cookie を Redis で検証
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `CONTACT_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `CONTACT_PORT` | **Yes** | ポート番号 |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `REDIS_URL` | **Yes** | Redis 接続 URL（セッション参照） |
//! | `RUN_MIGRATIONS` | No | 起動時にマイグレーションを適用するか（デフォルト: `true`） |
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログフィルタ（デフォルト: `info,contactbook=debug,tower_http=debug`） |
//!
//! ## 起動方法
//!
//! ```bash
//! CONTACT_PORT=3000 DATABASE_URL=postgres://... REDIS_URL=redis://... \
//!     cargo run -p contactbook-contact-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use contactbook_contact_service::{
    app_builder::build_router,
    config::ContactServiceConfig,
    handler::{ContactState, ReadinessState},
    usecase::ContactUseCaseImpl,
};
use contactbook_domain::clock::SystemClock;
use contactbook_infra::{
    PgTransactionManager,
    RedisSessionManager,
    SessionManager,
    db,
    repository::PostgresContactRepository,
};
use contactbook_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// Contact Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    init_tracing(TracingConfig::from_env("contact-service"));

    let config = ContactServiceConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Contact Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    let pool = db::create_pool(&config.database_url)
        .await
        .context("データベース接続に失敗しました")?;
    tracing::info!("データベースに接続しました");

    if config.run_migrations {
        db::run_migrations(&pool)
            .await
            .context("マイグレーションの適用に失敗しました")?;
        tracing::info!("マイグレーションを適用しました");
    }

    let session_manager: Arc<dyn SessionManager> = Arc::new(
        RedisSessionManager::new(&config.redis_url)
            .await
            .context("Redis 接続に失敗しました")?,
    );
    tracing::info!("Redis に接続しました");

    let usecase = ContactUseCaseImpl::new(
        Arc::new(PostgresContactRepository::new(pool.clone())),
        Arc::new(PgTransactionManager::new(pool.clone())),
        Arc::new(SystemClock),
    );
    let contact_state = Arc::new(ContactState {
        usecase,
        session_manager: session_manager.clone(),
    });
    let readiness_state = Arc::new(ReadinessState {
        pool,
        session_manager,
    });

    let app = build_router(contact_state, readiness_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("バインドアドレスが不正です")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Contact Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
