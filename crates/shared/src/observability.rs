//! # ログ出力の初期化
//!
//! contact-service の起動直後に一度だけ呼ばれ、tracing subscriber を組み立てる。
//!
//! ## 環境変数
//!
//! `.env` 読み込み後のプロセス環境から参照する。
//!
//! | 変数名 | 説明 |
//! |--------|------|
//! | `LOG_FORMAT` | `json` / `pretty`（大文字小文字・前後の空白は無視、デフォルト: `pretty`） |
//! | `RUST_LOG` | `EnvFilter` 形式のフィルタ（デフォルト: [`DEFAULT_FILTER`]） |
//!
//! ## 出力されるフィールド
//!
//! - 起動時のイベントに `service`（例: `contact-service`）と `log_format`
//! - ハンドラのスパンに `user_id`（認証済みユーザー）と `id`（連絡先 ID）
//! - リポジトリのスパンに `user_id`（debug レベル）
//!
//! JSON 形式では現在のスパンのフィールドがイベントに平坦化されて出力される。
//!
//! `ErrorLayer` を登録するため、`InfraError` は生成時のスパン（どのハンドラ・
//! どのリポジトリ呼び出しか）を SpanTrace として保持し、500 応答時のエラーログに含まれる。

/// `RUST_LOG` 未設定時のフィルタ
///
/// ワークスペース内のクレート（`contactbook_*`）と `TraceLayer` のリクエストログ
/// （`tower_http`）は debug、それ以外の依存クレートは info。
pub const DEFAULT_FILTER: &str = "info,contactbook=debug,tower_http=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 1 行 1 JSON（コンテナ環境でのログ収集向け）
    Json,
    /// 複数行の人間向け表示（ローカル開発向け）
    #[default]
    Pretty,
}

impl LogFormat {
    /// `LOG_FORMAT` の値を解釈する
    ///
    /// 未知の値は `Pretty` として扱い、stderr に警告を出す
    /// （subscriber 初期化前のため tracing は使えない）。
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => {
                eprintln!("WARNING: LOG_FORMAT={s:?} は不明な値のため pretty で出力します");
                Self::Pretty
            }
        }
    }

    /// 任意の参照関数から `LOG_FORMAT` を読み取る
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        lookup("LOG_FORMAT")
            .map(|val| Self::parse(&val))
            .unwrap_or_default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// 起動ログの `service` フィールドに出力する名前
    pub service_name: String,
    pub log_format:   LogFormat,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
        }
    }

    /// `LOG_FORMAT` から出力形式を決める
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::new(service_name, LogFormat::from_env())
    }
}

/// グローバル subscriber を登録する
///
/// `EnvFilter`（`RUST_LOG` または [`DEFAULT_FILTER`]）、出力形式に応じた fmt レイヤー、
/// `ErrorLayer` の順に重ねる。2 回目以降の呼び出しは panic するため `main` でのみ呼ぶ。
#[cfg(feature = "observability")]
pub fn init_tracing(config: TracingConfig) {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();

    tracing::info!(
        service = %config.service_name,
        log_format = ?config.log_format,
        "トレーシングを初期化しました"
    );
}
