//! # Contact Service 設定
//!
//! 環境変数から Contact Service サーバーの設定を読み込む。

use std::env;

use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("{0} が設定されていません（.env を確認してください）")]
    Missing(&'static str),

    /// 値の形式が不正
    #[error("{name} の値が不正です: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Contact Service サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactServiceConfig {
    /// バインドアドレス
    pub host:           String,
    /// ポート番号
    pub port:           u16,
    /// データベース接続 URL
    pub database_url:   String,
    /// Redis 接続 URL（セッション参照用）
    pub redis_url:      String,
    /// 起動時にマイグレーションを適用するか
    pub run_migrations: bool,
}

impl ContactServiceConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// テストではプロセス環境変数を書き換えずに済むよう、HashMap 等を渡す。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

        let port_raw = required("CONTACT_PORT")?;
        let port = port_raw.parse().map_err(|_| ConfigError::Invalid {
            name:  "CONTACT_PORT",
            value: port_raw.clone(),
        })?;

        let run_migrations = match lookup("RUN_MIGRATIONS") {
            None => true,
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid {
                name:  "RUN_MIGRATIONS",
                value: raw,
            })?,
        };

        Ok(Self {
            host: lookup("CONTACT_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            run_migrations,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("CONTACT_PORT", "3000"),
        ("DATABASE_URL", "postgres://localhost/contactbook"),
        ("REDIS_URL", "redis://localhost:6379"),
    ];

    #[test]
    fn test_必須項目のみでデフォルト値が補われる() {
        let config = ContactServiceConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();

        assert_eq!(
            config,
            ContactServiceConfig {
                host:           "0.0.0.0".to_string(),
                port:           3000,
                database_url:   "postgres://localhost/contactbook".to_string(),
                redis_url:      "redis://localhost:6379".to_string(),
                run_migrations: true,
            }
        );
    }

    #[rstest]
    #[case("CONTACT_PORT")]
    #[case("DATABASE_URL")]
    #[case("REDIS_URL")]
    fn test_必須項目が欠けるとmissingエラー(#[case] missing: &'static str) {
        let pairs: Vec<(&str, &str)> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != missing)
            .collect();

        let result = ContactServiceConfig::from_lookup(lookup_from(&pairs));

        assert_eq!(result, Err(ConfigError::Missing(missing)));
    }

    #[test]
    fn test_ポートが数値でないとinvalidエラー() {
        let mut pairs = REQUIRED.to_vec();
        pairs[0] = ("CONTACT_PORT", "http");

        let result = ContactServiceConfig::from_lookup(lookup_from(&pairs));

        assert_eq!(
            result,
            Err(ConfigError::Invalid {
                name:  "CONTACT_PORT",
                value: "http".to_string(),
            })
        );
    }

    #[rstest]
    #[case("false", false)]
    #[case("0", false)]
    #[case("TRUE", true)]
    #[case("yes", true)]
    fn test_run_migrationsの真偽値を解釈する(#[case] raw: &str, #[case] expected: bool) {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("RUN_MIGRATIONS", raw));

        let config = ContactServiceConfig::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.run_migrations, expected);
    }

    #[test]
    fn test_run_migrationsが不正値ならinvalidエラー() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("RUN_MIGRATIONS", "maybe"));

        let result = ContactServiceConfig::from_lookup(lookup_from(&pairs));

        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                name: "RUN_MIGRATIONS",
                ..
            })
        ));
    }
}
