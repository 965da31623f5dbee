//! 設定の型定義とバリデーション

use std::collections::HashMap;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::locale::Locale;

/// 設定項目 1 つ分のバリデーションエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// フィールドの JSON パス（例: "fallbacks.defaults[0]"）
    pub field_path: String,
    /// エラーメッセージ
    pub message: String,
}

impl ValidationError {
    /// 新しい `ValidationError` を作成
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// 設定の読み込み・検証で発生するエラー
#[derive(Error, Debug)]
pub enum ConfigError {
    /// バリデーションエラー（すべての項目分）
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    /// 設定ファイルの読み込みエラー
    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// 設定ファイルのパースエラー
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// バリデーションエラーを番号付きの行に整形する
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// オーバーレイの設定（`.locale-overlay.json`）
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlaySettings {
    /// デフォルトロケール。このロケールの値はエンティティ自身のカラムに置かれることがある
    pub default_locale: Locale,

    /// フォールバックの設定
    pub fallbacks: FallbackSettings,
}

/// フォールバックの設定
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FallbackSettings {
    /// false の場合、すべてのロケールは自身のみに解決される
    pub enabled: bool,

    /// 最後に試すロケール
    ///
    /// - `None`: デフォルトロケール（デフォルト）
    /// - `Some([])`: 末尾の候補なし
    pub defaults: Option<Vec<Locale>>,

    /// ロケールごとの追加候補。ロケール自身とその親の後に試す
    pub map: HashMap<Locale, Vec<Locale>>,

    /// `de-AT` のとき `de` も試す
    pub use_parent_locales: bool,

    /// 空白の文字列や空のコンテナも値なしとして扱う
    pub for_empty_translations: bool,
}

impl Default for FallbackSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            defaults: None,
            map: HashMap::new(),
            use_parent_locales: true,
            for_empty_translations: false,
        }
    }
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self { default_locale: Locale::new("en"), fallbacks: FallbackSettings::default() }
    }
}

impl OverlaySettings {
    /// 明示候補と親ロケールの後に試すロケール
    #[must_use]
    pub fn fallback_defaults(&self) -> Vec<Locale> {
        self.fallbacks.defaults.clone().unwrap_or_else(|| vec![self.default_locale.clone()])
    }

    /// 設定を検証する
    ///
    /// # Errors
    /// - デフォルトロケールが空
    /// - フォールバック候補のロケールが空
    /// - ロケールが自身にフォールバックしている
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.default_locale.is_empty() {
            errors.push(ValidationError::new(
                "defaultLocale",
                "The default locale cannot be empty. Example: \"en\"",
            ));
        }

        if let Some(defaults) = &self.fallbacks.defaults {
            for (index, locale) in defaults.iter().enumerate() {
                if locale.is_empty() {
                    errors.push(ValidationError::new(
                        format!("fallbacks.defaults[{index}]"),
                        "Locale codes cannot be empty",
                    ));
                }
            }
        }

        let mut keys: Vec<&Locale> = self.fallbacks.map.keys().collect();
        keys.sort();
        for key in keys {
            if key.is_empty() {
                errors.push(ValidationError::new(
                    "fallbacks.map",
                    "Locale codes cannot be empty. Please remove the empty key",
                ));
                continue;
            }
            let Some(candidates) = self.fallbacks.map.get(key) else {
                continue;
            };
            for (index, candidate) in candidates.iter().enumerate() {
                if candidate.is_empty() {
                    errors.push(ValidationError::new(
                        format!("fallbacks.map.{key}[{index}]"),
                        "Locale codes cannot be empty",
                    ));
                } else if candidate == key {
                    errors.push(ValidationError::new(
                        format!("fallbacks.map.{key}[{index}]"),
                        format!("'{key}' cannot fall back to itself"),
                    ));
                }
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
