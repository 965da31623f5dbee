//! 属性の読み書き 1 回分のオプション

use crate::locale::Locale;

/// 1 回の読み書きの振り分け方
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessOptions {
    /// アクセスするロケール。`None` なら現在のロケール
    pub locale: Option<Locale>,
    /// false なら読み込みはエンティティ自身のストレージへ直接行く
    pub translated: bool,
}

impl Default for AccessOptions {
    fn default() -> Self {
        Self { locale: None, translated: true }
    }
}

impl AccessOptions {
    /// `locale` での翻訳アクセス
    #[must_use]
    pub fn in_locale(locale: impl Into<Locale>) -> Self {
        Self { locale: Some(locale.into()), ..Self::default() }
    }

    /// オーバーレイを通さず、エンティティ自身のストレージへアクセス
    #[must_use]
    pub const fn untranslated() -> Self {
        Self { locale: None, translated: false }
    }
}

/// 旧形式の呼び出し: オプションの代わりにロケールを直接渡す
///
/// 互換性のため受け付け、警告を出して `{ locale }` に正規化する。
impl From<Locale> for AccessOptions {
    fn from(locale: Locale) -> Self {
        tracing::warn!(
            "[DEPRECATION] passing a locale ('{locale}') as options is deprecated. \
             Please use AccessOptions::in_locale(\"{locale}\") instead."
        );
        Self { locale: Some(locale), ..Self::default() }
    }
}
