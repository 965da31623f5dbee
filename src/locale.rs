//! ロケール識別子と「現在のロケール」コンテキスト

use std::fmt;
use std::sync::{
    Mutex,
    PoisonError,
};

use serde::{
    Deserialize,
    Serialize,
};

/// `en` や `de-AT` のような言語・地域の識別子
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// 新しい `Locale` を作成
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// ロケールコードを文字列として取得
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 空白のみ、または空のロケールコードかどうか
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// 末尾のサブタグを順に落とした親ロケール（詳細な順）
    ///
    /// `zh-Hant-TW` → `zh-Hant` → `zh`
    ///
    /// # Returns
    /// 親ロケールのリスト。自身は含まない
    #[must_use]
    pub fn parents(&self) -> Vec<Self> {
        let mut parents = Vec::new();
        let mut code = self.0.as_str();
        while let Some((head, _)) = code.rsplit_once('-') {
            if head.is_empty() {
                break;
            }
            parents.push(Self::new(head));
            code = head;
        }
        parents
    }

    /// 自身に続けて [`parents`](Self::parents) を並べたリスト
    #[must_use]
    pub fn self_and_parents(&self) -> Vec<Self> {
        let mut locales = vec![self.clone()];
        locales.extend(self.parents());
        locales
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for Locale {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Locale {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Locale {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// 呼び出し側がロケールを指定しなかった場合に使うロケールの供給元
pub trait LocaleContext: Send + Sync {
    /// 現在の処理単位のロケール
    fn current_locale(&self) -> Locale;

    /// プロセス全体のデフォルトロケール
    fn default_locale(&self) -> Locale;
}

/// スコープ単位で現在のロケールを切り替えられる [`LocaleContext`]
///
/// ロケールが設定されるまでは、デフォルトロケールが現在のロケールになります。
#[derive(Debug)]
pub struct LocaleScope {
    /// デフォルトロケール
    default_locale: Locale,
    /// 明示的に設定された現在のロケール
    current: Mutex<Option<Locale>>,
}

impl LocaleScope {
    /// 新しい `LocaleScope` を作成
    #[must_use]
    pub const fn new(default_locale: Locale) -> Self {
        Self { default_locale, current: Mutex::new(None) }
    }

    /// 現在のロケールを設定する（`None` で解除）
    pub fn set_locale(&self, locale: Option<Locale>) {
        self.replace(locale);
    }

    /// `locale` を現在のロケールとして `f` を実行し、元のロケールに戻す
    ///
    /// `f` が panic した場合も元のロケールに戻ります。
    ///
    /// # Arguments
    /// * `locale` - `f` の実行中に使うロケール
    /// * `f` - 実行する処理
    ///
    /// # Returns
    /// `f` の戻り値
    pub fn with_locale<T>(&self, locale: Locale, f: impl FnOnce() -> T) -> T {
        let previous = self.replace(Some(locale));
        let _restore = RestoreLocale { scope: self, previous };
        f()
    }

    /// 現在のロケールを差し替え、以前の値を返す
    fn replace(&self, locale: Option<Locale>) -> Option<Locale> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, locale)
    }
}

impl LocaleContext for LocaleScope {
    fn current_locale(&self) -> Locale {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_else(|| self.default_locale.clone())
    }

    fn default_locale(&self) -> Locale {
        self.default_locale.clone()
    }
}

/// drop 時にスコープのロケールを元に戻すガード
struct RestoreLocale<'a> {
    /// 対象のスコープ
    scope: &'a LocaleScope,
    /// 戻すロケール
    previous: Option<Locale>,
}

impl Drop for RestoreLocale<'_> {
    fn drop(&mut self) {
        self.scope.replace(self.previous.take());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    /// parents: 末尾のサブタグから順に落とす
    #[rstest]
    #[case::language_only("en", &[])]
    #[case::region("de-AT", &["de"])]
    #[case::script_and_region("zh-Hant-TW", &["zh-Hant", "zh"])]
    #[case::leading_dash("-x", &[])]
    fn parents_drop_trailing_subtags(#[case] code: &str, #[case] expected: &[&str]) {
        let parents: Vec<String> =
            Locale::new(code).parents().iter().map(ToString::to_string).collect();

        assert_eq!(parents, expected);
    }

    /// self_and_parents: 先頭は自身
    #[rstest]
    fn self_and_parents_starts_with_self() {
        let locales = Locale::new("pt-BR").self_and_parents();

        assert_that!(locales, len(eq(2)));
        assert_that!(locales[0] == "pt-BR", eq(true));
        assert_that!(locales[1] == "pt", eq(true));
    }

    /// 未設定ならデフォルトロケールを返す
    #[googletest::test]
    fn scope_defaults_to_default_locale() {
        let scope = LocaleScope::new(Locale::new("en"));

        expect_that!(scope.current_locale() == "en", eq(true));
        expect_that!(scope.default_locale() == "en", eq(true));
    }

    /// with_locale: 実行後に元のロケールへ戻る
    #[googletest::test]
    fn with_locale_restores_previous_locale() {
        let scope = LocaleScope::new(Locale::new("en"));
        scope.set_locale(Some(Locale::new("fr")));

        let inside = scope.with_locale(Locale::new("de"), || scope.current_locale());

        expect_that!(inside == "de", eq(true));
        expect_that!(scope.current_locale() == "fr", eq(true));
    }

    /// with_locale: panic 後も元のロケールへ戻る
    #[rstest]
    fn with_locale_restores_after_panic() {
        let scope = LocaleScope::new(Locale::new("en"));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            scope.with_locale(Locale::new("ja"), || -> () { panic!("boom") });
        }));

        assert!(result.is_err());
        assert_that!(scope.current_locale() == "en", eq(true));
    }

    /// is_empty: 空白のみのコードは空扱い
    #[rstest]
    fn blank_locale_is_empty() {
        assert_that!(Locale::new("  ").is_empty(), eq(true));
        assert_that!(Locale::new("en").is_empty(), eq(false));
    }
}
