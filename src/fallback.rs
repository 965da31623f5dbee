//! ロケールのフォールバックチェーン
//!
//! チェーンは、要求されたロケールに値がない場合に順に試すロケールのリスト。
//! 先頭は常に要求されたロケール自身。

use std::collections::{
    HashMap,
    HashSet,
};

use crate::config::OverlaySettings;
use crate::locale::Locale;

/// ロケールをフォールバック候補の順序付きリストに解決する
pub trait FallbackResolver: Send + Sync {
    /// 試す候補（先頭は `locale` 自身）
    fn resolve(&self, locale: &Locale) -> Vec<Locale>;

    /// `locale` のチェーンが自身のみかどうか
    fn is_trivial(&self, locale: &Locale) -> bool {
        matches!(self.resolve(locale).as_slice(), [only] if only == locale)
    }
}

impl<F> FallbackResolver for F
where
    F: Fn(&Locale) -> Vec<Locale> + Send + Sync,
{
    fn resolve(&self, locale: &Locale) -> Vec<Locale> {
        self(locale)
    }
}

/// フォールバック無効時のリゾルバー（常に自身のみ）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallbacks;

impl FallbackResolver for NoFallbacks {
    fn resolve(&self, locale: &Locale) -> Vec<Locale> {
        vec![locale.clone()]
    }
}

/// 設定から構築されるフォールバックチェーン
///
/// # 解決順序
/// 1. ロケール自身とその親 (`de-AT` → `de`)
/// 2. `map` に明示された候補とその親
/// 3. `defaults` とその親
///
/// 重複は最初の出現のみ残す。
#[derive(Debug, Clone, Default)]
pub struct FallbackChain {
    /// ロケールごとに明示された候補
    map: HashMap<Locale, Vec<Locale>>,
    /// すべてのチェーンの末尾に付く候補
    defaults: Vec<Locale>,
    /// 親ロケールも候補に含めるか
    use_parent_locales: bool,
}

impl FallbackChain {
    /// 新しい `FallbackChain` を作成
    #[must_use]
    pub const fn new(
        map: HashMap<Locale, Vec<Locale>>,
        defaults: Vec<Locale>,
        use_parent_locales: bool,
    ) -> Self {
        Self { map, defaults, use_parent_locales }
    }

    /// 設定からチェーンを構築する
    ///
    /// フォールバックが無効な場合、`map` も `defaults` も持たないチェーンになり、
    /// すべてのロケールが自身のみに解決されます。
    ///
    /// # Arguments
    /// * `settings` - オーバーレイ設定
    #[must_use]
    pub fn from_settings(settings: &OverlaySettings) -> Self {
        if !settings.fallbacks.enabled {
            return Self::new(HashMap::new(), Vec::new(), false);
        }
        Self::new(
            settings.fallbacks.map.clone(),
            settings.fallback_defaults(),
            settings.fallbacks.use_parent_locales,
        )
    }

    /// ロケールを（設定に応じて親ロケール付きで）展開する
    fn expand(&self, locale: &Locale) -> Vec<Locale> {
        if self.use_parent_locales { locale.self_and_parents() } else { vec![locale.clone()] }
    }
}

impl FallbackResolver for FallbackChain {
    fn resolve(&self, locale: &Locale) -> Vec<Locale> {
        let mut candidates = self.expand(locale);
        if let Some(mapped) = self.map.get(locale) {
            candidates.extend(mapped.iter().flat_map(|m| self.expand(m)));
        }
        candidates.extend(self.defaults.iter().flat_map(|d| self.expand(d)));

        let mut seen = HashSet::new();
        candidates.retain(|candidate| seen.insert(candidate.clone()));
        candidates
    }
}
