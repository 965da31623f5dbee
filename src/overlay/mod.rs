//! ロケール属性オーバーレイ
//!
//! [`Translated`] はエンティティをラップし、翻訳対象属性の読み書きを
//! インスタンスごとのオーバーレイ経由で振り分ける:
//!
//! - 書き込み済み・未保存の値を持つ [`LocaleStash`]
//! - ロケールごとの翻訳レコードを持つ [`TranslationCache`]
//! - reload まで高速パスを無効にするロールバックフラグ
//!
//! 翻訳対象でない属性はそのままエンティティに渡る。

/// 翻訳キャッシュ
mod cache;
/// 変更状態の統合
mod dirty;
/// 未保存の翻訳の永続化
mod flush;
/// 読み書きのオプション
mod options;
/// 複製時のオーバーレイ伝播
mod propagate;
/// 属性の読み書きの振り分け
mod router;
/// ロールバックと reload
mod snapshot;
/// 未保存の値の一時領域
mod stash;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

pub use cache::TranslationCache;
pub use options::AccessOptions;
pub use stash::LocaleStash;

use crate::config::OverlaySettings;
use crate::entity::NativeEntity;
use crate::fallback::{
    FallbackChain,
    FallbackResolver,
};
use crate::locale::{
    Locale,
    LocaleContext,
};
use crate::store::TranslationStore;
use crate::translation::Translations;

/// オーバーレイを持つすべてのエンティティが共有する協調オブジェクト
#[derive(Clone)]
pub struct OverlayContext {
    /// 翻訳レコードのストレージ
    pub store: Arc<dyn TranslationStore>,
    /// フォールバックチェーンのリゾルバー
    pub fallbacks: Arc<dyn FallbackResolver>,
    /// 現在のロケールとデフォルトロケールの供給元
    pub locales: Arc<dyn LocaleContext>,
    /// 空白の値も値なしと同様にフォールバックを続ける
    pub fallbacks_for_empty_translations: bool,
}

impl OverlayContext {
    /// 新しい `OverlayContext` を作成
    #[must_use]
    pub fn new(
        store: Arc<dyn TranslationStore>,
        fallbacks: Arc<dyn FallbackResolver>,
        locales: Arc<dyn LocaleContext>,
    ) -> Self {
        Self { store, fallbacks, locales, fallbacks_for_empty_translations: false }
    }

    /// フォールバック規則を設定から構築した `OverlayContext` を作成
    ///
    /// # Arguments
    /// * `settings` - オーバーレイ設定
    /// * `store` - 翻訳レコードのストレージ
    /// * `locales` - 現在のロケールの供給元
    #[must_use]
    pub fn from_settings(
        settings: &OverlaySettings,
        store: Arc<dyn TranslationStore>,
        locales: Arc<dyn LocaleContext>,
    ) -> Self {
        Self {
            store,
            fallbacks: Arc::new(FallbackChain::from_settings(settings)),
            locales,
            fallbacks_for_empty_translations: settings.fallbacks.for_empty_translations,
        }
    }
}

impl fmt::Debug for OverlayContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayContext")
            .field("store", &"<dyn TranslationStore>")
            .field("fallbacks", &"<dyn FallbackResolver>")
            .field("locales", &"<dyn LocaleContext>")
            .field("fallbacks_for_empty_translations", &self.fallbacks_for_empty_translations)
            .finish()
    }
}

/// 1 つのエンティティインスタンスが所有するオーバーレイの状態
#[derive(Debug, Clone, Default)]
struct OverlayState {
    /// 未保存の値
    stash: LocaleStash,
    /// ロケールごとの翻訳レコード
    cache: TranslationCache,
    /// インスタンスが把握している翻訳レコード
    translations: Translations,
    /// ロールバック済みか（reload まで高速パスを無効にする）
    rolled_back: bool,
}

/// オーバーレイが返した値と、その値を持っていたロケール
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// 値
    pub value: Value,
    /// 値を持っていた一時領域またはレコードのロケール
    pub locale: Locale,
    /// 要求されたロケール
    pub requested_locale: Locale,
}

impl Resolved {
    /// フォールバック先のロケールから得た値かどうか
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.locale != self.requested_locale
    }
}

/// ロケール属性オーバーレイを持つエンティティ
#[derive(Debug)]
pub struct Translated<E> {
    /// ラップしているエンティティ
    entity: E,
    /// 共有の協調オブジェクト
    context: OverlayContext,
    /// このインスタンスのオーバーレイ
    overlay: OverlayState,
}

impl<E: NativeEntity> Translated<E> {
    /// 空のオーバーレイで `entity` をラップする
    #[must_use]
    pub fn new(entity: E, context: OverlayContext) -> Self {
        Self { entity, context, overlay: OverlayState::default() }
    }

    /// ラップしているエンティティを取得
    #[must_use]
    pub const fn entity(&self) -> &E {
        &self.entity
    }

    /// オーバーレイを捨ててエンティティを取り出す
    #[must_use]
    pub fn into_inner(self) -> E {
        self.entity
    }

    /// 共有の協調オブジェクトを取得
    #[must_use]
    pub const fn context(&self) -> &OverlayContext {
        &self.context
    }

    /// [`rollback`](Self::rollback) 後、次の reload までは true
    #[must_use]
    pub const fn is_rolled_back(&self) -> bool {
        self.overlay.rolled_back
    }

    /// 書き込み済み・未保存の翻訳値
    #[must_use]
    pub const fn stash(&self) -> &LocaleStash {
        &self.overlay.stash
    }

    /// ロケールごとの翻訳レコードのキャッシュ
    #[must_use]
    pub const fn translation_cache(&self) -> &TranslationCache {
        &self.overlay.cache
    }

    /// インスタンスが把握している翻訳レコード
    #[must_use]
    pub const fn translations(&self) -> &Translations {
        &self.overlay.translations
    }

    /// 明示されたロケール、なければ現在のロケール
    fn effective_locale(&self, locale: Option<Locale>) -> Locale {
        locale.unwrap_or_else(|| self.context.locales.current_locale())
    }
}
