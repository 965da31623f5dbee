//! locale-overlay
//!
//! 永続化されたエンティティの上にロケールごとの属性値を重ねるオーバーレイ。
//! 翻訳対象の属性は [`overlay::Translated`] を通して読み書きし、それ以外の属性は
//! エンティティ自身のストレージにそのまま渡る。

pub mod config;
pub mod entity;
pub mod fallback;
pub mod locale;
pub mod overlay;
pub mod store;
pub mod translation;

mod test_utils;

pub use entity::{
    MemoryEntity,
    NativeEntity,
};
pub use fallback::{
    FallbackChain,
    FallbackResolver,
};
pub use locale::{
    Locale,
    LocaleContext,
    LocaleScope,
};
pub use overlay::{
    AccessOptions,
    OverlayContext,
    Translated,
};
pub use store::{
    InMemoryStore,
    StoreError,
    TranslationStore,
};
