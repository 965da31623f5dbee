//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use std::collections::HashMap;
use std::sync::Arc;

use crate::entity::{
    MemoryEntity,
    NativeEntity,
};
use crate::locale::{
    Locale,
    LocaleScope,
};
use crate::overlay::{
    OverlayContext,
    Translated,
};
use crate::store::InMemoryStore;

/// テスト用の OverlayContext と、その store / locale scope を作成する
///
/// # Arguments
/// * `default_locale` - デフォルトロケール（例: "en"）
/// * `chains` - ロケールごとのフォールバックチェーン。未指定のロケールは自身のみ
///
/// # Returns
/// (context, store, scope)
pub(crate) fn harness(
    default_locale: &str,
    chains: &[(&str, &[&str])],
) -> (OverlayContext, Arc<InMemoryStore>, Arc<LocaleScope>) {
    let store = Arc::new(InMemoryStore::new());
    let scope = Arc::new(LocaleScope::new(Locale::new(default_locale)));
    let chains: HashMap<Locale, Vec<Locale>> = chains
        .iter()
        .map(|(locale, chain)| {
            (Locale::new(*locale), chain.iter().map(|code| Locale::new(*code)).collect())
        })
        .collect();
    let resolver = move |locale: &Locale| {
        chains.get(locale).cloned().unwrap_or_else(|| vec![locale.clone()])
    };

    let context = OverlayContext::new(store.clone(), Arc::new(resolver), scope.clone());
    (context, store, scope)
}

/// テスト用の OverlayContext を作成する
pub(crate) fn context(default_locale: &str, chains: &[(&str, &[&str])]) -> OverlayContext {
    harness(default_locale, chains).0
}

/// `title`（カラムあり）と `body`（カラムなし）を翻訳する未保存の記事
pub(crate) fn article(context: OverlayContext) -> Translated<MemoryEntity> {
    Translated::new(MemoryEntity::new(["title", "slug"], ["title", "body"]), context)
}

/// 保存済みの記事
#[allow(clippy::unwrap_used)]
pub(crate) fn saved_article(context: OverlayContext) -> Translated<MemoryEntity> {
    let mut entity = MemoryEntity::new(["title", "slug"], ["title", "body"]);
    entity.save().unwrap();
    Translated::new(entity, context)
}
