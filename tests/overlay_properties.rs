//! 公開 API から見たロケールオーバーレイの振る舞い

#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]
#![allow(missing_docs)]

use std::collections::HashMap;
use std::sync::Arc;

use googletest::prelude::*;
use locale_overlay::config::OverlaySettings;
use locale_overlay::{
    AccessOptions,
    FallbackChain,
    InMemoryStore,
    Locale,
    LocaleScope,
    MemoryEntity,
    NativeEntity,
    OverlayContext,
    StoreError,
    Translated,
};
use rstest::*;
use serde_json::json;

/// テストごとのオーバーレイ環境
struct Setup {
    /// オーバーレイのコンテキスト
    context: OverlayContext,
    /// 翻訳レコードのストレージ
    store: Arc<InMemoryStore>,
    /// 現在のロケール
    scope: Arc<LocaleScope>,
}

/// デフォルトロケールは `en`。他のロケールはすべて `en` にフォールバックする
#[fixture]
fn setup() -> Setup {
    let store = Arc::new(InMemoryStore::new());
    let scope = Arc::new(LocaleScope::new(Locale::new("en")));
    let chain = FallbackChain::new(HashMap::new(), vec![Locale::new("en")], true);
    let context = OverlayContext::new(store.clone(), Arc::new(chain), scope.clone());
    Setup { context, store, scope }
}

/// `title`（カラムあり）と `body`（カラムなし）を翻訳する未保存の投稿
fn post(context: &OverlayContext) -> Translated<MemoryEntity> {
    Translated::new(MemoryEntity::new(["title", "slug"], ["title", "body"]), context.clone())
}

/// 書き込んだ値は保存の前後で読める
#[rstest]
#[case::default_locale_column("en", "title")]
#[case::default_locale_no_column("en", "body")]
#[case::other_locale("de", "title")]
#[case::regional_locale("de-AT", "body")]
fn write_then_read_before_and_after_save(setup: Setup, #[case] locale: &str, #[case] name: &str) {
    let mut record = post(&setup.context);

    record.write(name, "value", AccessOptions::in_locale(locale));
    assert_eq!(record.read(name, AccessOptions::in_locale(locale)).unwrap(), Some(json!("value")));

    record.save().unwrap();
    assert_eq!(record.read(name, AccessOptions::in_locale(locale)).unwrap(), Some(json!("value")));
}

/// デフォルトロケールの書き込みはカラムにも反映される
#[rstest]
fn default_locale_write_is_visible_natively(setup: Setup) {
    let mut record = post(&setup.context);

    record.write("title", "Hello", AccessOptions::default());

    assert_eq!(record.entity().read_attribute("title"), Some(json!("Hello")));
    assert_eq!(record.read("title", AccessOptions::untranslated()).unwrap(), Some(json!("Hello")));
}

/// translated_locales: 書き込んだロケール
#[rstest]
fn translated_locales_are_the_written_locales(setup: Setup) {
    let mut record = post(&setup.context);
    record.write("title", "Bonjour", AccessOptions::in_locale("fr"));
    record.write("title", "Hallo", AccessOptions::in_locale("de"));
    record.write("body", "Text", AccessOptions::in_locale("de"));

    let locales = record.translated_locales().unwrap();

    assert_eq!(locales, vec![Locale::new("de"), Locale::new("fr")]);
}

/// translated_locales: 永続化済みのロケールも含む
#[rstest]
fn translated_locales_include_persisted_ones(setup: Setup) {
    let mut record = post(&setup.context);
    record.write("title", "Hallo", AccessOptions::in_locale("de"));
    record.save().unwrap();
    record.write("title", "Bonjour", AccessOptions::in_locale("fr"));

    let locales = record.translated_locales().unwrap();

    assert_eq!(locales, vec![Locale::new("de"), Locale::new("fr")]);
}

/// 保存して再読み込みしても値が変わらない
#[rstest]
fn save_reload_round_trip(setup: Setup) {
    let mut record = post(&setup.context);
    record.write("title", "Hello", AccessOptions::in_locale("en"));
    record.write("title", "Hallo", AccessOptions::in_locale("de"));
    record.save().unwrap();

    record.reload().unwrap();

    assert_eq!(record.read("title", AccessOptions::in_locale("de")).unwrap(), Some(json!("Hallo")));
    assert_eq!(record.read("title", AccessOptions::in_locale("ja")).unwrap(), Some(json!("Hello")));
    let resolved = record.fetch(&Locale::new("ja"), "title").unwrap().unwrap();
    assert_that!(resolved.is_fallback(), eq(true));
}

/// 現在のロケールで読み書きが振り分けられる
#[rstest]
fn ambient_locale_routes_reads_and_writes(setup: Setup) {
    let mut record = post(&setup.context);

    setup.scope.with_locale(Locale::new("de"), || {
        record.write("title", "Hallo", AccessOptions::default());
    });

    assert_eq!(record.read("title", AccessOptions::in_locale("de")).unwrap(), Some(json!("Hallo")));
    assert!(record.entity().read_attribute("title").is_none());
}

/// rollback: 再読み込みまで以前の値に戻る
#[rstest]
fn rollback_restores_previous_value_until_reload(setup: Setup) {
    let mut record = post(&setup.context);
    record.write("title", "First", AccessOptions::default());
    record.save().unwrap();
    record.write("title", "Second", AccessOptions::default());
    record.save().unwrap();

    record.rollback().unwrap();

    assert_that!(record.is_rolled_back(), eq(true));
    assert_eq!(record.read("title", AccessOptions::default()).unwrap(), Some(json!("First")));

    record.reload().unwrap();

    assert_that!(record.is_rolled_back(), eq(false));
    assert_eq!(record.read("title", AccessOptions::default()).unwrap(), Some(json!("Second")));
}

/// duplicate: 複製は元のレコードから独立している
#[rstest]
fn duplicate_is_independent(setup: Setup) {
    let mut source = post(&setup.context);
    source.write("title", "Hallo", AccessOptions::in_locale("de"));
    source.write("title", "Bonjour", AccessOptions::in_locale("fr"));

    let mut copy = source.duplicate().unwrap();

    for (locale, expected) in [("de", "Hallo"), ("fr", "Bonjour")] {
        assert_eq!(
            copy.read("title", AccessOptions::in_locale(locale)).unwrap(),
            Some(json!(expected))
        );
    }

    copy.write("title", "Servus", AccessOptions::in_locale("de"));

    assert_eq!(source.read("title", AccessOptions::in_locale("de")).unwrap(), Some(json!("Hallo")));
}

/// 保存するまでは変更ありになる
#[rstest]
fn changed_until_saved(setup: Setup) {
    let mut record = post(&setup.context);
    record.save().unwrap();
    assert_that!(record.is_changed(), eq(false));

    record.write("body", "Text", AccessOptions::in_locale("de"));
    assert_that!(record.is_changed(), eq(true));

    record.save().unwrap();
    assert_that!(record.is_changed(), eq(false));
    assert_that!(record.changes().unwrap(), len(eq(0)));
}

/// 途中で保存に失敗しても先に保存したロケールは残る
#[rstest]
fn partial_flush_keeps_earlier_locales(setup: Setup) {
    setup.store.fail_saves_for(Locale::new("fr"));
    let mut record = post(&setup.context);
    record.write("title", "Hallo", AccessOptions::in_locale("de"));
    record.write("title", "Bonjour", AccessOptions::in_locale("fr"));

    let error = record.save().unwrap_err();

    assert!(matches!(error, StoreError::Persist { ref locale, .. } if *locale == "fr"));
    let owner = record.entity().id().unwrap();
    assert_that!(setup.store.version_count(owner, &Locale::new("de")), eq(1));
    assert_that!(setup.store.version_count(owner, &Locale::new("fr")), eq(0));
    assert_that!(record.is_changed(), eq(true));
}

/// 設定からフォールバックが決まる
#[rstest]
fn settings_drive_fallbacks() {
    let settings: OverlaySettings = serde_json::from_value(json!({
        "defaultLocale": "en",
        "fallbacks": { "map": { "de-CH": ["fr"] }, "forEmptyTranslations": true }
    }))
    .unwrap();
    let scope = Arc::new(LocaleScope::new(settings.default_locale.clone()));
    let context =
        OverlayContext::from_settings(&settings, Arc::new(InMemoryStore::new()), scope);
    let mut record = post(&context);
    record.write("body", "Texte", AccessOptions::in_locale("fr"));
    record.write("body", "", AccessOptions::in_locale("de"));

    assert_eq!(
        record.read("body", AccessOptions::in_locale("de-CH")).unwrap(),
        Some(json!("Texte"))
    );
}
