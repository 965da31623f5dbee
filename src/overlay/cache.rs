//! インスタンスごとの翻訳レコードのキャッシュ（ロケールごとに 1 件）

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::entity::EntityId;
use crate::locale::Locale;
use crate::store::{
    StoreError,
    TranslationStore,
};
use crate::translation::{
    TranslationRecord,
    Translations,
};

/// ロケール → 翻訳レコード。必要になった時点で埋める
///
/// # 検索順序
/// 1. キャッシュ自身
/// 2. インスタンスの翻訳コレクション
/// 3. ストレージ（所有者に識別子がある場合のみ）
///
/// [`get_or_create`](Self::get_or_create) は見つからなければプレースホルダーを作る。
#[derive(Debug, Clone, Default)]
pub struct TranslationCache {
    /// ロケールごとに高々 1 件のレコード
    records: HashMap<Locale, TranslationRecord>,
}

impl TranslationCache {
    /// `locale` のレコードを取得する（なければプレースホルダーを作ってキャッシュする）
    ///
    /// # Arguments
    /// * `locale` - 対象のロケール
    /// * `translations` - プレースホルダーの追加先にもなる翻訳コレクション
    /// * `store` - 翻訳レコードのストレージ
    /// * `owner` - 所有エンティティの識別子（未保存なら `None`）
    pub fn get_or_create(
        &mut self,
        locale: &Locale,
        translations: &mut Translations,
        store: &dyn TranslationStore,
        owner: Option<EntityId>,
    ) -> Result<&mut TranslationRecord, StoreError> {
        match self.records.entry(locale.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let record = match locate(locale, translations, store, owner)? {
                    Some(record) => record,
                    None => {
                        tracing::debug!(%locale, "Building translation placeholder");
                        translations.build(locale.clone())
                    }
                };
                Ok(entry.insert(record))
            }
        }
    }

    /// 既存の `locale` のレコードを探す（見つかればキャッシュする）
    ///
    /// # Returns
    /// 見つからなければ `Ok(None)`。プレースホルダーは作らない
    pub fn find(
        &mut self,
        locale: &Locale,
        translations: &Translations,
        store: &dyn TranslationStore,
        owner: Option<EntityId>,
    ) -> Result<Option<&TranslationRecord>, StoreError> {
        if !self.records.contains_key(locale) {
            let Some(record) = locate(locale, translations, store, owner)? else {
                return Ok(None);
            };
            self.records.insert(locale.clone(), record);
        }
        Ok(self.records.get(locale))
    }

    /// キャッシュ済みのレコードのみを返す
    #[must_use]
    pub fn peek(&self, locale: &Locale) -> Option<&TranslationRecord> {
        self.records.get(locale)
    }

    /// レコードのロケールのキャッシュを置き換える
    pub fn replace(&mut self, record: TranslationRecord) {
        self.records.insert(record.locale().clone(), record);
    }

    /// `keep` 以外のロケールの未保存プレースホルダーを捨てる
    pub fn prune_placeholders(&mut self, keep: &Locale) {
        self.records.retain(|locale, record| locale == keep || !record.is_new_record());
    }

    /// キャッシュをすべて捨てる
    pub fn invalidate(&mut self) {
        self.records.clear();
    }

    /// キャッシュ済みのレコード数
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// キャッシュが空かどうか
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 既存のレコードを探す（翻訳コレクション、ストレージの順）
///
/// コレクションにはストレージ未保存のレコードが、ストレージにはコレクションに
/// 読み込まれていないレコードがありうる。
fn locate(
    locale: &Locale,
    translations: &Translations,
    store: &dyn TranslationStore,
    owner: Option<EntityId>,
) -> Result<Option<TranslationRecord>, StoreError> {
    if let Some(record) = translations.detect(locale) {
        return Ok(Some(record.clone()));
    }
    match owner {
        Some(owner) => {
            let found = store.find(owner, locale)?;
            if found.is_some() {
                tracing::debug!(owner, %locale, "Loaded translation from store");
            }
            Ok(found)
        }
        None => Ok(None),
    }
}
