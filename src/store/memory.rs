//! 永続化されたすべてのバージョンを保持するインメモリ [`TranslationStore`]

use std::collections::{
    BTreeSet,
    HashMap,
    HashSet,
};
use std::sync::{
    Mutex,
    MutexGuard,
    PoisonError,
};

use super::{
    StoreError,
    TranslationStore,
};
use crate::entity::{
    AttributeMap,
    EntityId,
};
use crate::locale::Locale;
use crate::translation::TranslationRecord;

/// (所有者, ロケール) ごとのバージョン（古い順）
type VersionTable = HashMap<(EntityId, Locale), Vec<AttributeMap>>;

/// プロセスメモリ上の [`TranslationStore`]
///
/// [`fail_saves_for`](Self::fail_saves_for) で登録したロケールの保存は失敗する。
#[derive(Debug, Default)]
pub struct InMemoryStore {
    /// 永続化されたバージョン
    versions: Mutex<VersionTable>,
    /// 保存を失敗させるロケール
    failing: Mutex<HashSet<Locale>>,
}

impl InMemoryStore {
    /// 空のストアを作成
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `owner` の `locale` に永続化済みのバージョンを追加する
    pub fn insert(&self, owner: EntityId, locale: Locale, attributes: AttributeMap) {
        self.versions().entry((owner, locale)).or_default().push(attributes);
    }

    /// 以降の `locale` の保存をすべて失敗させる
    pub fn fail_saves_for(&self, locale: Locale) {
        self.failing.lock().unwrap_or_else(PoisonError::into_inner).insert(locale);
    }

    /// `owner` の `locale` に永続化されたバージョン数
    #[must_use]
    pub fn version_count(&self, owner: EntityId, locale: &Locale) -> usize {
        self.versions().get(&(owner, locale.clone())).map_or(0, Vec::len)
    }

    /// バージョン表のロックを取得（poison は無視する）
    fn versions(&self) -> MutexGuard<'_, VersionTable> {
        self.versions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TranslationStore for InMemoryStore {
    fn find(
        &self,
        owner: EntityId,
        locale: &Locale,
    ) -> Result<Option<TranslationRecord>, StoreError> {
        Ok(self
            .versions()
            .get(&(owner, locale.clone()))
            .and_then(|versions| versions.last())
            .map(|latest| TranslationRecord::persisted(locale.clone(), latest.clone())))
    }

    fn translated_locales(&self, owner: EntityId) -> Result<Vec<Locale>, StoreError> {
        let locales: BTreeSet<Locale> = self
            .versions()
            .keys()
            .filter(|(id, _)| *id == owner)
            .map(|(_, locale)| locale.clone())
            .collect();
        Ok(locales.into_iter().collect())
    }

    fn save(&self, owner: EntityId, record: &mut TranslationRecord) -> Result<(), StoreError> {
        if self.failing.lock().unwrap_or_else(PoisonError::into_inner).contains(record.locale()) {
            return Err(StoreError::Persist {
                locale: record.locale().clone(),
                message: "save rejected".to_string(),
            });
        }
        self.insert(owner, record.locale().clone(), record.attributes().clone());
        record.mark_persisted();
        Ok(())
    }

    fn previous_version(
        &self,
        owner: EntityId,
        locale: &Locale,
    ) -> Result<Option<TranslationRecord>, StoreError> {
        Ok(self.versions().get(&(owner, locale.clone())).and_then(|versions| {
            let previous = versions.len().checked_sub(2)?;
            versions
                .get(previous)
                .map(|values| TranslationRecord::persisted(locale.clone(), values.clone()))
        }))
    }
}
