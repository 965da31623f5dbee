//! エンティティとオーバーレイの変更状態の統合

use serde_json::Value;

use super::Translated;
use crate::entity::{
    AttributeChange,
    ChangeKey,
    Changes,
    NativeEntity,
};
use crate::locale::Locale;
use crate::store::StoreError;

impl<E: NativeEntity> Translated<E> {
    /// 未保存の翻訳値があるか、エンティティ自身に変更があるか
    #[must_use]
    pub fn is_changed(&self) -> bool {
        !self.overlay.stash.is_empty() || self.entity.is_changed()
    }

    /// エンティティ自身の変更と、未保存の翻訳値ごとの変更を合わせた変更セット
    ///
    /// 翻訳値の `from` は、そのロケールで最後に永続化された値。
    ///
    /// # Returns
    /// キー順に並んだ変更セット
    pub fn changes(&self) -> Result<Changes, StoreError> {
        let mut changes: Changes = self
            .entity
            .changes()
            .into_iter()
            .map(|(name, change)| (ChangeKey::Native(name), change))
            .collect();

        for (locale, name, value) in self.overlay.stash.iter() {
            let from = self.persisted_value(locale, name)?;
            changes.insert(
                ChangeKey::Translated { locale: locale.clone(), name: name.clone() },
                AttributeChange::new(from, Some(value.clone())),
            );
        }
        Ok(changes)
    }

    /// `locale` で最後に永続化された `name` の値（キャッシュは埋めない）
    fn persisted_value(&self, locale: &Locale, name: &str) -> Result<Option<Value>, StoreError> {
        let known =
            self.overlay.cache.peek(locale).or_else(|| self.overlay.translations.detect(locale));
        if let Some(record) = known {
            return Ok(record.persisted_value(name).cloned());
        }
        let Some(owner) = self.entity.id() else {
            return Ok(None);
        };
        Ok(self
            .context
            .store
            .find(owner, locale)?
            .and_then(|record| record.persisted_value(name).cloned()))
    }
}
