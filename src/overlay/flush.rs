//! 未保存の翻訳の永続化

use std::collections::HashMap;

use super::Translated;
use crate::entity::{
    AttributeMap,
    EntityId,
    NativeEntity,
};
use crate::locale::Locale;
use crate::store::StoreError;

impl<E: NativeEntity> Translated<E> {
    /// エンティティ自身を保存し、続けて未保存の翻訳を保存する
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.entity.save()?;
        self.save_translations()
    }

    /// 一時領域の値を翻訳レコードに書き込み、永続化する
    ///
    /// ロケールは 1 つずつ（ソート順に）保存する。失敗した場合はそのエラーを返す。
    /// それより前のロケールは保存済みのまま一時領域から外れ、失敗したロケール
    /// 以降は一時領域に残る。
    ///
    /// # Errors
    /// - エンティティが未保存（[`StoreError::NotPersisted`]）
    /// - ストレージのエラー
    pub fn save_translations(&mut self) -> Result<(), StoreError> {
        if self.overlay.stash.is_empty() {
            self.overlay.cache.invalidate();
            return Ok(());
        }
        let owner = self.entity.id().ok_or(StoreError::NotPersisted)?;

        for locale in self.overlay.stash.locales() {
            let Some(attributes) = self.overlay.stash.attributes(&locale).cloned() else {
                continue;
            };
            if let Err(error) = self.persist(owner, &locale, attributes) {
                tracing::warn!(owner, %locale, %error, "Failed to persist translation");
                return Err(error);
            }
            self.overlay.stash.remove_locale(&locale);
        }

        self.overlay.stash.clear();
        self.overlay.cache.invalidate();
        tracing::debug!(owner, "Saved translations");
        Ok(())
    }

    /// 複数ロケールの値を書き込み、すぐに永続化する
    ///
    /// # Arguments
    /// * `translations` - ロケール → 属性値
    pub fn set_translations(
        &mut self,
        translations: HashMap<Locale, AttributeMap>,
    ) -> Result<(), StoreError> {
        let owner = self.entity.id().ok_or(StoreError::NotPersisted)?;
        let mut translations: Vec<(Locale, AttributeMap)> = translations.into_iter().collect();
        translations.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (locale, attributes) in translations {
            self.persist(owner, &locale, attributes)?;
        }
        Ok(())
    }

    /// `locale` のキャッシュ済みレコードに `attributes` を書き込み、永続化する
    fn persist(
        &mut self,
        owner: EntityId,
        locale: &Locale,
        attributes: AttributeMap,
    ) -> Result<(), StoreError> {
        let record = self.overlay.cache.get_or_create(
            locale,
            &mut self.overlay.translations,
            self.context.store.as_ref(),
            Some(owner),
        )?;
        for (name, value) in attributes {
            record.write(name, value);
        }
        self.context.store.save(owner, record)?;

        let saved = record.clone();
        self.overlay.translations.upsert(saved);
        tracing::debug!(owner, %locale, "Persisted translation");
        Ok(())
    }
}
