//! 直前の翻訳バージョンへのロールバックと reload

use super::Translated;
use crate::entity::NativeEntity;
use crate::store::StoreError;

impl<E: NativeEntity> Translated<E> {
    /// 現在のロケールのキャッシュを、1 つ前のバージョンのレコードで置き換える
    ///
    /// 所有者が保存済みならストレージの履歴を、なければレコード自身の最後に
    /// 永続化された値を使う。現在のロケールの未保存の値も捨てる。
    /// 以降は [`reload`](Self::reload) まで高速パスを使わない。
    pub fn rollback(&mut self) -> Result<(), StoreError> {
        self.overlay.rolled_back = true;
        let locale = self.context.locales.current_locale();

        let from_store = match self.entity.id() {
            Some(owner) => self.context.store.previous_version(owner, &locale)?,
            None => None,
        };
        let previous = match from_store {
            Some(record) => record,
            None => self.translation_for(&locale)?.previous_version(),
        };

        tracing::debug!(%locale, "Rolled back translation");
        self.overlay.stash.remove_locale(&locale);
        self.overlay.cache.replace(previous);
        Ok(())
    }

    /// オーバーレイをすべて捨て、エンティティをストレージから読み直す
    ///
    /// 未保存のエンティティは読み直せないため、オーバーレイに触れずに
    /// [`StoreError::NotPersisted`] を返す。
    pub fn reload(&mut self) -> Result<(), StoreError> {
        if self.entity.is_new_record() {
            return Err(StoreError::NotPersisted);
        }
        self.overlay.rolled_back = false;
        self.overlay.cache.invalidate();
        let names = self.entity.translatable_attribute_names().to_vec();
        for name in &names {
            self.entity.remove_attribute(name);
        }
        self.overlay.stash.clear();
        self.overlay.translations.clear();
        self.entity.reload()
    }
}
