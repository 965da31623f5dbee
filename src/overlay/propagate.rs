//! 複製時のオーバーレイの伝播

use serde_json::Value;

use super::{
    OverlayState,
    Translated,
};
use crate::entity::NativeEntity;
use crate::locale::Locale;
use crate::store::StoreError;

impl<E: NativeEntity + Clone> Translated<E> {
    /// 翻訳値ごとエンティティを複製する
    ///
    /// 複製は識別子を持たない未保存のレコードになり、空のオーバーレイから始まる。
    /// 翻訳済みのすべてのロケールの、すべての翻訳対象属性の値を複製の一時領域に
    /// 書き込む（値がなければ `Null`）。翻訳レコードは共有しないため、複製を保存
    /// しても元のエンティティの翻訳は変わらない。
    ///
    /// # Returns
    /// 独立した複製
    pub fn duplicate(&mut self) -> Result<Self, StoreError> {
        let mut entity = self.entity.clone();
        entity.reset_identity();
        let mut copy =
            Self { entity, context: self.context.clone(), overlay: OverlayState::default() };

        let names = self.entity.translatable_attribute_names().to_vec();
        for locale in self.translated_locales()? {
            for name in &names {
                let value = self.own_value(&locale, name)?.unwrap_or(Value::Null);
                copy.overlay.stash.write(locale.clone(), name.as_str(), value);
            }
        }
        tracing::debug!(staged = copy.overlay.stash.iter().count(), "Duplicated translated entity");
        Ok(copy)
    }

    /// フォールバックせずに `locale` 自身が持つ `name` の値
    fn own_value(&mut self, locale: &Locale, name: &str) -> Result<Option<Value>, StoreError> {
        if let Some(staged) = self.overlay.stash.read(locale, name) {
            return Ok(Some(staged.clone()));
        }
        let owner = self.entity.id();
        Ok(self
            .overlay
            .cache
            .find(locale, &self.overlay.translations, self.context.store.as_ref(), owner)?
            .and_then(|record| record.read(name).cloned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;
    use serde_json::json;

    use super::*;
    use crate::overlay::AccessOptions;
    use crate::test_utils::{
        article,
        context,
        harness,
        saved_article,
    };

    /// 未保存の値が複製される
    #[rstest]
    fn duplicate_copies_staged_values() {
        let mut record = article(context("en", &[]));
        record.write("title", "Hallo", AccessOptions::in_locale("de"));
        record.write("title", "Bonjour", AccessOptions::in_locale("fr"));

        let mut copy = record.duplicate().unwrap();

        assert_eq!(copy.read("title", AccessOptions::in_locale("de")).unwrap(), Some(json!("Hallo")));
        assert_eq!(
            copy.read("title", AccessOptions::in_locale("fr")).unwrap(),
            Some(json!("Bonjour"))
        );
        assert_eq!(copy.stash().read(&Locale::new("de"), "body"), Some(&Value::Null));
    }

    /// 複製への書き込みは元に影響しない
    #[rstest]
    fn duplicate_is_independent_of_source() {
        let mut record = article(context("en", &[]));
        record.write("title", "Hallo", AccessOptions::in_locale("de"));

        let mut copy = record.duplicate().unwrap();
        copy.write("title", "Servus", AccessOptions::in_locale("de"));

        assert_eq!(
            record.read("title", AccessOptions::in_locale("de")).unwrap(),
            Some(json!("Hallo"))
        );
        assert_eq!(
            copy.read("title", AccessOptions::in_locale("de")).unwrap(),
            Some(json!("Servus"))
        );
    }

    /// 永続化済みの値が複製され、複製は未保存のレコードになる
    #[rstest]
    fn duplicate_of_saved_source_is_new_record() {
        let mut record = saved_article(context("en", &[]));
        record.write("title", "Hallo", AccessOptions::in_locale("de"));
        record.save().unwrap();

        let copy = record.duplicate().unwrap();

        assert_that!(copy.entity().is_new_record(), eq(true));
        assert_that!(copy.translations().is_empty(), eq(true));
        assert_eq!(copy.stash().read(&Locale::new("de"), "title"), Some(&json!("Hallo")));
    }

    /// 複製を保存しても元の翻訳は上書きされない
    #[rstest]
    fn saving_duplicate_leaves_source_translations_alone() {
        let (overlay_context, store, _) = harness("en", &[]);
        let mut record = saved_article(overlay_context);
        record.write("title", "Hallo", AccessOptions::in_locale("de"));
        record.save().unwrap();

        let mut copy = record.duplicate().unwrap();
        copy.write("title", "Servus", AccessOptions::in_locale("de"));
        copy.save().unwrap();
        record.reload().unwrap();

        let source_id = record.entity().id().unwrap();
        let copy_id = copy.entity().id().unwrap();
        assert_that!(copy_id == source_id, eq(false));
        assert_that!(store.version_count(source_id, &Locale::new("de")), eq(1));
        assert_eq!(
            record.read("title", AccessOptions::in_locale("de")).unwrap(),
            Some(json!("Hallo"))
        );
        assert_eq!(
            copy.read("title", AccessOptions::in_locale("de")).unwrap(),
            Some(json!("Servus"))
        );
    }

    /// 未保存の元のプレースホルダーは共有しない
    #[rstest]
    fn new_source_does_not_share_placeholders() {
        let mut record = article(context("en", &[]));
        record.read("title", AccessOptions::in_locale("ja")).unwrap();

        let copy = record.duplicate().unwrap();

        assert_that!(record.translations().len(), eq(1));
        assert_that!(copy.translations().is_empty(), eq(true));
        assert_that!(copy.stash().is_empty(), eq(true));
    }
}
