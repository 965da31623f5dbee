//! エンティティ自身のストレージとオーバーレイの間で属性の読み書きを振り分ける

use std::collections::BTreeSet;

use serde_json::Value;

use super::{
    AccessOptions,
    Resolved,
    Translated,
};
use crate::entity::{
    AttributeMap,
    NativeEntity,
};
use crate::locale::Locale;
use crate::store::StoreError;
use crate::translation::TranslationRecord;

impl<E: NativeEntity> Translated<E> {
    /// オプションのロケール（なければ現在のロケール）で `name` を書き込む
    ///
    /// 翻訳対象の値は常に一時領域に書き込む。デフォルトロケール、または
    /// エンティティが未保存の場合は、高速パスが使えればエンティティ自身の
    /// カラムにも書き込み、使えなければ変更済みの印だけを付ける。
    ///
    /// # Arguments
    /// * `name` - 属性名
    /// * `value` - 書き込む値
    /// * `options` - ロケールなどのオプション（旧形式の `Locale` も可）
    pub fn write(&mut self, name: &str, value: impl Into<Value>, options: impl Into<AccessOptions>) {
        let options = options.into();
        let value = value.into();
        if !self.entity.is_translatable(name) {
            self.entity.write_attribute(name, value);
            return;
        }

        let locale = self.effective_locale(options.locale);
        if locale == self.context.locales.default_locale() || self.entity.is_new_record() {
            if self.uses_instance_value(name, &locale) {
                self.entity.write_attribute(name, value.clone());
            } else {
                self.entity.attribute_will_change(name);
            }
        }

        let pruned = self.overlay.translations.reject_stale_placeholders(&locale);
        if pruned > 0 {
            tracing::debug!(%locale, pruned, "Discarded stale translation placeholders");
        }
        self.overlay.cache.prune_placeholders(&locale);
        self.overlay.stash.write(locale, name, value);
    }

    /// オプションのロケール（なければ現在のロケール）で `name` を読む
    ///
    /// 翻訳なしの読み込みと高速パスはエンティティ自身のストレージを使い、
    /// それ以外は [`fetch`](Self::fetch) を通す。
    ///
    /// # Returns
    /// 値。どのフォールバック候補にも値がなければ `None`
    pub fn read(
        &mut self,
        name: &str,
        options: impl Into<AccessOptions>,
    ) -> Result<Option<Value>, StoreError> {
        let options = options.into();
        if !options.translated || !self.entity.is_translatable(name) {
            return Ok(self.entity.read_attribute(name));
        }

        let locale = self.effective_locale(options.locale);
        if self.uses_instance_value(name, &locale) {
            return Ok(self.entity.read_attribute(name));
        }
        Ok(self.fetch(&locale, name)?.map(|resolved| resolved.value))
    }

    /// フォールバックチェーンを辿り、オーバーレイから `locale` の `name` を解決する
    ///
    /// 各候補ロケールは、一時領域に値があればそれを、なければ翻訳レコードの値を返す。
    /// 値なし（設定によっては空白の値も）なら次の候補へ進む。どの候補にも値が
    /// なければ `locale` のプレースホルダーをキャッシュして `None` を返す。
    ///
    /// # Returns
    /// 値と、値を持っていたロケール
    pub fn fetch(&mut self, locale: &Locale, name: &str) -> Result<Option<Resolved>, StoreError> {
        let owner = self.entity.id();
        for candidate in self.context.fallbacks.resolve(locale) {
            let value = match self.overlay.stash.read(&candidate, name) {
                Some(staged) => Some(staged.clone()),
                None => self
                    .overlay
                    .cache
                    .find(
                        &candidate,
                        &self.overlay.translations,
                        self.context.store.as_ref(),
                        owner,
                    )?
                    .and_then(|record| record.read(name).cloned()),
            };
            let Some(value) = value else {
                continue;
            };
            if self.needs_fallback(&value) {
                continue;
            }
            if candidate != *locale {
                tracing::trace!(%locale, fallback = %candidate, name, "Answered by fallback locale");
            }
            return Ok(Some(Resolved { value, locale: candidate, requested_locale: locale.clone() }));
        }

        self.translation_for(locale)?;
        Ok(None)
    }

    /// `locale` の翻訳レコード（初回アクセス時に作成してキャッシュする）
    pub fn translation_for(&mut self, locale: &Locale) -> Result<&TranslationRecord, StoreError> {
        let owner = self.entity.id();
        let record = self.overlay.cache.get_or_create(
            locale,
            &mut self.overlay.translations,
            self.context.store.as_ref(),
            owner,
        )?;
        Ok(record)
    }

    /// 現在のロケールの翻訳レコード
    pub fn translation(&mut self) -> Result<&TranslationRecord, StoreError> {
        let locale = self.context.locales.current_locale();
        self.translation_for(&locale)
    }

    /// 未保存の値または永続化済みのレコードを持つロケール（ソート済み・重複なし）
    pub fn translated_locales(&self) -> Result<Vec<Locale>, StoreError> {
        let mut locales: BTreeSet<Locale> = self.overlay.stash.locales().into_iter().collect();
        if let Some(owner) = self.entity.id() {
            locales.extend(self.context.store.translated_locales(owner)?);
        }
        Ok(locales.into_iter().collect())
    }

    /// `locale` のレコードが持つ翻訳対象属性の値（高速パスの属性は除く）
    pub fn translated_attributes(&mut self, locale: &Locale) -> Result<AttributeMap, StoreError> {
        let names: Vec<String> = self
            .entity
            .translatable_attribute_names()
            .iter()
            .filter(|name| !self.uses_instance_value(name, locale))
            .cloned()
            .collect();
        let record = self.translation_for(locale)?;
        Ok(names
            .into_iter()
            .map(|name| {
                let value = record.read(&name).cloned().unwrap_or(Value::Null);
                (name, value)
            })
            .collect())
    }

    /// エンティティ自身の属性に、現在のロケールの翻訳値を重ねたもの
    pub fn attributes(&mut self) -> Result<AttributeMap, StoreError> {
        let mut attributes: AttributeMap = self
            .entity
            .attribute_names()
            .into_iter()
            .map(|name| {
                let value = self.entity.read_attribute(&name).unwrap_or(Value::Null);
                (name, value)
            })
            .collect();
        let locale = self.context.locales.current_locale();
        attributes.extend(self.translated_attributes(&locale)?);
        Ok(attributes)
    }

    /// 翻訳対象の属性名、続けてエンティティ自身の属性名
    #[must_use]
    pub fn attribute_names(&self) -> Vec<String> {
        let mut names = self.entity.translatable_attribute_names().to_vec();
        for name in self.entity.attribute_names() {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// エンティティ自身のストレージが持つ値での全属性
    #[must_use]
    pub fn untranslated_attributes(&self) -> AttributeMap {
        self.attribute_names()
            .into_iter()
            .map(|name| {
                let value = self.entity.read_attribute(&name).unwrap_or(Value::Null);
                (name, value)
            })
            .collect()
    }

    /// `attributes` のすべての属性を書き込む
    ///
    /// `"locale"` は書き込まず、この一括書き込みのロケールとして使う。
    pub fn assign_attributes(&mut self, mut attributes: AttributeMap) {
        let locale = match attributes.remove("locale") {
            Some(Value::String(code)) => Some(Locale::new(code)),
            Some(other) => {
                tracing::warn!(?other, "Ignoring non-string locale in attribute assignment");
                None
            }
            None => None,
        };
        let options = AccessOptions { locale, ..AccessOptions::default() };
        for (name, value) in attributes {
            self.write(&name, value, options.clone());
        }
    }

    /// 高速パス（オーバーレイの代わりにエンティティ自身のカラムを使う）が使えるか
    ///
    /// # 条件
    /// - ロールバックしていない
    /// - デフォルトロケールである
    /// - デフォルトロケールのチェーンが自身のみ
    /// - `name` がエンティティ自身のカラム
    pub(super) fn uses_instance_value(&self, name: &str, locale: &Locale) -> bool {
        !self.overlay.rolled_back
            && *locale == self.context.locales.default_locale()
            && self.context.fallbacks.is_trivial(locale)
            && self.entity.has_attribute(name)
    }

    /// 値なしとみなして次の候補へ進むべき値か
    fn needs_fallback(&self, value: &Value) -> bool {
        value.is_null() || (self.context.fallbacks_for_empty_translations && is_blank(value))
    }
}

/// 空白の文字列や空のコンテナかどうか
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
