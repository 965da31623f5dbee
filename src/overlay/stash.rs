//! まだ永続化されていない翻訳の書き込みを溜める一時領域

use std::collections::HashMap;

use serde_json::Value;

use crate::entity::AttributeMap;
use crate::locale::Locale;

/// (ロケール, 属性) をキーにした、書き込み済み・未保存の値
#[derive(Debug, Clone, Default)]
pub struct LocaleStash {
    /// ロケール → 属性名 → 値
    entries: HashMap<Locale, AttributeMap>,
}

impl LocaleStash {
    /// 値を書き込む（同じキーの値は上書き）
    pub fn write(&mut self, locale: Locale, name: impl Into<String>, value: Value) {
        self.entries.entry(locale).or_default().insert(name.into(), value);
    }

    /// 値を読む
    #[must_use]
    pub fn read(&self, locale: &Locale, name: &str) -> Option<&Value> {
        self.entries.get(locale).and_then(|values| values.get(name))
    }

    /// 値があるかどうか
    #[must_use]
    pub fn contains(&self, locale: &Locale, name: &str) -> bool {
        self.read(locale, name).is_some()
    }

    /// 1 ロケール分の値
    #[must_use]
    pub fn attributes(&self, locale: &Locale) -> Option<&AttributeMap> {
        self.entries.get(locale)
    }

    /// 値を 1 つ以上持つロケール（ソート済み）
    #[must_use]
    pub fn locales(&self) -> Vec<Locale> {
        let mut locales: Vec<Locale> = self
            .entries
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(locale, _)| locale.clone())
            .collect();
        locales.sort();
        locales
    }

    /// すべての `(ロケール, 属性名, 値)`
    pub fn iter(&self) -> impl Iterator<Item = (&Locale, &String, &Value)> {
        self.entries
            .iter()
            .flat_map(|(locale, values)| values.iter().map(move |(name, value)| (locale, name, value)))
    }

    /// 1 ロケール分の値を取り除く
    pub fn remove_locale(&mut self, locale: &Locale) {
        self.entries.remove(locale);
    }

    /// 値が 1 つもないかどうか
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(HashMap::is_empty)
    }

    /// すべての値を取り除く
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
