//! 翻訳レコードと、エンティティごとの翻訳コレクション

use serde_json::Value;

use crate::entity::AttributeMap;
use crate::locale::Locale;

/// 1 つのエンティティの 1 ロケール分の翻訳済み属性値
///
/// メモリ上で作成されたレコードは永続化されるまでプレースホルダー扱い。
/// 最後に永続化された値を作業中の値とは別に保持します。
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRecord {
    /// このレコードのロケール
    locale: Locale,
    /// 作業中の属性値
    attributes: AttributeMap,
    /// 最後に永続化された属性値（未保存なら `None`）
    persisted: Option<AttributeMap>,
}

impl TranslationRecord {
    /// `locale` の未保存プレースホルダーを作成
    #[must_use]
    pub fn build(locale: Locale) -> Self {
        Self { locale, attributes: AttributeMap::new(), persisted: None }
    }

    /// ストレージから読み込まれたレコードを作成
    #[must_use]
    pub fn persisted(locale: Locale, attributes: AttributeMap) -> Self {
        Self { locale, persisted: Some(attributes.clone()), attributes }
    }

    /// レコードのロケールを取得
    #[must_use]
    pub const fn locale(&self) -> &Locale {
        &self.locale
    }

    /// 一度も永続化されていないかどうか
    #[must_use]
    pub const fn is_new_record(&self) -> bool {
        self.persisted.is_none()
    }

    /// 作業中の値を読む
    #[must_use]
    pub fn read(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// 作業中の値を書き込む
    pub fn write(&mut self, name: impl Into<String>, value: Value) {
        self.attributes.insert(name.into(), value);
    }

    /// 作業中の属性値をすべて取得
    #[must_use]
    pub const fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// 最後に永続化されたときの `name` の値
    #[must_use]
    pub fn persisted_value(&self, name: &str) -> Option<&Value> {
        self.persisted.as_ref().and_then(|values| values.get(name))
    }

    /// 作業中の値を永続化済みとして記録する
    pub fn mark_persisted(&mut self) {
        self.persisted = Some(self.attributes.clone());
    }

    /// 未保存の編集を除いた、最後に永続化された状態のレコード
    ///
    /// # Returns
    /// 永続化済みの値を持つレコード。プレースホルダーの場合は空のプレースホルダー
    #[must_use]
    pub fn previous_version(&self) -> Self {
        match &self.persisted {
            Some(values) => Self::persisted(self.locale.clone(), values.clone()),
            None => Self::build(self.locale.clone()),
        }
    }
}

/// 1 つのエンティティインスタンスが把握している翻訳レコード
///
/// メモリ上で作成したレコードと、このインスタンス経由で保存したレコードを保持する。
/// ストレージの内容をすべて含むとは限らない。
#[derive(Debug, Clone, Default)]
pub struct Translations {
    /// ロケールごとに高々 1 件のレコード
    records: Vec<TranslationRecord>,
}

impl Translations {
    /// `locale` のレコードを探す
    #[must_use]
    pub fn detect(&self, locale: &Locale) -> Option<&TranslationRecord> {
        self.records.iter().find(|record| record.locale() == locale)
    }

    /// `locale` のプレースホルダーを追加し、そのコピーを返す
    pub fn build(&mut self, locale: Locale) -> TranslationRecord {
        let record = TranslationRecord::build(locale);
        self.records.push(record.clone());
        record
    }

    /// 同じロケールのレコードを置き換える（なければ追加）
    pub fn upsert(&mut self, record: TranslationRecord) {
        match self.records.iter_mut().find(|existing| existing.locale() == record.locale()) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// `keep` 以外のロケールの未保存プレースホルダーを取り除く
    ///
    /// # Returns
    /// 取り除いたレコード数
    pub fn reject_stale_placeholders(&mut self, keep: &Locale) -> usize {
        let before = self.records.len();
        self.records.retain(|record| !(record.is_new_record() && record.locale() != keep));
        before - self.records.len()
    }

    /// すべてのレコードを取り除く
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// レコード数
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// レコードが 1 件もないかどうか
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// レコードを順に返すイテレーター
    pub fn iter(&self) -> impl Iterator<Item = &TranslationRecord> {
        self.records.iter()
    }
}
