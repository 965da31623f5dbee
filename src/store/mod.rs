//! 翻訳レコードの永続化の契約

mod memory;

use thiserror::Error;

pub use memory::InMemoryStore;

use crate::entity::EntityId;
use crate::locale::Locale;
use crate::translation::TranslationRecord;

/// 永続化層が報告するエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// 所有エンティティにまだ識別子がない
    #[error("record has not been persisted yet")]
    NotPersisted,

    /// 翻訳レコードの保存に失敗
    #[error("failed to persist translation for locale '{locale}': {message}")]
    Persist {
        /// 保存できなかったロケール
        locale: Locale,
        /// 失敗の詳細
        message: String,
    },

    /// 翻訳レコードの検索に失敗
    #[error("translation query failed: {0}")]
    Query(String),
}

/// 所有者とロケールをキーにした翻訳レコードのストレージ
pub trait TranslationStore: Send + Sync {
    /// `owner` の `locale` ちょうどの永続化済みレコード
    fn find(&self, owner: EntityId, locale: &Locale)
    -> Result<Option<TranslationRecord>, StoreError>;

    /// `owner` が永続化済みレコードを持つロケール
    fn translated_locales(&self, owner: EntityId) -> Result<Vec<Locale>, StoreError>;

    /// `record` を保存し、永続化済みとして記録する
    fn save(&self, owner: EntityId, record: &mut TranslationRecord) -> Result<(), StoreError>;

    /// 最新の 1 つ前に永続化されたバージョン（履歴を持つストレージのみ）
    fn previous_version(
        &self,
        owner: EntityId,
        locale: &Locale,
    ) -> Result<Option<TranslationRecord>, StoreError>;
}
