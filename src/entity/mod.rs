//! オーバーレイが利用するベースエンティティの契約

mod memory;

use std::collections::{
    BTreeMap,
    HashMap,
};
use std::fmt;

use serde_json::Value;

pub use memory::MemoryEntity;

use crate::locale::Locale;
use crate::store::StoreError;

/// 永続化されたエンティティの識別子
pub type EntityId = u64;

/// 属性名 → 値
pub type AttributeMap = HashMap<String, Value>;

/// 統合された変更セットのキー
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChangeKey {
    /// エンティティ自身のストレージで追跡される変更
    Native(String),
    /// まだ永続化されていない翻訳値
    Translated {
        /// 値のロケール
        locale: Locale,
        /// 属性名
        name: String,
    },
}

impl fmt::Display for ChangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(name) => f.write_str(name),
            Self::Translated { locale, name } => write!(f, "{name}[{locale}]"),
        }
    }
}

/// 変更された属性の変更前後の値
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeChange {
    /// 変更前の値
    pub from: Option<Value>,
    /// 変更後の値
    pub to: Option<Value>,
}

impl AttributeChange {
    /// 新しい `AttributeChange` を作成
    #[must_use]
    pub const fn new(from: Option<Value>, to: Option<Value>) -> Self {
        Self { from, to }
    }
}

/// キー順に並んだ統合変更セット
pub type Changes = BTreeMap<ChangeKey, AttributeChange>;

/// 永続化されたエンティティが提供する機能
///
/// オーバーレイはこのトレイトを実装した型をラップし、エンティティ自身の
/// ストレージにはこれらのメソッド経由でのみアクセスします。
pub trait NativeEntity {
    /// 識別子（最初の保存前は `None`）
    fn id(&self) -> Option<EntityId>;

    /// 一度も保存されていないかどうか
    fn is_new_record(&self) -> bool {
        self.id().is_none()
    }

    /// 複製用に識別子を外し、未保存のレコードにする
    ///
    /// 属性値はそのまま残り、すべて未保存の変更として扱われます。
    fn reset_identity(&mut self);

    /// `name` がエンティティ自身のカラムかどうか
    fn has_attribute(&self, name: &str) -> bool;

    /// エンティティ自身のカラム名
    fn attribute_names(&self) -> Vec<String>;

    /// エンティティ自身のストレージから値を読む
    fn read_attribute(&self, name: &str) -> Option<Value>;

    /// エンティティ自身のストレージへ値を書き込む
    fn write_attribute(&mut self, name: &str, value: Value);

    /// `name` のメモリ上の値を捨てる（reload で読み直される）
    fn remove_attribute(&mut self, name: &str);

    /// 値を書き込まずに `name` を変更済みにする
    fn attribute_will_change(&mut self, name: &str);

    /// 未保存の変更があるかどうか
    fn is_changed(&self) -> bool;

    /// 属性名 → 変更内容
    fn changes(&self) -> HashMap<String, AttributeChange>;

    /// エンティティ自身を保存する
    fn save(&mut self) -> Result<(), StoreError>;

    /// エンティティ自身のカラムをストレージから読み直す
    fn reload(&mut self) -> Result<(), StoreError>;

    /// ロケールごとに保存される属性名
    fn translatable_attribute_names(&self) -> &[String];

    /// `name` が翻訳対象かどうか
    fn is_translatable(&self, name: &str) -> bool {
        self.translatable_attribute_names().iter().any(|translatable| translatable == name)
    }
}
