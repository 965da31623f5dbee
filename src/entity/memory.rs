//! 変更追跡付きのインメモリ [`NativeEntity`]

use std::collections::{
    BTreeSet,
    HashMap,
};
use std::sync::atomic::{
    AtomicU64,
    Ordering,
};

use serde_json::Value;

use super::{
    AttributeChange,
    AttributeMap,
    EntityId,
    NativeEntity,
};
use crate::store::StoreError;

/// 次に割り当てる識別子
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// 自身のストレージをメモリ上のマップで持つエンティティ
///
/// 変更は最後に保存した値との差分で追跡する。`save` は初回に識別子を割り当て、
/// `reload` は保存済みの値に戻す。
#[derive(Debug, Clone)]
pub struct MemoryEntity {
    /// 識別子（未保存なら `None`）
    id: Option<EntityId>,
    /// エンティティ自身のカラム名
    columns: Vec<String>,
    /// 翻訳対象の属性名
    translatable: Vec<String>,
    /// 現在の値
    attributes: AttributeMap,
    /// 最後に保存した値
    saved: AttributeMap,
    /// `attribute_will_change` で変更済みにされた属性
    forced: BTreeSet<String>,
}

impl MemoryEntity {
    /// 未保存の新しいエンティティを作成
    ///
    /// # Arguments
    /// * `columns` - エンティティ自身のカラム名
    /// * `translatable` - ロケールごとに保存される属性名（`columns` と重複してよい）
    #[must_use]
    pub fn new<C, T>(columns: C, translatable: T) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            id: None,
            columns: columns.into_iter().map(Into::into).collect(),
            translatable: translatable.into_iter().map(Into::into).collect(),
            attributes: AttributeMap::new(),
            saved: AttributeMap::new(),
            forced: BTreeSet::new(),
        }
    }

    /// `id` と `attributes` でストレージから読み込まれた状態にする
    #[must_use]
    pub fn loaded(mut self, id: EntityId, attributes: AttributeMap) -> Self {
        self.id = Some(id);
        self.saved = attributes.clone();
        self.attributes = attributes;
        self.forced.clear();
        self
    }
}

impl NativeEntity for MemoryEntity {
    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn reset_identity(&mut self) {
        self.id = None;
        self.saved.clear();
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    fn attribute_names(&self) -> Vec<String> {
        self.columns.clone()
    }

    fn read_attribute(&self, name: &str) -> Option<Value> {
        self.attributes.get(name).cloned()
    }

    fn write_attribute(&mut self, name: &str, value: Value) {
        self.attributes.insert(name.to_string(), value);
    }

    fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    fn attribute_will_change(&mut self, name: &str) {
        self.forced.insert(name.to_string());
    }

    fn is_changed(&self) -> bool {
        !self.forced.is_empty()
            || self.attributes.iter().any(|(name, value)| self.saved.get(name) != Some(value))
    }

    fn changes(&self) -> HashMap<String, AttributeChange> {
        let mut names: BTreeSet<&String> = self.forced.iter().collect();
        names.extend(
            self.attributes
                .iter()
                .filter(|(name, value)| self.saved.get(*name) != Some(*value))
                .map(|(name, _)| name),
        );

        names
            .into_iter()
            .map(|name| {
                let change = AttributeChange::new(
                    self.saved.get(name).cloned(),
                    self.attributes.get(name).cloned(),
                );
                (name.clone(), change)
            })
            .collect()
    }

    fn save(&mut self) -> Result<(), StoreError> {
        if self.id.is_none() {
            self.id = Some(NEXT_ID.fetch_add(1, Ordering::Relaxed));
        }
        self.saved = self.attributes.clone();
        self.forced.clear();
        tracing::debug!(id = ?self.id, "Saved entity");
        Ok(())
    }

    fn reload(&mut self) -> Result<(), StoreError> {
        if self.id.is_none() {
            return Err(StoreError::NotPersisted);
        }
        self.attributes = self.saved.clone();
        self.forced.clear();
        Ok(())
    }

    fn translatable_attribute_names(&self) -> &[String] {
        &self.translatable
    }
}
