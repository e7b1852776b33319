//! Node lattice context 节点格上下文
//!
//! Owns the keyspace label and the store handle, hands out nodes and the
//! per-item tag record.
//! 持有键空间标签与存储句柄，提供节点与条目标签记录的访问。

use std::sync::Arc;

use tix_comm::{ItemId, KEY_HIGH_TAGS, KEY_ITEM_TAG_HASH, TAG_SEP, shard_of};
use tix_store::{Cmd, Store, StoreResult};

use crate::Node;

pub struct Lattice {
  what: String,
  store: Arc<dyn Store>,
}

impl Lattice {
  pub fn new(what: impl Into<String>, store: Arc<dyn Store>) -> Self {
    Self {
      what: what.into(),
      store,
    }
  }

  #[inline]
  pub fn what(&self) -> &str {
    &self.what
  }

  #[inline]
  pub fn store(&self) -> &Arc<dyn Store> {
    &self.store
  }

  /// Node for a tag combination 标签组合对应的节点
  ///
  /// Tags are sorted here so query order never changes identity.
  /// 标签在此排序，查询顺序不会改变标识。
  pub fn node(&self, mut tags: Vec<String>, tags_score: f64) -> Node<'_> {
    tags.sort();
    let joined = tags.join(TAG_SEP);
    let shard = shard_of(&format!("{}{}", self.what, joined), self.store.shards());
    Node::new(self, tags, joined, shard, tags_score)
  }

  /// Single-tag node 单标签节点
  #[inline]
  pub fn single(&self, tag: impl Into<String>, tags_score: f64) -> Node<'_> {
    self.node(vec![tag.into()], tags_score)
  }

  /// Key of one kind for a joined identity 某类键名
  #[inline]
  pub(crate) fn kind_key(&self, kind: &str, joined: &str) -> String {
    format!("{}{}{}", self.what, kind, joined)
  }

  /// Per-shard high identity set key 每分片高位标识集合键
  #[inline]
  pub(crate) fn high_key(&self) -> String {
    format!("{}{}", self.what, KEY_HIGH_TAGS)
  }

  fn item_tag_key(&self, id: ItemId) -> (tix_comm::ShardId, String) {
    let key = format!("{}{}{}", self.what, KEY_ITEM_TAG_HASH, id);
    let shard = shard_of(&key, self.store.shards());
    (shard, key)
  }

  /// Last indexed tag record of an item 条目最近一次索引的标签记录
  ///
  /// Field is the canonical title, value its separator-joined aliases.
  /// 字段为规范标题，值为分隔符连接的别名。
  pub fn item_tags(&self, id: ItemId) -> StoreResult<Vec<(String, String)>> {
    let (shard, key) = self.item_tag_key(id);
    self.store.read(shard).exec(Cmd::HGetAll { key })?.pairs()
  }

  /// Overwrite the tag record 覆盖标签记录
  pub fn put_item_tags(&self, id: ItemId, pairs: &[(String, String)]) -> StoreResult<()> {
    let (shard, key) = self.item_tag_key(id);
    let mut conn = self.store.write(shard);
    conn.send(Cmd::Del { key: key.clone() });
    for (field, value) in pairs {
      conn.send(Cmd::HSet {
        key: key.clone(),
        field: field.clone(),
        value: value.clone(),
      });
    }
    conn.flush()?;
    for _ in 0..=pairs.len() {
      conn.recv()?.int()?;
    }
    Ok(())
  }
}
