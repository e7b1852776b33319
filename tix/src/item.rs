//! What the host feeds into the index 宿主喂给索引的内容

use std::sync::Arc;

use tix_comm::ItemId;

/// One indexable item 一个可索引条目
pub trait Item {
  /// Stable identifier 稳定标识
  fn id(&self) -> ItemId;

  /// Basic score 基础分数
  fn score(&self) -> f64;

  /// Creation time, seconds since epoch 创建时间，纪元秒
  fn create_date(&self) -> u64;

  /// Owning user id, 0 means unowned 归属用户 id，0 表示无归属
  fn owner_id(&self) -> u64;

  /// Tags and optional parallel weights, missing weights default to 1.0
  /// 标签与可选的平行权重，缺省权重为 1.0
  fn tags_with_score(&self) -> (Vec<String>, Option<Vec<f64>>);
}

/// Item loader, must be thread-safe 条目加载回调，须线程安全
///
/// `None` means the item no longer exists. `None` 表示条目已不存在。
pub type ItemLoad = Arc<dyn Fn(ItemId) -> Option<Arc<dyn Item>> + Send + Sync>;

/// Called with the tags of a node when it turns high
/// 节点升为高位时以其标签调用
pub type HighNotify = Arc<dyn Fn(&[String]) + Send + Sync>;
