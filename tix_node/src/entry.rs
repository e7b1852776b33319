//! Node member entry and rank selection 节点成员与排序选择

use tix_comm::{
  ItemId, KEY_DATE_RANK, KEY_OVERALL_RANK, KEY_SCORE_RANK,
};

/// What a node stores about one item 节点为一个条目存储的内容
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
  pub id: ItemId,
  pub score: f64,
  pub date: u64,
}

/// Which rank a ranged read walks 区间读取所用的排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
  Score,
  Date,
  #[default]
  Overall,
}

impl SortBy {
  /// Stable external name 稳定的外部名称
  #[inline]
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Score => "score",
      Self::Date => "date",
      Self::Overall => "overall",
    }
  }

  #[inline]
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "score" => Some(Self::Score),
      "date" => Some(Self::Date),
      "overall" => Some(Self::Overall),
      _ => None,
    }
  }

  /// Key kind prefix of the rank 排序对应的键前缀
  #[inline]
  pub(crate) fn rank_prefix(&self) -> &'static str {
    match self {
      Self::Score => KEY_SCORE_RANK,
      Self::Date => KEY_DATE_RANK,
      Self::Overall => KEY_OVERALL_RANK,
    }
  }
}
