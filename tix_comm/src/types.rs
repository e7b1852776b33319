//! Core type system 核心类型系统
//! NewType pattern prevents primitive type misuse NewType 模式防止原生类型混用

use std::fmt;

/// 64-bit item identifier 64 位条目标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
  #[inline]
  pub const fn new(id: u64) -> Self {
    Self(id)
  }

  /// Parse from the decimal form stored as a set member
  /// 从集合成员存储的十进制形式解析
  #[inline]
  pub fn parse(s: &str) -> Option<Self> {
    s.parse().ok().map(Self)
  }
}

impl fmt::Display for ItemId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Shard number inside the backing store 存储中的分片号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ShardId(pub u32);

impl ShardId {
  #[inline]
  pub const fn new(id: u32) -> Self {
    Self(id)
  }
}
