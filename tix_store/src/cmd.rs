//! Command / reply model 命令与应答模型
//!
//! The subset of set / sorted set / hash commands the index relies on.
//! 索引依赖的集合 / 有序集合 / 哈希命令子集。

use crate::{StoreError, StoreResult};

/// One pipelined command 一条流水线命令
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
  SAdd { key: String, members: Vec<String> },
  SRem { key: String, members: Vec<String> },
  SMembers { key: String },
  SCard { key: String },
  SIsMember { key: String, member: String },
  SRandMember { key: String, count: u64 },
  /// Cursor scan with a `*` glob 游标扫描，支持 `*` 通配
  SScan {
    key: String,
    cursor: u64,
    pattern: String,
  },
  ZAdd { key: String, score: f64, member: String },
  ZRem { key: String, member: String },
  ZCard { key: String },
  /// Inclusive descending range, negative indices count from the end
  /// 闭区间降序范围，负索引从尾部数
  ZRevRange { key: String, start: i64, stop: i64 },
  HSet {
    key: String,
    field: String,
    value: String,
  },
  HGetAll { key: String },
  Del { key: String },
  Exists { key: String },
}

/// Reply to one command 一条命令的应答
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
  Int(i64),
  Items(Vec<String>),
  Pairs(Vec<(String, String)>),
  Scan { cursor: u64, items: Vec<String> },
}

impl Reply {
  #[inline]
  fn kind(&self) -> &'static str {
    match self {
      Self::Int(_) => "int",
      Self::Items(_) => "items",
      Self::Pairs(_) => "pairs",
      Self::Scan { .. } => "scan",
    }
  }

  /// Integer reply 整数应答
  #[inline]
  pub fn int(self) -> StoreResult<i64> {
    match self {
      Self::Int(n) => Ok(n),
      other => Err(wrong("int", &other)),
    }
  }

  /// Member list reply 成员列表应答
  #[inline]
  pub fn items(self) -> StoreResult<Vec<String>> {
    match self {
      Self::Items(li) => Ok(li),
      other => Err(wrong("items", &other)),
    }
  }

  /// Field-value pairs reply 字段值对应答
  #[inline]
  pub fn pairs(self) -> StoreResult<Vec<(String, String)>> {
    match self {
      Self::Pairs(li) => Ok(li),
      other => Err(wrong("pairs", &other)),
    }
  }

  /// Scan page reply 扫描分页应答
  #[inline]
  pub fn scan(self) -> StoreResult<(u64, Vec<String>)> {
    match self {
      Self::Scan { cursor, items } => Ok((cursor, items)),
      other => Err(wrong("scan", &other)),
    }
  }
}

fn wrong(expect: &'static str, got: &Reply) -> StoreError {
  StoreError::WrongReply {
    expect,
    got: got.kind(),
  }
}
