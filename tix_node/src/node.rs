//! Primitive operations on one node 单节点原语操作
//!
//! Every operation pipelines a small command batch against the node's
//! shard and drains the replies in order.
//! 每个操作对节点所在分片发送一小批流水线命令并按序取应答。

use log::debug;
use tix_comm::{
  ItemId, KEY_BASE_SET, KEY_DATE_RANK, KEY_OVERALL_RANK, KEY_RAND_SUGGEST, KEY_RELATIVE_RANK,
  KEY_SCORE_RANK, ShardId, fade,
};
use tix_store::{Cmd, StoreError, StoreResult};

use crate::{Entry, Lattice, SortBy};

const RANKS: [&str; 3] = [KEY_SCORE_RANK, KEY_DATE_RANK, KEY_OVERALL_RANK];

pub struct Node<'a> {
  lat: &'a Lattice,
  tags: Vec<String>,
  joined: String,
  shard: ShardId,
  /// Weight multiplier carried in memory only, never persisted
  /// 仅存在内存中的权重乘数，不落存储
  tags_score: f64,
}

impl<'a> Node<'a> {
  pub(crate) fn new(
    lat: &'a Lattice,
    tags: Vec<String>,
    joined: String,
    shard: ShardId,
    tags_score: f64,
  ) -> Self {
    Self {
      lat,
      tags,
      joined,
      shard,
      tags_score,
    }
  }

  #[inline]
  pub fn tags(&self) -> &[String] {
    &self.tags
  }

  #[inline]
  pub fn tags_score(&self) -> f64 {
    self.tags_score
  }

  #[inline]
  fn key(&self, kind: &str) -> String {
    self.lat.kind_key(kind, &self.joined)
  }

  /// Insert the item into all parallel collections, returning the member
  /// count afterwards 把条目插入所有平行集合并返回之后的成员数
  pub fn attach(&self, e: &Entry) -> StoreResult<u64> {
    let id = e.id.to_string();
    let mut conn = self.lat.store().write(self.shard);
    conn.send(Cmd::SAdd {
      key: self.key(KEY_BASE_SET),
      members: vec![id.clone()],
    });
    conn.send(Cmd::ZAdd {
      key: self.key(KEY_SCORE_RANK),
      score: e.score,
      member: id.clone(),
    });
    conn.send(Cmd::ZAdd {
      key: self.key(KEY_DATE_RANK),
      score: e.date as f64,
      member: id.clone(),
    });
    conn.send(Cmd::ZAdd {
      key: self.key(KEY_OVERALL_RANK),
      score: fade(e.score * self.tags_score, e.date),
      member: id,
    });
    conn.send(Cmd::SCard {
      key: self.key(KEY_BASE_SET),
    });
    conn.flush()?;
    for _ in 0..4 {
      conn.recv()?.int()?;
    }
    Ok(conn.recv()?.int()? as u64)
  }

  /// Remove the item from all parallel collections
  /// 从所有平行集合移除条目
  pub fn detach(&self, id: ItemId) -> StoreResult<()> {
    let member = id.to_string();
    let mut conn = self.lat.store().write(self.shard);
    conn.send(Cmd::SRem {
      key: self.key(KEY_BASE_SET),
      members: vec![member.clone()],
    });
    for rank in RANKS {
      conn.send(Cmd::ZRem {
        key: self.key(rank),
        member: member.clone(),
      });
    }
    conn.flush()?;
    for _ in 0..4 {
      conn.recv()?.int()?;
    }
    Ok(())
  }

  /// Detach the item from every high node containing this node's tags
  /// 从所有包含本节点标签的高位节点移除条目
  ///
  /// The glob is a sufficient filter, not an exact one: an identity whose
  /// text happens to contain the tags in order also matches. Removing a
  /// non-member is a no-op, so over-matching costs work, not correctness.
  /// 通配是充分而非精确的过滤：恰好按序包含这些标签文本的标识也会命中。
  /// 移除非成员是空操作，过匹配只多做功，不损正确性。
  pub fn detach_deeper(&self, id: ItemId) -> StoreResult<()> {
    let mut pattern = String::from("*");
    for tag in &self.tags {
      pattern.push_str(tag);
      pattern.push('*');
    }
    let member = id.to_string();
    let shards = self.lat.store().shards();

    // One subtask per shard, joined before returning
    // 每分片一个子任务，返回前汇合
    std::thread::scope(|s| {
      let handles: Vec<_> = (0..shards)
        .map(|n| {
          let pattern = pattern.as_str();
          let member = member.as_str();
          s.spawn(move || self.detach_deeper_shard(ShardId(n), pattern, member))
        })
        .collect();
      for h in handles {
        h.join()
          .map_err(|_| StoreError::protocol("detach_deeper subtask panicked"))??;
      }
      Ok(())
    })
  }

  fn detach_deeper_shard(&self, shard: ShardId, pattern: &str, member: &str) -> StoreResult<()> {
    let high_key = self.lat.high_key();
    let mut matches = Vec::new();
    let mut cursor = 0;
    {
      let mut conn = self.lat.store().read(shard);
      loop {
        let (next, items) = conn
          .exec(Cmd::SScan {
            key: high_key.clone(),
            cursor,
            pattern: pattern.to_string(),
          })?
          .scan()?;
        matches.extend(items);
        if next == 0 {
          break;
        }
        cursor = next;
      }
    }
    if matches.is_empty() {
      return Ok(());
    }
    debug!(
      "detach_deeper shard {} pattern {pattern}: {} nodes",
      shard.0,
      matches.len()
    );

    let mut conn = self.lat.store().write(shard);
    for joined in &matches {
      conn.send(Cmd::SRem {
        key: self.lat.kind_key(KEY_BASE_SET, joined),
        members: vec![member.to_string()],
      });
      for rank in RANKS {
        conn.send(Cmd::ZRem {
          key: self.lat.kind_key(rank, joined),
          member: member.to_string(),
        });
      }
    }
    conn.flush()?;
    for _ in 0..matches.len() * 4 {
      conn.recv()?.int()?;
    }
    Ok(())
  }

  /// Does the member set exist 成员集合是否存在
  pub fn exists(&self) -> StoreResult<bool> {
    Ok(
      self
        .lat
        .store()
        .read(self.shard)
        .exec(Cmd::Exists {
          key: self.key(KEY_BASE_SET),
        })?
        .int()?
        == 1,
    )
  }

  /// Member count 成员数量
  pub fn item_count(&self) -> StoreResult<u64> {
    Ok(
      self
        .lat
        .store()
        .read(self.shard)
        .exec(Cmd::SCard {
          key: self.key(KEY_BASE_SET),
        })?
        .int()? as u64,
    )
  }

  /// All members, unordered 全部成员，无序
  pub fn items(&self) -> StoreResult<Vec<ItemId>> {
    let members = self
      .lat
      .store()
      .read(self.shard)
      .exec(Cmd::SMembers {
        key: self.key(KEY_BASE_SET),
      })?
      .items()?;
    parse_ids(members)
  }

  /// `subset ∩ base`, preserving subset order 与成员集求交，保持子集顺序
  pub fn item_filter(&self, subset: &[ItemId]) -> StoreResult<Vec<ItemId>> {
    if subset.is_empty() {
      return Ok(Vec::new());
    }
    let key = self.key(KEY_BASE_SET);
    let mut conn = self.lat.store().read(self.shard);
    for id in subset {
      conn.send(Cmd::SIsMember {
        key: key.clone(),
        member: id.to_string(),
      });
    }
    conn.flush()?;
    let mut out = Vec::new();
    for id in subset {
      if conn.recv()?.int()? == 1 {
        out.push(*id);
      }
    }
    Ok(out)
  }

  /// Descending `[start, stop]` of one rank 某排序的降序闭区间
  pub fn items_rev_range(&self, sort: SortBy, start: i64, stop: i64) -> StoreResult<Vec<ItemId>> {
    let members = self
      .lat
      .store()
      .read(self.shard)
      .exec(Cmd::ZRevRange {
        key: self.key(sort.rank_prefix()),
        start,
        stop,
      })?
      .items()?;
    parse_ids(members)
  }

  /// Record a co-occurring tag's popularity 记录共现标签的热度
  pub fn set_relative_tags(&self, tag: &str, n: u64) -> StoreResult<()> {
    self
      .lat
      .store()
      .write(self.shard)
      .exec(Cmd::ZAdd {
        key: self.key(KEY_RELATIVE_RANK),
        score: n as f64,
        member: tag.to_string(),
      })?
      .int()?;
    Ok(())
  }

  /// Top co-occurring tags 最热共现标签
  pub fn relative_tags(&self, count: u64) -> StoreResult<Vec<String>> {
    if count == 0 {
      return Ok(Vec::new());
    }
    self
      .lat
      .store()
      .read(self.shard)
      .exec(Cmd::ZRevRange {
        key: self.key(KEY_RELATIVE_RANK),
        start: 0,
        stop: count as i64 - 1,
      })?
      .items()
  }

  /// How many co-occurring tags are recorded 记录的共现标签数量
  pub fn relative_tags_count(&self) -> StoreResult<u64> {
    Ok(
      self
        .lat
        .store()
        .read(self.shard)
        .exec(Cmd::ZCard {
          key: self.key(KEY_RELATIVE_RANK),
        })?
        .int()? as u64,
    )
  }

  /// Extend the suggestion sample 扩充建议样本
  pub fn add_random_suggest_tags(&self, tags: &[String]) -> StoreResult<()> {
    if tags.is_empty() {
      return Ok(());
    }
    self
      .lat
      .store()
      .write(self.shard)
      .exec(Cmd::SAdd {
        key: self.key(KEY_RAND_SUGGEST),
        members: tags.to_vec(),
      })?
      .int()?;
    Ok(())
  }

  /// Sample the suggestion set 抽样建议集合
  pub fn random_suggest_tags(&self, count: u64) -> StoreResult<Vec<String>> {
    self
      .lat
      .store()
      .read(self.shard)
      .exec(Cmd::SRandMember {
        key: self.key(KEY_RAND_SUGGEST),
        count,
      })?
      .items()
  }

  /// Mark high, never unmarked 标记为高位，只升不降
  pub fn set_high(&self) -> StoreResult<()> {
    self
      .lat
      .store()
      .write(self.shard)
      .exec(Cmd::SAdd {
        key: self.lat.high_key(),
        members: vec![self.joined.clone()],
      })?
      .int()?;
    Ok(())
  }

  pub fn is_high(&self) -> StoreResult<bool> {
    Ok(
      self
        .lat
        .store()
        .read(self.shard)
        .exec(Cmd::SIsMember {
          key: self.lat.high_key(),
          member: self.joined.clone(),
        })?
        .int()?
        == 1,
    )
  }
}

fn parse_ids(members: Vec<String>) -> StoreResult<Vec<ItemId>> {
  members
    .into_iter()
    .map(|m| {
      ItemId::parse(&m).ok_or_else(|| StoreError::protocol(format!("bad item id: {m}")))
    })
    .collect()
}
