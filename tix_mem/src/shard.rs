//! Single shard state and command execution 单分片状态与命令执行

use std::collections::{HashMap, HashSet};

use tix_store::{Cmd, Reply};

use crate::glob_match;

/// One shard's keyspace 一个分片的键空间
///
/// Namespaces mirror the server: sets, sorted sets, hashes. A key that
/// becomes empty is deleted, so `EXISTS` matches server behavior.
/// 命名空间与服务端一致：集合、有序集合、哈希。键空了即删除，
/// 使 `EXISTS` 行为与服务端一致。
#[derive(Default)]
pub struct Shard {
  sets: HashMap<String, HashSet<String>>,
  zsets: HashMap<String, HashMap<String, f64>>,
  hashes: HashMap<String, HashMap<String, String>>,
}

impl Shard {
  pub fn exec(&mut self, cmd: Cmd) -> Reply {
    match cmd {
      Cmd::SAdd { key, members } => {
        let set = self.sets.entry(key).or_default();
        let mut added = 0;
        for m in members {
          if set.insert(m) {
            added += 1;
          }
        }
        Reply::Int(added)
      }
      Cmd::SRem { key, members } => {
        let mut removed = 0;
        if let Some(set) = self.sets.get_mut(&key) {
          for m in &members {
            if set.remove(m) {
              removed += 1;
            }
          }
          if set.is_empty() {
            self.sets.remove(&key);
          }
        }
        Reply::Int(removed)
      }
      Cmd::SMembers { key } => Reply::Items(
        self
          .sets
          .get(&key)
          .map(|s| s.iter().cloned().collect())
          .unwrap_or_default(),
      ),
      Cmd::SCard { key } => Reply::Int(self.sets.get(&key).map_or(0, |s| s.len() as i64)),
      Cmd::SIsMember { key, member } => {
        Reply::Int(self.sets.get(&key).is_some_and(|s| s.contains(&member)) as i64)
      }
      Cmd::SRandMember { key, count } => Reply::Items(
        self
          .sets
          .get(&key)
          .map(|s| s.iter().take(count as usize).cloned().collect())
          .unwrap_or_default(),
      ),
      Cmd::SScan { key, pattern, .. } => {
        // Whole set in one pass, the final cursor is always 0
        // 一次遍历整个集合，结束游标恒为 0
        let items = self
          .sets
          .get(&key)
          .map(|s| {
            s.iter()
              .filter(|m| glob_match(&pattern, m))
              .cloned()
              .collect()
          })
          .unwrap_or_default();
        Reply::Scan { cursor: 0, items }
      }
      Cmd::ZAdd { key, score, member } => {
        let fresh = self.zsets.entry(key).or_default().insert(member, score);
        Reply::Int(fresh.is_none() as i64)
      }
      Cmd::ZRem { key, member } => {
        let mut removed = 0;
        if let Some(zset) = self.zsets.get_mut(&key) {
          if zset.remove(&member).is_some() {
            removed = 1;
          }
          if zset.is_empty() {
            self.zsets.remove(&key);
          }
        }
        Reply::Int(removed)
      }
      Cmd::ZCard { key } => Reply::Int(self.zsets.get(&key).map_or(0, |z| z.len() as i64)),
      Cmd::ZRevRange { key, start, stop } => {
        let Some(zset) = self.zsets.get(&key) else {
          return Reply::Items(Vec::new());
        };
        let mut li: Vec<(&f64, &String)> = zset.iter().map(|(m, s)| (s, m)).collect();
        // Descending score, equal scores tie-broken by reverse-lex member
        // 分数降序，同分按成员字典序倒排
        li.sort_by(|a, b| b.0.total_cmp(a.0).then_with(|| b.1.cmp(a.1)));
        Reply::Items(match rev_range(li.len(), start, stop) {
          Some((a, b)) => li[a..=b].iter().map(|(_, m)| (*m).clone()).collect(),
          None => Vec::new(),
        })
      }
      Cmd::HSet { key, field, value } => {
        let fresh = self.hashes.entry(key).or_default().insert(field, value);
        Reply::Int(fresh.is_none() as i64)
      }
      Cmd::HGetAll { key } => Reply::Pairs(
        self
          .hashes
          .get(&key)
          .map(|h| h.iter().map(|(f, v)| (f.clone(), v.clone())).collect())
          .unwrap_or_default(),
      ),
      Cmd::Del { key } => {
        let hit = self.sets.remove(&key).is_some()
          | self.zsets.remove(&key).is_some()
          | self.hashes.remove(&key).is_some();
        Reply::Int(hit as i64)
      }
      Cmd::Exists { key } => {
        let hit = self.sets.contains_key(&key)
          || self.zsets.contains_key(&key)
          || self.hashes.contains_key(&key);
        Reply::Int(hit as i64)
      }
    }
  }
}

/// Normalize an inclusive `[start, stop]` pair against `len`
/// 将闭区间 `[start, stop]` 按 `len` 归一化
///
/// Negative indices count from the end, out-of-range clamps, inverted or
/// fully out-of-range pairs yield nothing.
/// 负索引从尾部数，越界钳制，倒置或完全越界返回空。
fn rev_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
  let n = len as i64;
  if n == 0 {
    return None;
  }
  let mut a = if start < 0 { n + start } else { start };
  let mut b = if stop < 0 { n + stop } else { stop };
  if a < 0 {
    a = 0;
  }
  if b >= n {
    b = n - 1;
  }
  if a > b || a >= n || b < 0 {
    return None;
  }
  Some((a as usize, b as usize))
}

#[cfg(test)]
mod tests {
  use super::rev_range;

  #[test]
  fn rev_range_bounds() {
    assert_eq!(rev_range(5, 0, 9), Some((0, 4)));
    assert_eq!(rev_range(5, 0, -1), Some((0, 4)));
    assert_eq!(rev_range(5, -2, -1), Some((3, 4)));
    assert_eq!(rev_range(5, 3, 2), None);
    assert_eq!(rev_range(5, 5, 9), None);
    assert_eq!(rev_range(0, 0, -1), None);
  }
}
