//! Query planner 查询规划
//!
//! Exact-node reads when the combination was materialized, otherwise a
//! degraded intersection over single-tag nodes.
//! 组合已物化时直接读取精确节点，否则在单标签节点上做降级求交。

use log::{debug, warn};
use tix_comm::ItemId;
use tix_node::SortBy;
use tix_store::StoreResult;

use crate::index::Inner;

pub(crate) fn query(
  inner: &Inner,
  tags: &[String],
  start: i64,
  stop: i64,
  sort: SortBy,
) -> Vec<ItemId> {
  let tags = inner.rule.apply_for_searching(tags);
  if tags.is_empty() {
    return Vec::new();
  }
  match ranged(inner, tags, start, stop, sort) {
    Ok(ids) => ids,
    Err(e) => {
      // Read failures look like no results 读取失败表现为无结果
      warn!("query failed: {e}");
      Vec::new()
    }
  }
}

fn ranged(
  inner: &Inner,
  tags: Vec<String>,
  start: i64,
  stop: i64,
  sort: SortBy,
) -> StoreResult<Vec<ItemId>> {
  let exact = inner.lat.node(tags.clone(), 1.0);
  if exact.exists()? {
    return exact.items_rev_range(sort, start, stop);
  }

  // Degraded: range the rarest tag, then intersect the rest. The order
  // is the rarest single-tag node's order, not the joint order.
  // 降级：对最稀有标签取区间，再与其余标签求交。
  // 顺序是最稀有单标签节点的顺序，而非联合顺序。
  debug!("no node for {tags:?}, degraded search");
  let mut rarest: Option<(u64, &String)> = None;
  for tag in &tags {
    let count = inner.lat.single(tag.clone(), 1.0).item_count()?;
    if count == 0 {
      return Ok(Vec::new());
    }
    if rarest.is_none_or(|(c, _)| count < c) {
      rarest = Some((count, tag));
    }
  }
  let Some((_, rarest)) = rarest else {
    return Ok(Vec::new());
  };

  let mut candidates = inner
    .lat
    .single(rarest.clone(), 1.0)
    .items_rev_range(sort, start, stop)?;
  for tag in &tags {
    if tag == rarest {
      continue;
    }
    if candidates.is_empty() {
      break;
    }
    candidates = inner.lat.single(tag.clone(), 1.0).item_filter(&candidates)?;
  }
  Ok(candidates)
}

pub(crate) fn item_count(inner: &Inner, tags: &[String]) -> u64 {
  let tags = inner.rule.apply_for_searching(tags);
  if tags.is_empty() {
    return 0;
  }
  match inner.lat.node(tags, 1.0).item_count() {
    Ok(n) => n,
    Err(e) => {
      warn!("item_count failed: {e}");
      0
    }
  }
}

pub(crate) fn relative_tags(inner: &Inner, tags: &[String], count: u64) -> Vec<String> {
  let tags = inner.rule.apply_for_searching(tags);
  if tags.is_empty() {
    return Vec::new();
  }
  match inner.lat.node(tags, 1.0).relative_tags(count) {
    Ok(li) => li,
    Err(e) => {
      warn!("relative_tags failed: {e}");
      Vec::new()
    }
  }
}

pub(crate) fn relative_tags_count(inner: &Inner, tags: &[String]) -> u64 {
  let tags = inner.rule.apply_for_searching(tags);
  if tags.is_empty() {
    return 0;
  }
  match inner.lat.node(tags, 1.0).relative_tags_count() {
    Ok(n) => n,
    Err(e) => {
      warn!("relative_tags_count failed: {e}");
      0
    }
  }
}

pub(crate) fn random_suggest_tags(inner: &Inner, tags: &[String], count: u64) -> Vec<String> {
  let tags = inner.rule.apply_for_searching(tags);
  if tags.is_empty() {
    return Vec::new();
  }
  match inner.lat.node(tags, 1.0).random_suggest_tags(count) {
    Ok(li) => li,
    Err(e) => {
      warn!("random_suggest_tags failed: {e}");
      Vec::new()
    }
  }
}
