use std::sync::Arc;

use aok::{OK, Void};
use log::info;
use tix_comm::ItemId;
use tix_mem::MemStore;
use tix_node::{Entry, Lattice, SortBy};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

fn lattice(shards: u32) -> Lattice {
  Lattice::new("t.", Arc::new(MemStore::new(shards)))
}

fn entry(id: u64, score: f64, date: u64) -> Entry {
  Entry {
    id: ItemId::new(id),
    score,
    date,
  }
}

#[test]
fn test_attach_detach_aligned() -> Void {
  let lat = lattice(1);
  let node = lat.node(vec!["a".into(), "b".into()], 1.0);

  assert!(!node.exists()?);
  assert_eq!(node.attach(&entry(1, 1.0, 100))?, 1);
  assert_eq!(node.attach(&entry(2, 2.0, 100))?, 2);
  // Re-attach is idempotent 重复附着幂等
  assert_eq!(node.attach(&entry(1, 1.0, 100))?, 2);

  assert!(node.exists()?);
  assert_eq!(node.item_count()?, 2);
  for sort in [SortBy::Score, SortBy::Date, SortBy::Overall] {
    assert_eq!(node.items_rev_range(sort, 0, -1)?.len(), 2);
  }

  node.detach(ItemId::new(1))?;
  assert_eq!(node.item_count()?, 1);
  for sort in [SortBy::Score, SortBy::Date, SortBy::Overall] {
    assert_eq!(node.items_rev_range(sort, 0, -1)?, [ItemId::new(2)]);
  }

  info!("attach detach ok");
  OK
}

#[test]
fn test_identity_ignores_tag_order() -> Void {
  let lat = lattice(4);

  lat
    .node(vec!["b".into(), "a".into()], 1.0)
    .attach(&entry(7, 1.0, 100))?;
  let same = lat.node(vec!["a".into(), "b".into()], 1.0);
  assert_eq!(same.items()?, [ItemId::new(7)]);
  OK
}

#[test]
fn test_rev_range_orders() -> Void {
  let lat = lattice(1);
  let node = lat.single("a", 1.0);

  node.attach(&entry(1, 3.0, 100))?;
  node.attach(&entry(2, 2.0, 300))?;
  node.attach(&entry(3, 1.0, 200))?;

  assert_eq!(
    node.items_rev_range(SortBy::Score, 0, -1)?,
    [ItemId::new(1), ItemId::new(2), ItemId::new(3)]
  );
  assert_eq!(
    node.items_rev_range(SortBy::Date, 0, -1)?,
    [ItemId::new(2), ItemId::new(3), ItemId::new(1)]
  );
  // Same date, overall follows score 日期相同时 overall 跟随分数
  let top = node.items_rev_range(SortBy::Overall, 0, 0)?;
  assert_eq!(top, [ItemId::new(1)]);

  info!("rev range ok");
  OK
}

#[test]
fn test_tags_score_weights_overall() -> Void {
  let lat = lattice(1);

  // Same item, same raw score, different node weight
  // 同一条目同一原始分，节点权重不同
  let heavy = lat.node(vec!["h".into()], 100.0);
  let light = lat.node(vec!["l".into()], 1.0);
  heavy.attach(&entry(1, 10.0, 100))?;
  heavy.attach(&entry(2, 2.0, 100))?;
  light.attach(&entry(1, 10.0, 100))?;
  light.attach(&entry(2, 2.0, 100))?;

  assert_eq!(
    heavy.items_rev_range(SortBy::Overall, 0, 0)?,
    [ItemId::new(1)]
  );
  assert_eq!(
    light.items_rev_range(SortBy::Overall, 0, 0)?,
    [ItemId::new(1)]
  );
  OK
}

#[test]
fn test_item_filter() -> Void {
  let lat = lattice(1);
  let node = lat.single("a", 1.0);
  node.attach(&entry(1, 1.0, 100))?;
  node.attach(&entry(3, 3.0, 100))?;

  let subset = [ItemId::new(3), ItemId::new(2), ItemId::new(1)];
  assert_eq!(node.item_filter(&subset)?, [ItemId::new(3), ItemId::new(1)]);
  assert!(node.item_filter(&[])?.is_empty());
  OK
}

#[test]
fn test_high_flag_monotonic() -> Void {
  let lat = lattice(2);
  let node = lat.node(vec!["a".into(), "b".into()], 1.0);

  assert!(!node.is_high()?);
  node.set_high()?;
  assert!(node.is_high()?);
  node.set_high()?;
  assert!(node.is_high()?);

  // Other nodes are untouched 其他节点不受影响
  assert!(!lat.single("a", 1.0).is_high()?);
  OK
}

#[test]
fn test_detach_deeper() -> Void {
  let lat = lattice(4);
  let item = entry(9, 1.0, 100);

  // Two high nodes carrying tag c, one unrelated 两个含 c 的高位节点，一个无关
  for tags in [vec!["a", "c"], vec!["b", "c"], vec!["a", "b"]] {
    let node = lat.node(tags.iter().map(|t| t.to_string()).collect(), 1.0);
    node.attach(&item)?;
    node.set_high()?;
  }

  lat.single("c", 1.0).detach_deeper(item.id)?;

  assert_eq!(lat.node(vec!["a".into(), "c".into()], 1.0).item_count()?, 0);
  assert_eq!(lat.node(vec!["b".into(), "c".into()], 1.0).item_count()?, 0);
  assert_eq!(lat.node(vec!["a".into(), "b".into()], 1.0).item_count()?, 1);

  info!("detach deeper ok");
  OK
}

#[test]
fn test_relative_and_suggest() -> Void {
  let lat = lattice(1);
  let node = lat.single("a", 1.0);

  node.set_relative_tags("x", 3)?;
  node.set_relative_tags("y", 9)?;
  node.set_relative_tags("z", 5)?;
  assert_eq!(node.relative_tags(2)?, ["y", "z"]);
  assert_eq!(node.relative_tags_count()?, 3);
  assert!(node.relative_tags(0)?.is_empty());

  node.add_random_suggest_tags(&["p".into(), "q".into()])?;
  node.add_random_suggest_tags(&[])?;
  let sample = node.random_suggest_tags(10)?;
  assert_eq!(sample.len(), 2);
  OK
}

#[test]
fn test_item_tag_record() -> Void {
  let lat = lattice(4);
  let id = ItemId::new(42);

  assert!(lat.item_tags(id)?.is_empty());

  lat.put_item_tags(
    id,
    &[
      ("a".to_string(), String::new()),
      ("b".to_string(), "c|d".to_string()),
    ],
  )?;
  let mut pairs = lat.item_tags(id)?;
  pairs.sort();
  assert_eq!(
    pairs,
    [
      ("a".to_string(), String::new()),
      ("b".to_string(), "c|d".to_string()),
    ]
  );

  // Overwrite replaces wholesale 覆盖即整体替换
  lat.put_item_tags(id, &[("e".to_string(), String::new())])?;
  assert_eq!(lat.item_tags(id)?, [("e".to_string(), String::new())]);

  lat.put_item_tags(id, &[])?;
  assert!(lat.item_tags(id)?.is_empty());
  OK
}
