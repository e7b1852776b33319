use aok::{OK, Void};
use log::info;
use tix_comm::{ItemId, confidence, fade, shard_of};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

#[test]
fn test_shard_deterministic() -> Void {
  let a = shard_of("blog.A|B", 16);
  let b = shard_of("blog.A|B", 16);
  assert_eq!(a, b);
  assert!(a.0 < 16);

  // Single shard always routes to 0 单分片总是路由到 0
  assert_eq!(shard_of("anything", 1).0, 0);
  assert_eq!(shard_of("anything", 0).0, 0);

  info!("shard ok");
  OK
}

#[test]
fn test_fade_orders_by_score_at_equal_date() -> Void {
  let f1 = fade(1.0, 100);
  let f2 = fade(2.0, 100);
  let f3 = fade(3.0, 100);
  assert!(f1 < f2 && f2 < f3);

  // |score| below 1 collapses to the date term 绝对值小于 1 时只剩时间项
  assert_eq!(fade(0.5, 100), fade(1.0, 100));

  // Negative scores mirror 负分数成镜像
  let date = 1388465200;
  assert!(fade(-10.0, date) < fade(0.0, date));
  assert_eq!(fade(0.0, date), (date - 1288465200) as f64 / (45000 * 2 * 30) as f64);

  info!("fade ok");
  OK
}

#[test]
fn test_fade_date_term() -> Void {
  let base = 1288465200u64;
  let day = 86400u64;
  // A day is just under one unit 一天略小于一个单位
  let delta = fade(1.0, base + day) - fade(1.0, base);
  assert!(delta > 0.0 && delta < 1.0);
  // A score decade equals 2.7e6 seconds 分数一个数量级等于 2.7e6 秒
  assert!((fade(10.0, base) - fade(1.0, base) - 1.0).abs() < 1e-12);

  info!("fade date ok");
  OK
}

#[test]
fn test_confidence() -> Void {
  assert_eq!(confidence(0, 0), 0.0);
  let lo = confidence(1, 0);
  let hi = confidence(100, 0);
  // More votes, more confidence 票越多置信越高
  assert!(hi > lo);
  assert!(hi < 1.0);
  assert!(confidence(50, 50) < confidence(99, 1));

  info!("confidence ok");
  OK
}

#[test]
fn test_item_id_parse() -> Void {
  assert_eq!(ItemId::parse("42"), Some(ItemId::new(42)));
  assert_eq!(ItemId::parse("x"), None);
  assert_eq!(ItemId::new(7).to_string(), "7");
  OK
}
