use aok::{OK, Void};
use log::info;
use tix_rule::{Rule, TagInfo};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

fn dummy_rule() -> Rule {
  serde_json::from_str(
    r#"{
      "normalization": {
        "美食": ["吃", "好吃"],
        "住宿": ["住"]
      },
      "entanglement": [
        ["住宿", "酒店", "旅馆"],
        ["骑行", "骑车", "自行车"],
        ["南锣", "南锣鼓巷"]
      ],
      "containing": {
        "美食": ["小吃", "甜点", "西餐"],
        "西餐": ["马卡龙", "牛排", "烤肉"],
        "烧烤": ["夜烧烤", "烤肉"],
        "徒搭": ["徒步", "搭车"]
      }
    }"#,
  )
  .expect("dummy rule json")
}

fn titles(infos: &[TagInfo]) -> Vec<&str> {
  infos.iter().map(|i| i.title.as_str()).collect()
}

#[test]
fn test_compile_containment_transitive() -> Void {
  let rule = dummy_rule().compile();

  // 烤肉 climbs through both 西餐 and 烧烤, then 美食
  // 烤肉经西餐与烧烤上溯，再到美食
  let infos = rule.apply_for_indexing(vec![TagInfo::new("烤肉", 1.0)]);
  assert_eq!(infos.len(), 1);
  let aliases = &infos[0].aliases;
  for up in ["西餐", "烧烤", "美食"] {
    assert!(aliases.iter().any(|a| a == up), "missing {up}");
  }
  assert_eq!(infos[0].alias_scores.len(), aliases.len());

  info!("containment transitive ok");
  OK
}

#[test]
fn test_compile_cycle_terminates() -> Void {
  let rule: Rule = serde_json::from_str(
    r#"{"containing": {"a": ["b"], "b": ["a"]}}"#,
  )?;
  let compiled = rule.compile();

  let infos = compiled.apply_for_indexing(vec![TagInfo::new("a", 1.0)]);
  // a's only ancestor is b, the cycle back to a is suppressed
  // a 的祖先只有 b，回到 a 的环被抑制
  assert_eq!(infos[0].aliases, vec!["b".to_string()]);
  OK
}

#[test]
fn test_normalization_rename_and_collide() -> Void {
  let rule = dummy_rule().compile();

  let infos = rule.apply_for_indexing(vec![TagInfo::new("吃", 1.0)]);
  assert_eq!(titles(&infos), ["美食"]);

  // Two surfaces of one canonical form collapse to one info
  // 同一规范形式的两个表面形式合并为一个
  let infos = rule.apply_for_indexing(vec![
    TagInfo::new("吃", 1.0),
    TagInfo::new("好吃", 0.5),
  ]);
  assert_eq!(titles(&infos), ["美食"]);
  assert_eq!(infos[0].score, 1.0);

  info!("normalization ok");
  OK
}

#[test]
fn test_child_subsumes_explicit_parent() -> Void {
  let rule = dummy_rule().compile();

  let infos = rule.apply_for_indexing(vec![
    TagInfo::new("小吃", 0.8),
    TagInfo::new("美食", 1.0),
  ]);
  // The child keeps 美食 as alias, the explicit parent is dropped
  // 子标签以别名携带美食，显式父标签被丢弃
  assert_eq!(titles(&infos), ["小吃"]);
  assert!(infos[0].aliases.iter().any(|a| a == "美食"));
  OK
}

#[test]
fn test_entanglement_group() -> Void {
  let rule = dummy_rule().compile();

  let infos = rule.apply_for_indexing(vec![TagInfo::new("骑行", 1.0)]);
  for tag in ["骑行", "骑车", "自行车"] {
    assert!(infos[0].aliases.iter().any(|a| a == tag), "missing {tag}");
  }
  assert_eq!(infos[0].alias_scores.len(), infos[0].aliases.len());

  // Normalization feeds entanglement: 住 -> 住宿 -> the whole group
  // 规范化先行：住 -> 住宿 -> 整组
  let infos = rule.apply_for_indexing(vec![TagInfo::new("住", 1.0)]);
  assert_eq!(titles(&infos), ["住宿"]);
  assert!(infos[0].aliases.iter().any(|a| a == "酒店"));
  OK
}

#[test]
fn test_apply_for_searching() -> Void {
  let rule = dummy_rule().compile();

  let tags = vec!["好吃".to_string(), "A".to_string(), "吃".to_string()];
  assert_eq!(rule.apply_for_searching(&tags), ["A", "美食"]);

  // Unknown tags pass through 未知标签原样通过
  assert_eq!(
    rule.apply_for_searching(&["z".to_string(), "a".to_string()]),
    ["a", "z"]
  );
  assert!(rule.apply_for_searching(&[]).is_empty());
  OK
}

#[test]
fn test_synthetic_info() -> Void {
  let info = TagInfo::synthetic("belongs_to:7");
  assert!(!info.enable_relative);
  assert_eq!(info.score, 1.0);
  OK
}
