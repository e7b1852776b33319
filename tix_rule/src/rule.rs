//! Rule compilation and application 规则编译与应用

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::TagInfo;

/// Declarative rule set, immutable after compile
/// 声明式规则集，编译后不可变
///
/// It's normal to decode this from JSON. 通常由 JSON 解码生成。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Rule {
  /// canonical form -> surface forms 规范形式 -> 表面形式
  pub normalization: HashMap<String, Vec<String>>,
  /// Groups whose members imply each other 成员互相蕴含的标签组
  pub entanglement: Vec<Vec<String>>,
  /// parent -> children 父标签 -> 子标签
  pub containing: HashMap<String, Vec<String>>,
}

impl Rule {
  /// Compile to the lookup form 编译为查询形式
  pub fn compile(&self) -> CompiledRule {
    // Reverse the map 反转映射
    let mut norm = HashMap::new();
    for (canonical, surfaces) in &self.normalization {
      for surface in surfaces {
        norm.insert(surface.clone(), canonical.clone());
      }
    }

    // Every member points at the whole group 每个成员指向整组
    let mut entangle = HashMap::new();
    for group in &self.entanglement {
      for tag in group {
        entangle.insert(tag.clone(), group.clone());
      }
    }

    // Reverse, then expand each child to its transitive ancestors
    // 反转后把每个子标签扩展为其传递祖先
    let mut direct: HashMap<&str, Vec<&str>> = HashMap::new();
    for (parent, children) in &self.containing {
      for child in children {
        direct.entry(child.as_str()).or_default().push(parent.as_str());
      }
    }
    let mut contain = HashMap::new();
    for &child in direct.keys() {
      contain.insert(child.to_string(), expand(child, &direct));
    }

    CompiledRule {
      norm,
      entangle,
      contain,
    }
  }
}

/// Breadth-first ancestor walk with duplicate suppression; cycles in user
/// input stop expanding at the first repeat.
/// 广度优先祖先遍历并抑制重复；用户输入中的环在首次重复处停止扩展。
fn expand(child: &str, direct: &HashMap<&str, Vec<&str>>) -> Vec<String> {
  let mut seen = HashSet::new();
  let mut out = Vec::new();
  let mut queue: VecDeque<&str> = direct.get(child).map(|v| v.iter().copied().collect()).unwrap_or_default();

  while let Some(tag) = queue.pop_front() {
    if tag == child || !seen.insert(tag) {
      continue;
    }
    out.push(tag.to_string());
    if let Some(uppers) = direct.get(tag) {
      queue.extend(uppers.iter().copied());
    }
  }
  out
}

/// Compiled rule 编译后的规则
#[derive(Debug, Clone, Default)]
pub struct CompiledRule {
  /// surface -> canonical 表面形式 -> 规范形式
  norm: HashMap<String, String>,
  /// tag -> whole group 标签 -> 整组
  entangle: HashMap<String, Vec<String>>,
  /// child -> transitive ancestors 子标签 -> 传递祖先
  contain: HashMap<String, Vec<String>>,
}

impl CompiledRule {
  /// Rewrite an item's tag list for indexing 为索引改写条目的标签列表
  ///
  /// Pass order is contractual: normalization, containment, entanglement,
  /// then drop disabled infos.
  /// 处理顺序是契约：规范化、包含、纠缠，最后丢弃被禁用的标签。
  pub fn apply_for_indexing(&self, mut infos: Vec<TagInfo>) -> Vec<TagInfo> {
    let mut disabled = vec![false; infos.len()];

    // Normalization: rename, or disable when another info owns the
    // canonical title 规范化：重命名，若别的标签已持有规范名则禁用
    for i in 0..infos.len() {
      let Some(canonical) = self.norm.get(&infos[i].title) else {
        continue;
      };
      let taken = infos
        .iter()
        .enumerate()
        .any(|(j, info)| j != i && info.title == *canonical);
      if taken {
        disabled[i] = true;
      } else {
        infos[i].title = canonical.clone();
      }
    }

    // Containment: child carries its ancestors, an explicit ancestor
    // duplicating one of them is subsumed
    // 包含：子标签携带祖先，显式写出的祖先被子标签吸收
    for i in 0..infos.len() {
      if disabled[i] {
        continue;
      }
      let Some(ancestors) = self.contain.get(&infos[i].title) else {
        continue;
      };
      let score = infos[i].score;
      infos[i].aliases = ancestors.clone();
      infos[i].alias_scores = vec![score; ancestors.len()];
      for j in 0..infos.len() {
        if j != i && !disabled[j] && infos[i].aliases.contains(&infos[j].title) {
          disabled[j] = true;
        }
      }
    }

    // Entanglement: one for all, duplicates tolerated downstream
    // 纠缠：一荣俱荣，重复由下游幂等消化
    for i in 0..infos.len() {
      if disabled[i] {
        continue;
      }
      let Some(group) = self.entangle.get(&infos[i].title) else {
        continue;
      };
      let score = infos[i].score;
      infos[i].aliases.extend(group.iter().cloned());
      infos[i]
        .alias_scores
        .extend(std::iter::repeat(score).take(group.len()));
    }

    let mut keep = disabled.iter().map(|d| !d);
    infos.retain(|_| keep.next().unwrap_or(false));
    infos
  }

  /// Rewrite a query tag list 改写查询标签列表
  ///
  /// Canonicalize, dedupe, sort ascending, matching node identities.
  /// 规范化、去重、升序排序，与节点标识对齐。
  pub fn apply_for_searching(&self, tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = tags
      .iter()
      .map(|t| self.norm.get(t).unwrap_or(t).clone())
      .collect();
    out.sort();
    out.dedup();
    out
  }
}
