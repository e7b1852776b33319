//! Per-item tag state after rule application 规则应用后的条目标签状态

/// One tag attached to one item 附着在一个条目上的一个标签
#[derive(Debug, Clone, PartialEq)]
pub struct TagInfo {
  /// Canonical tag string 规范化后的标签
  pub title: String,
  /// Weight 权重
  pub score: f64,
  /// Participates in relative-tag statistics (false for synthetic owner
  /// tags) 是否参与相关标签统计（合成归属标签为 false）
  pub enable_relative: bool,
  /// Extra tags this tag also attaches under 该标签额外附着的标签
  pub aliases: Vec<String>,
  /// Parallel to `aliases` 与 `aliases` 平行
  pub alias_scores: Vec<f64>,
}

impl TagInfo {
  #[inline]
  pub fn new(title: impl Into<String>, score: f64) -> Self {
    Self {
      title: title.into(),
      score,
      enable_relative: true,
      aliases: Vec::new(),
      alias_scores: Vec::new(),
    }
  }

  /// Synthetic tag, excluded from relative statistics
  /// 合成标签，不参与相关标签统计
  #[inline]
  pub fn synthetic(title: impl Into<String>) -> Self {
    Self {
      enable_relative: false,
      ..Self::new(title, 1.0)
    }
  }
}
