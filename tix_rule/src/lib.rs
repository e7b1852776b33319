//! Tag rewrite rules 标签改写规则
//!
//! Hosts describe tag relations declaratively, the compiled form rewrites
//! tag lists for indexing and for searching.
//! 宿主以声明方式描述标签关系，编译后的形式在索引与检索时改写标签列表。

mod info;
mod rule;

pub use info::TagInfo;
pub use rule::{CompiledRule, Rule};
