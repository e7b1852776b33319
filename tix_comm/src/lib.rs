//! tix shared foundation: types, key layout, shard routing, score fading
//! tix 公共基础：类型、键布局、分片路由、分数衰减

mod consts;
mod fade;
mod shard;
mod types;

pub use consts::{
  KEY_BASE_SET, KEY_DATE_RANK, KEY_HIGH_TAGS, KEY_ITEM_TAG_HASH, KEY_OVERALL_RANK,
  KEY_RAND_SUGGEST, KEY_RELATIVE_RANK, KEY_SCORE_RANK, TAG_SEP,
};
pub use fade::{confidence, fade, EPOCH_ANCHOR, FADE_FACTOR};
pub use shard::shard_of;
pub use types::{ItemId, ShardId};
