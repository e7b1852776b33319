//! Score fading 分数衰减
//!
//! The overall rank mixes a log-compressed score with the creation date so
//! newer items drift past older ones of similar score.
//! overall 排序把对数压缩的分数与创建时间混合，分数相近时新条目排前。

/// Fixed epoch anchor for the date term 时间项的固定纪元锚点
pub const EPOCH_ANCHOR: u64 = 1288465200;

/// One day of date spreads into roughly one unit of log-score
/// 一天的时间差约等于一个单位的对数分数
pub const FADE_FACTOR: f64 = (45000 * 2 * 30) as f64;

/// Time-decayed composite score 时间衰减综合分数
///
/// `sign(score)*log10(max(|score|,1)) + (date-anchor)/FADE_FACTOR`.
/// Dates before the anchor wrap around as unsigned arithmetic.
/// 锚点之前的时间按无符号算术回绕。
#[inline]
pub fn fade(score: f64, date: u64) -> f64 {
  let order = score.abs().max(1.0).log10();
  let sign = if score > 0.0 {
    1.0
  } else if score < 0.0 {
    -1.0
  } else {
    0.0
  };
  let seconds = date.wrapping_sub(EPOCH_ANCHOR) as f64;
  sign * order + seconds / FADE_FACTOR
}

/// Lower-bound confidence of an up/down vote pair
/// 赞成/反对票的置信下界
pub fn confidence(up: u64, down: u64) -> f64 {
  let n = (up + down) as f64;
  if n == 0.0 {
    return 0.0;
  }

  let z = 1.281551565545f64;
  let p = up as f64 / n;

  let left = p + 1.0 / (2.0 * n) * z * z;
  let right = z * (p * (1.0 - p) / n + z * z / (4.0 * n * n)).sqrt();
  let under = 1.0 + 1.0 / n * z * z;

  (left - right) / under
}
