//! Priority arithmetic shared by objectives.
//!
//! # Tiers
//!
//! ```text
//! order_priority          current order (scheduler-selected)
//! min(order - 1, 90)      ceiling for organic priorities
//! 0                       invalid / nothing to do
//! ```
//!
//! # Aggregate Formula
//!
//! Multi-target objectives combine an instantaneous target value with earned
//! devotion:
//!
//! ```text
//! max   = min(order_priority - 1, 90)
//! value = clamp((min(devotion, 10) + target_value * modifier) / 100, 0, 1)
//! score = lerp(0, max, value)
//! ```

/// Target values below this are treated as zero.
pub const NOISE_FLOOR: f32 = 1.0;

/// Hard ceiling for any non-order priority.
pub const MAX_ORGANIC_PRIORITY: f32 = 90.0;

/// Devotion contributes at most this much to the aggregate.
pub const MAX_DEVOTION_BONUS: f32 = 10.0;

#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Ceiling for organic priorities under the given order priority.
#[inline]
pub fn organic_ceiling(order_priority: f32) -> f32 {
    (order_priority - 1.0).min(MAX_ORGANIC_PRIORITY)
}

/// Applies the noise floor: values under [`NOISE_FLOOR`] become `None`.
#[inline]
pub fn above_noise_floor(target_value: f32) -> Option<f32> {
    (target_value >= NOISE_FLOOR).then_some(target_value)
}

/// Combines a target value with devotion into a priority below the order tier.
///
/// `target_value` may exceed 100; the result is still capped at
/// [`organic_ceiling`].
pub fn aggregate(target_value: f32, devotion: f32, priority_modifier: f32, order_priority: f32) -> f32 {
    let max = organic_ceiling(order_priority);
    let devotion = devotion.min(MAX_DEVOTION_BONUS);
    let value = ((devotion + target_value * priority_modifier) / 100.0).clamp(0.0, 1.0);
    lerp(0.0, max, value)
}
