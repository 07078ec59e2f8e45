//! Guarded vector operations.
//!
//! Zero-length vectors show up in two places: a wind candidate whose
//! noise samples cancel the upward bias, and two particles that end up
//! coincident. Both are clamped here instead of producing NaN.

use glam::Vec3;

use billow_types::constants::EPSILON;

/// Normalizes `v`, dividing by `max(|v|, eps)`.
///
/// A vector shorter than `eps` comes back shorter than unit length
/// instead of blowing up. Callers that scale the result accept the
/// reduced magnitude for that degenerate cell.
#[inline]
pub fn normalize_clamped(v: Vec3, eps: f32) -> Vec3 {
    let len = v.length();
    v / len.max(eps)
}

/// Separation between two points: returns `(delta, distance)` with
/// `delta = b - a`.
///
/// Returns `None` when the points are closer than [`EPSILON`]; the
/// direction is undefined there and the caller skips the correction.
#[inline]
pub fn separation(a: Vec3, b: Vec3) -> Option<(Vec3, f32)> {
    let delta = b - a;
    let dist = delta.length();
    if dist < EPSILON || !dist.is_finite() {
        None
    } else {
        Some((delta, dist))
    }
}

/// Maps `value` in `[origin, origin + extent)` to one of `cells` buckets,
/// clamped to `[0, cells - 1]`.
///
/// NaN lands in cell 0, infinities in the nearest edge cell.
#[inline]
pub fn clamped_cell(value: f32, origin: f32, extent: f32, cells: usize) -> usize {
    let last = cells.saturating_sub(1);
    let t = (value - origin) / extent * cells as f32;
    if t.is_nan() || t <= 0.0 {
        0
    } else if t >= last as f32 {
        last
    } else {
        t.floor() as usize
    }
}
