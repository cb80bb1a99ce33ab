//! Compactly supported smoothing weight.
//!
//! Shared by agent repulsion and wall avoidance.  Un-normalized: the weight
//! is 1 at the origin, 0.25 at half the radius, and exactly 0 from the
//! support radius `h` onward, so forces fade out smoothly instead of
//! blowing up at short range.

/// Cubic spline weight at distance `r` for support radius `h`.
///
/// ```text
/// q = r / h
/// q < 0        → 0
/// 0 ≤ q ≤ 0.5  → 1 − 6q² + 6q³
/// 0.5 < q ≤ 1  → 2(1 − q)³
/// q > 1        → 0
/// ```
#[inline]
pub fn weight(r: f32, h: f32) -> f32 {
    let q = r / h;
    if q < 0.0 {
        0.0
    } else if q <= 0.5 {
        1.0 - 6.0 * q * q + 6.0 * q * q * q
    } else if q <= 1.0 {
        2.0 * (1.0 - q).powi(3)
    } else {
        0.0
    }
}
