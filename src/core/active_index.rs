//! Active-index resolver.
//!
//! `index = clamp(round(progress * n), 0, n - 1)` with no hysteresis, so the
//! index may flicker by one near half-boundaries under jitter.
//!
//! `f64::round` rounds half away from zero.  Progress is never negative, so
//! this matches the browser's `Math.round` (half toward +∞) exactly.

pub fn resolve(progress: f64, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let scaled = (progress * n as f64).round();
    if scaled.is_nan() || scaled <= 0.0 {
        return 0;
    }
    (scaled as usize).min(n - 1)
}
