//! Interpolation and sampling helpers shared by the light field.
//!
//! All randomness is drawn from a caller-supplied [`Rng`] so layouts can be
//! reproduced from a seed.

use std::f64::consts::{PI, TAU};

use rand::Rng;

/// Linear interpolation: `value = 0` gives `min`, `value = 1` gives `max`.
pub fn lerp(value: f64, min: f64, max: f64) -> f64 {
	min + value * (max - min)
}

/// Inverse of [`lerp`]: where `value` sits between `min` and `max`.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
	(value - min) / (max - min)
}

/// Re-map `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
pub fn map_range(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
	lerp(normalize(value, in_min, in_max), out_min, out_max)
}

/// Uniform sample in `[0, 1)`.
pub fn random<R: Rng + ?Sized>(rng: &mut R) -> f64 {
	rng.r#gen::<f64>()
}

/// Uniform sample between `min` and `max`.
///
/// Unlike `gen_range` this accepts `min > max` (and `min == max`), sampling
/// the interval between them. The band layout relies on this near the
/// viewport edges where the radius upper bound drops below its lower bound.
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
	min + random(rng) * (max - min)
}

/// Uniform sample in `[0, max)`.
pub fn random_below<R: Rng + ?Sized>(rng: &mut R, max: f64) -> f64 {
	random_range(rng, 0.0, max)
}

/// Pick one element uniformly. Returns `None` for an empty slice.
pub fn random_choice<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
	if items.is_empty() {
		return None;
	}
	items.get(rng.gen_range(0..items.len()))
}

/// Degrees to radians.
pub fn to_radians(degrees: f64) -> f64 {
	degrees * PI / 180.0
}

/// A random angle in `[0, 2π)`.
pub fn random_angle<R: Rng + ?Sized>(rng: &mut R) -> f64 {
	random_below(rng, TAU)
}

/// Build `size` items from their index.
pub fn fill<T>(size: usize, f: impl FnMut(usize) -> T) -> Vec<T> {
	(0..size).map(f).collect()
}

/// Build `size` items from their index, stopping at the first error.
pub fn try_fill<T, E>(size: usize, f: impl FnMut(usize) -> Result<T, E>) -> Result<Vec<T>, E> {
	(0..size).map(f).collect()
}
