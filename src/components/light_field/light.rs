//! A single glow sprite.
//!
//! Each light pre-renders its radial gradient once into an off-screen surface
//! and afterwards only blits it, optionally pulsing in size and opacity.

use std::f64::consts::TAU;

use rand::Rng;

use super::error::{Error, Result};
use super::math::{lerp, normalize, random, random_angle, random_range};
use super::surface::{GradientStop, Surface, SurfaceFactory};
use super::theme::Color;
use super::types::Point;

/// Sprite side length as a multiple of the light radius.
pub const SPRITE_SCALE: f64 = 2.1;

/// Chance that a twinkle-eligible light stays static.
pub const STATIC_PROBABILITY: f64 = 0.7;

/// Twinkle angular speed range, radians per millisecond.
const TWINKLE_SPEED: (f64, f64) = (0.002, 0.004);
const TWINKLE_SCALE: (f64, f64) = (0.98, 1.02);
const TWINKLE_ALPHA: (f64, f64) = (0.1, 1.0);

/// Construction options for a [`Light`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightConfig {
	pub position: Point,
	pub radius: f64,
	pub color: Color,
	/// Opacity of the lit part of the disc, `0.0..=1.0`.
	pub alpha: f64,
	/// Offset of the inner gradient stop, strictly between 0 and 1.
	pub softness: f64,
	/// Whether the light may twinkle at all.
	pub twinkle: bool,
}

impl LightConfig {
	pub fn new(radius: f64) -> Self {
		Self {
			position: Point::default(),
			radius,
			color: Color::rgb(255, 255, 255),
			alpha: 0.5,
			softness: 0.1,
			twinkle: true,
		}
	}

	fn validate(&self) -> Result<()> {
		if !(self.radius.is_finite() && self.radius > 0.0) {
			return Err(Error::InvalidParameter(format!(
				"radius must be positive, got {}",
				self.radius
			)));
		}
		if sprite_side(self.radius) == 0 {
			return Err(Error::InvalidParameter(format!(
				"radius {} gives an empty sprite",
				self.radius
			)));
		}
		if !(0.0..=1.0).contains(&self.alpha) {
			return Err(Error::InvalidParameter(format!(
				"alpha must be within [0, 1], got {}",
				self.alpha
			)));
		}
		if !(self.softness > 0.0 && self.softness < 1.0) {
			return Err(Error::InvalidParameter(format!(
				"softness must be within (0, 1), got {}",
				self.softness
			)));
		}
		Ok(())
	}
}

/// Oscillation state of a twinkling light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Twinkle {
	pub phase: f64,
	/// Radians per millisecond.
	pub speed: f64,
	pub scale: f64,
	pub alpha: f64,
}

impl Twinkle {
	fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
		Self {
			phase: random_angle(rng),
			speed: random_range(rng, TWINKLE_SPEED.0, TWINKLE_SPEED.1),
			scale: 1.0,
			alpha: 1.0,
		}
	}

	/// Milliseconds for one full pulse.
	pub fn period(&self) -> f64 {
		TAU / self.speed
	}

	fn advance(&mut self, elapsed_ms: f64) {
		let theta = self.phase + elapsed_ms * self.speed;
		let value = normalize(theta.sin(), -1.0, 1.0);
		self.scale = lerp(value, TWINKLE_SCALE.0, TWINKLE_SCALE.1);
		self.alpha = lerp(value, TWINKLE_ALPHA.0, TWINKLE_ALPHA.1);
	}
}

/// A glow sprite placed on the field.
#[derive(Debug)]
pub struct Light<S> {
	pub position: Point,
	radius: f64,
	color: Color,
	alpha: f64,
	softness: f64,
	sprite: S,
	twinkle: Option<Twinkle>,
}

impl<S: Surface> Light<S> {
	/// Render the sprite and roll whether this light twinkles.
	pub fn new<F, R>(config: LightConfig, factory: &F, rng: &mut R) -> Result<Self>
	where
		F: SurfaceFactory<Surface = S>,
		R: Rng + ?Sized,
	{
		config.validate()?;

		let side = sprite_side(config.radius);
		let mut sprite = factory.create_surface(side, side)?;
		let center = side as f64 / 2.0;
		let lit = config.color.with_alpha(config.alpha);
		sprite.fill_radial_gradient(
			center,
			center,
			config.radius,
			&[
				GradientStop::new(0.0, config.color.with_alpha(0.0)),
				GradientStop::new(config.softness, lit),
				GradientStop::new(1.0, lit),
			],
		)?;

		let twinkle = if config.twinkle && random(rng) >= STATIC_PROBABILITY {
			Some(Twinkle::roll(rng))
		} else {
			None
		};

		Ok(Self {
			position: config.position,
			radius: config.radius,
			color: config.color,
			alpha: config.alpha,
			softness: config.softness,
			sprite,
			twinkle,
		})
	}

	/// Advance the twinkle to `elapsed_ms` of animation time.
	pub fn update(&mut self, elapsed_ms: f64) {
		if let Some(ref mut twinkle) = self.twinkle {
			twinkle.advance(elapsed_ms);
		}
	}

	/// Blit the sprite centered on `position`.
	///
	/// Target state is restored even when the blit fails.
	pub fn draw(&self, target: &mut S) -> Result<()> {
		target.save();
		let result = self.draw_at_origin(target);
		target.restore();
		result
	}

	fn draw_at_origin(&self, target: &mut S) -> Result<()> {
		target.translate(self.position.x, self.position.y)?;
		if let Some(ref twinkle) = self.twinkle {
			target.scale(twinkle.scale)?;
			target.set_global_alpha(twinkle.alpha);
		}
		let half = self.sprite.width() as f64 / 2.0;
		target.draw_surface(&self.sprite, -half, -half)
	}

	pub fn radius(&self) -> f64 {
		self.radius
	}

	pub fn color(&self) -> Color {
		self.color
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn softness(&self) -> f64 {
		self.softness
	}

	pub fn sprite(&self) -> &S {
		&self.sprite
	}

	pub fn twinkle(&self) -> Option<&Twinkle> {
		self.twinkle.as_ref()
	}

	/// Scale applied when drawing; 1.0 for static lights.
	pub fn draw_scale(&self) -> f64 {
		self.twinkle.map_or(1.0, |t| t.scale)
	}

	/// Opacity multiplier applied when drawing; 1.0 for static lights.
	pub fn draw_alpha(&self) -> f64 {
		self.twinkle.map_or(1.0, |t| t.alpha)
	}
}

/// Pixel side length of the sprite for `radius`.
pub fn sprite_side(radius: f64) -> u32 {
	(SPRITE_SCALE * radius).round() as u32
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use rstest::rstest;

	use super::super::raster::RasterFactory;
	use super::super::testing::{Op, RecordingFactory, RecordingSurface};
	use super::*;

	fn twinkling_light(rng: &mut StdRng) -> Light<RecordingSurface> {
		loop {
			let light = Light::new(LightConfig::new(10.0), &RecordingFactory::default(), rng).unwrap();
			if light.twinkle().is_some() {
				return light;
			}
		}
	}

	fn static_light() -> Light<RecordingSurface> {
		let config = LightConfig {
			position: Point::new(40.0, 30.0),
			twinkle: false,
			..LightConfig::new(10.0)
		};
		Light::new(config, &RecordingFactory::default(), &mut StdRng::seed_from_u64(1)).unwrap()
	}

	#[rstest]
	#[case(10.0, 21)]
	#[case(25.0, 53)]
	#[case(33.3, 70)]
	#[case(200.0, 420)]
	fn sprite_is_rounded_two_point_one_radii(#[case] radius: f64, #[case] side: u32) {
		let mut rng = StdRng::seed_from_u64(5);
		let light = Light::new(LightConfig::new(radius), &RecordingFactory::default(), &mut rng).unwrap();
		assert_eq!((light.sprite().width, light.sprite().height), (side, side));
	}

	#[test]
	fn sprite_gradient_is_centered_with_three_stops() {
		let config = LightConfig {
			color: Color::rgb(250, 102, 50),
			alpha: 0.4,
			softness: 0.25,
			..LightConfig::new(10.0)
		};
		let light = Light::new(config, &RecordingFactory::default(), &mut StdRng::seed_from_u64(2)).unwrap();
		let lit = Color::rgba(250, 102, 50, 0.4);
		assert_eq!(
			light.sprite().ops,
			vec![Op::RadialGradient {
				cx: 10.5,
				cy: 10.5,
				radius: 10.0,
				stops: vec![
					GradientStop::new(0.0, Color::rgba(250, 102, 50, 0.0)),
					GradientStop::new(0.25, lit),
					GradientStop::new(1.0, lit),
				],
			}]
		);
	}

	#[test]
	fn rendered_sprite_is_transparent_center_and_uniform_rim() {
		let config = LightConfig {
			color: Color::rgb(255, 255, 255),
			alpha: 0.5,
			softness: 0.5,
			twinkle: false,
			..LightConfig::new(10.0)
		};
		let light = Light::new(config, &RasterFactory, &mut StdRng::seed_from_u64(3)).unwrap();
		let sprite = light.sprite();
		assert_eq!(sprite.pixel(10, 10).unwrap()[3], 0.0);
		assert!((sprite.pixel(17, 10).unwrap()[3] - 0.5).abs() < 1e-6);
		assert!((sprite.pixel(0, 10).unwrap()[3] - 0.5).abs() < 1e-6);
		assert_eq!(sprite.pixel(20, 20).unwrap()[3], 0.0);
	}

	#[rstest]
	#[case(LightConfig::new(0.0))]
	#[case(LightConfig::new(-4.0))]
	#[case(LightConfig::new(f64::NAN))]
	#[case(LightConfig::new(0.2))]
	#[case(LightConfig { alpha: 1.5, ..LightConfig::new(10.0) })]
	#[case(LightConfig { alpha: -0.1, ..LightConfig::new(10.0) })]
	#[case(LightConfig { softness: 0.0, ..LightConfig::new(10.0) })]
	#[case(LightConfig { softness: 1.0, ..LightConfig::new(10.0) })]
	fn invalid_parameters_fail_fast(#[case] config: LightConfig) {
		let factory = RecordingFactory::default();
		let result = Light::new(config, &factory, &mut StdRng::seed_from_u64(4));
		assert!(matches!(result, Err(Error::InvalidParameter(_))));
		assert_eq!(factory.created(), 0);
	}

	#[test]
	fn allocation_failure_propagates() {
		let factory = RecordingFactory::failing_after(0);
		let result = Light::new(LightConfig::new(10.0), &factory, &mut StdRng::seed_from_u64(4));
		assert!(matches!(result, Err(Error::SurfaceAllocation { width: 21, height: 21, .. })));
	}

	#[test]
	fn most_lights_are_static() {
		let mut rng = StdRng::seed_from_u64(99);
		let factory = RecordingFactory::default();
		let total = 2000;
		let still = (0..total)
			.filter(|_| {
				Light::new(LightConfig::new(1.0), &factory, &mut rng)
					.unwrap()
					.twinkle()
					.is_none()
			})
			.count();
		let ratio = still as f64 / total as f64;
		assert!((ratio - STATIC_PROBABILITY).abs() < 0.04, "static ratio {ratio}");
	}

	#[test]
	fn ineligible_lights_never_twinkle() {
		let mut rng = StdRng::seed_from_u64(8);
		let factory = RecordingFactory::default();
		for _ in 0..200 {
			let config = LightConfig {
				twinkle: false,
				..LightConfig::new(5.0)
			};
			assert!(Light::new(config, &factory, &mut rng).unwrap().twinkle().is_none());
		}
	}

	#[test]
	fn twinkle_parameters_in_range() {
		let mut rng = StdRng::seed_from_u64(21);
		for _ in 0..50 {
			let light = twinkling_light(&mut rng);
			let twinkle = light.twinkle().unwrap();
			assert!((0.0..TAU).contains(&twinkle.phase));
			assert!((0.002..=0.004).contains(&twinkle.speed));
		}
	}

	#[test]
	fn twinkle_stays_bounded_and_periodic() {
		let mut rng = StdRng::seed_from_u64(12);
		let mut light = twinkling_light(&mut rng);
		let period = light.twinkle().unwrap().period();
		for step in 0..500 {
			let t = step as f64 * 37.3;
			light.update(t);
			let (scale, alpha) = (light.draw_scale(), light.draw_alpha());
			assert!((0.98..=1.02).contains(&scale), "scale {scale} at {t}");
			assert!((0.1..=1.0).contains(&alpha), "alpha {alpha} at {t}");

			light.update(t + period);
			assert!((light.draw_scale() - scale).abs() < 1e-9);
			assert!((light.draw_alpha() - alpha).abs() < 1e-9);
		}
	}

	#[test]
	fn static_light_ignores_time() {
		let mut light = static_light();
		for t in [0.0, 16.0, 1234.5, 1e9] {
			light.update(t);
			assert_eq!(light.draw_scale(), 1.0);
			assert_eq!(light.draw_alpha(), 1.0);
		}
	}

	#[test]
	fn static_draw_only_translates_and_blits() {
		let light = static_light();
		let mut target = RecordingSurface::new(100, 100);
		light.draw(&mut target).unwrap();
		assert_eq!(
			target.ops,
			vec![
				Op::Save,
				Op::Translate(40.0, 30.0),
				Op::DrawSurface {
					width: 21,
					height: 21,
					x: -10.5,
					y: -10.5
				},
				Op::Restore,
			]
		);
	}

	#[test]
	fn twinkling_draw_scales_and_fades() {
		let mut light = twinkling_light(&mut StdRng::seed_from_u64(30));
		light.update(500.0);
		let twinkle = *light.twinkle().unwrap();
		let mut target = RecordingSurface::new(100, 100);
		light.draw(&mut target).unwrap();
		assert_eq!(target.ops[2], Op::Scale(twinkle.scale));
		assert_eq!(target.ops[3], Op::GlobalAlpha(twinkle.alpha));
		assert_eq!(target.ops.last(), Some(&Op::Restore));
	}

	#[test]
	fn failed_blit_still_restores() {
		let light = static_light();
		let mut target = RecordingSurface::new(100, 100);
		target.failing_draws.insert(0);
		assert!(matches!(light.draw(&mut target), Err(Error::Draw(_))));
		assert_eq!(target.ops, vec![Op::Save, Op::Translate(40.0, 30.0), Op::Restore]);
	}
}
