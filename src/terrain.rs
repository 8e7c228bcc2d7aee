//! Access to the terrain that is being searched.
//!
//! A [`PathFinder`](crate::PathFinder) never owns the terrain. It samples the height and slope
//! of the positions it visits through a [`TerrainSampler`] and asks a [`Bounds`] whether a
//! position may be visited at all.

use crate::Error;
use glam::{Vec2, Vec3};

/// Provides height and slope of the terrain at arbitrary world positions.
///
/// Implementations are expected to be pure with respect to the position: sampling the same
/// position twice gives the same result. Only the `x` and `z` components of `position` are
/// meaningful for a height field; `y` is whatever the caller currently believes the height to be.
pub trait TerrainSampler {
	/// The terrain height below `position`
	fn sample_height(&self, position: Vec3) -> f32;
	/// The slope of the terrain at `position`, in degrees (`0` is flat, `90` is a cliff)
	fn slope_angle(&self, position: Vec3) -> f32;
}

/// Decides which world positions lie in the navigable area
pub trait Bounds {
	/// `true` if `position` may be part of a Path
	fn contains(&self, position: Vec3) -> bool;
}

/// An axis-aligned rectangle on the horizontal `(x, z)` plane.
///
/// Serves both as the navigable [`Bounds`] and as the extent used by
/// [`Path::normalized_points`](crate::Path::normalized_points).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainBounds {
	min: Vec2,
	max: Vec2,
}

impl TerrainBounds {
	/// Creates the rectangle spanned by two corners. The corners may be given in any order.
	pub fn new(a: Vec2, b: Vec2) -> TerrainBounds {
		TerrainBounds {
			min: a.min(b),
			max: a.max(b),
		}
	}

	/// Creates the rectangle starting at `origin` with the given `size`
	pub fn from_size(origin: Vec2, size: Vec2) -> TerrainBounds {
		TerrainBounds::new(origin, origin + size)
	}

	/// The corner with the smallest coordinates
	pub fn min(&self) -> Vec2 {
		self.min
	}

	/// The corner with the largest coordinates
	pub fn max(&self) -> Vec2 {
		self.max
	}

	/// Width (along x) and depth (along z)
	pub fn size(&self) -> Vec2 {
		self.max - self.min
	}

	/// Maps a world position into `[0, 1]²` relative to this rectangle.
	///
	/// Positions outside the rectangle map outside of `[0, 1]²`. A degenerate axis maps to `0`.
	///
	/// ## Examples
	/// ```
	/// # use terrain_pathfinding::{terrain::TerrainBounds, glam::{Vec2, Vec3}};
	/// let bounds = TerrainBounds::from_size(Vec2::new(-10.0, 0.0), Vec2::new(20.0, 40.0));
	/// assert_eq!(bounds.normalize(Vec3::new(0.0, 7.0, 10.0)), Vec2::new(0.5, 0.25));
	/// ```
	pub fn normalize(&self, position: Vec3) -> Vec2 {
		let size = self.size();
		let offset = Vec2::new(position.x, position.z) - self.min;
		let axis = |offset: f32, size: f32| if size > 0.0 { offset / size } else { 0.0 };
		Vec2::new(axis(offset.x, size.x), axis(offset.y, size.y))
	}
}

impl Bounds for TerrainBounds {
	fn contains(&self, position: Vec3) -> bool {
		position.x >= self.min.x
			&& position.x <= self.max.x
			&& position.z >= self.min.y
			&& position.z <= self.max.y
	}
}

/// A [`TerrainSampler`] built from two closures.
///
/// ## Examples
/// ```
/// # use terrain_pathfinding::{terrain::{FnTerrain, TerrainSampler}, glam::Vec3};
/// // a ramp rising along x
/// let terrain = FnTerrain::new(|p: Vec3| p.x * 0.5, |_| 26.5);
///
/// assert_eq!(terrain.sample_height(Vec3::new(4.0, 0.0, 1.0)), 2.0);
/// assert_eq!(terrain.slope_angle(Vec3::ZERO), 26.5);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FnTerrain<H, S> {
	height: H,
	slope: S,
}

impl<H, S> FnTerrain<H, S>
where
	H: Fn(Vec3) -> f32,
	S: Fn(Vec3) -> f32,
{
	/// Creates the sampler. `height` returns the terrain height, `slope` the slope in degrees.
	pub fn new(height: H, slope: S) -> FnTerrain<H, S> {
		FnTerrain { height, slope }
	}
}

impl<H, S> TerrainSampler for FnTerrain<H, S>
where
	H: Fn(Vec3) -> f32,
	S: Fn(Vec3) -> f32,
{
	fn sample_height(&self, position: Vec3) -> f32 {
		(self.height)(position)
	}
	fn slope_angle(&self, position: Vec3) -> f32 {
		(self.slope)(position)
	}
}

/// A regular grid of height samples.
///
/// Heights between samples are bilinearly interpolated and the slope is derived from the
/// gradient of the interpolated surface. Positions outside of the grid are clamped to its edge.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
	heights: Vec<f32>,
	width: usize,
	depth: usize,
	spacing: f32,
	origin: Vec2,
}

impl HeightField {
	/// Creates a HeightField from row-major heights (`heights[x + z * width]`).
	///
	/// `spacing` is the world distance between two samples and `origin` the world `(x, z)` of
	/// the first sample.
	pub fn new(
		(width, depth): (usize, usize),
		spacing: f32,
		origin: Vec2,
		heights: Vec<f32>,
	) -> Result<HeightField, Error> {
		if width < 2 || depth < 2 {
			return Err(Error::HeightFieldTooSmall { width, depth });
		}
		let count = sample_count(width, depth)?;
		if heights.len() != count {
			return Err(Error::HeightCountMismatch {
				width,
				depth,
				actual: heights.len(),
			});
		}
		if !(spacing.is_finite() && spacing > 0.0) {
			return Err(Error::InvalidSpacing(spacing));
		}
		Ok(HeightField {
			heights,
			width,
			depth,
			spacing,
			origin,
		})
	}

	/// Creates a HeightField by evaluating `height(x, z)` for every sample index
	///
	/// ## Examples
	/// ```
	/// # use terrain_pathfinding::{terrain::{HeightField, TerrainSampler}, glam::{Vec2, Vec3}};
	/// let field = HeightField::from_fn((5, 5), 1.0, Vec2::ZERO, |x, _| x as f32).unwrap();
	///
	/// assert_eq!(field.sample_height(Vec3::new(2.5, 0.0, 1.0)), 2.5);
	/// assert!((field.slope_angle(Vec3::new(2.0, 0.0, 2.0)) - 45.0).abs() < 1e-3);
	/// ```
	pub fn from_fn(
		(width, depth): (usize, usize),
		spacing: f32,
		origin: Vec2,
		mut height: impl FnMut(usize, usize) -> f32,
	) -> Result<HeightField, Error> {
		let mut heights = Vec::with_capacity(sample_count(width, depth)?);
		for z in 0..depth {
			for x in 0..width {
				heights.push(height(x, z));
			}
		}
		HeightField::new((width, depth), spacing, origin, heights)
	}

	/// Number of samples along x and z
	pub fn dimensions(&self) -> (usize, usize) {
		(self.width, self.depth)
	}

	/// World distance between two neighbouring samples
	pub fn spacing(&self) -> f32 {
		self.spacing
	}

	/// The area covered by the samples
	pub fn bounds(&self) -> TerrainBounds {
		let size = Vec2::new(
			(self.width - 1) as f32 * self.spacing,
			(self.depth - 1) as f32 * self.spacing,
		);
		TerrainBounds::from_size(self.origin, size)
	}

	fn sample(&self, x: usize, z: usize) -> f32 {
		self.heights[x + z * self.width]
	}

	fn interpolate(&self, x: f32, z: f32) -> f32 {
		let gx = ((x - self.origin.x) / self.spacing).clamp(0.0, (self.width - 1) as f32);
		let gz = ((z - self.origin.y) / self.spacing).clamp(0.0, (self.depth - 1) as f32);

		let x0 = (gx.floor() as usize).min(self.width - 2);
		let z0 = (gz.floor() as usize).min(self.depth - 2);
		let (tx, tz) = (gx - x0 as f32, gz - z0 as f32);

		let top = self.sample(x0, z0) * (1.0 - tx) + self.sample(x0 + 1, z0) * tx;
		let bottom = self.sample(x0, z0 + 1) * (1.0 - tx) + self.sample(x0 + 1, z0 + 1) * tx;
		top * (1.0 - tz) + bottom * tz
	}
}

fn sample_count(width: usize, depth: usize) -> Result<usize, Error> {
	width
		.checked_mul(depth)
		.ok_or(Error::HeightFieldTooLarge { width, depth })
}

impl TerrainSampler for HeightField {
	fn sample_height(&self, position: Vec3) -> f32 {
		self.interpolate(position.x, position.z)
	}

	fn slope_angle(&self, position: Vec3) -> f32 {
		let (x, z) = (position.x, position.z);
		let d = self.spacing * 0.5;
		let dx = (self.interpolate(x + d, z) - self.interpolate(x - d, z)) / (2.0 * d);
		let dz = (self.interpolate(x, z + d) - self.interpolate(x, z - d)) / (2.0 * d);
		Vec2::new(dx, dz).length().atan().to_degrees()
	}
}
