//! Sampled points on the navigable surface.

use glam::{Vec2, Vec3};
use std::hash::{Hash, Hasher};

/// The lattice spacing used to decide whether two Nodes describe the same location.
///
/// Horizontal positions are snapped to multiples of this value, so two samples closer than
/// half of it on both axes share a [`CellKey`].
pub const CELL_EPSILON: f32 = 0.01;

/// Grid-snapped horizontal identity of a [`Node`].
///
/// Repeated float additions while walking the grid (`x + size + size + ...`) drift by tiny
/// amounts. Quantizing the `(x, z)` position keeps independently created samples of the same
/// cell equal and gives them the same hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
	x: i64,
	z: i64,
}

impl CellKey {
	/// Snaps a horizontal position to the lattice
	///
	/// ## Examples
	/// ```
	/// # use terrain_pathfinding::node::CellKey;
	/// assert_eq!(CellKey::from_xz(3.0, 1.0), CellKey::from_xz(3.001, 0.999));
	/// assert_ne!(CellKey::from_xz(3.0, 1.0), CellKey::from_xz(3.02, 1.0));
	/// ```
	pub fn from_xz(x: f32, z: f32) -> CellKey {
		CellKey {
			x: (x / CELL_EPSILON).round() as i64,
			z: (z / CELL_EPSILON).round() as i64,
		}
	}

	/// Snaps the horizontal part of a world position to the lattice
	pub fn from_position(position: Vec3) -> CellKey {
		CellKey::from_xz(position.x, position.z)
	}
}

/// A sampled point on the terrain.
///
/// A Node is a plain value: once created, only its cached legality may be filled in (see
/// [`PathFinder::is_legal`](crate::PathFinder::is_legal)). Everything a search accumulates
/// about a Node (cost so far, heuristic, parent) is kept by the search itself.
///
/// Equality and hashing only consider the horizontal position, snapped to a [`CellKey`].
#[derive(Clone, Copy, Debug)]
pub struct Node {
	position: Vec3,
	size: f32,
	slope_angle: f32,
	direction: Vec2,
	legal: Option<bool>,
	key: CellKey,
}

impl Node {
	/// Creates a Node at `position` with a flat slope, a size of `1.0` and no direction
	pub fn new(position: Vec3) -> Node {
		Node {
			position,
			size: 1.0,
			slope_angle: 0.0,
			direction: Vec2::ZERO,
			legal: None,
			key: CellKey::from_position(position),
		}
	}

	/// Sets the slope angle in degrees
	pub fn with_slope_angle(mut self, slope_angle: f32) -> Node {
		self.slope_angle = slope_angle;
		self
	}

	/// Sets the edge length of the cell this Node samples
	pub fn with_size(mut self, size: f32) -> Node {
		self.size = size;
		self
	}

	/// Sets the heading. The value is normalized; a zero vector means "no heading".
	pub fn with_direction(mut self, direction: Vec2) -> Node {
		self.direction = direction.normalize_or_zero();
		self
	}

	/// World-space position. `y` is the height.
	pub fn position(&self) -> Vec3 {
		self.position
	}

	/// Horizontal `(x, z)` part of the position
	pub fn position_2d(&self) -> Vec2 {
		Vec2::new(self.position.x, self.position.z)
	}

	/// Height of the Node
	pub fn height(&self) -> f32 {
		self.position.y
	}

	/// Edge length of the cell
	pub fn size(&self) -> f32 {
		self.size
	}

	/// Slope of the terrain at this Node in degrees
	pub fn slope_angle(&self) -> f32 {
		self.slope_angle
	}

	/// Normalized heading, or [`Vec2::ZERO`]
	pub fn direction(&self) -> Vec2 {
		self.direction
	}

	/// The grid-snapped identity of this Node
	pub fn key(&self) -> CellKey {
		self.key
	}

	/// The cached legality, if it was already evaluated
	pub fn legal(&self) -> Option<bool> {
		self.legal
	}

	/// `true` if the Node was evaluated and found legal
	pub fn is_legal(&self) -> bool {
		self.legal == Some(true)
	}

	pub(crate) fn set_legal(&mut self, legal: bool) {
		self.legal = Some(legal);
	}

	/// Checks if `other` is close enough to be treated as the same location.
	///
	/// This is `true` if the horizontal distance is smaller than the size of `self`. Used to
	/// detect that a search reached the goal, which rarely lies exactly on a grid sample.
	///
	/// ## Examples
	/// ```
	/// # use terrain_pathfinding::{Node, glam::Vec3};
	/// let a = Node::new(Vec3::new(0.0, 0.0, 0.0)).with_size(1.0);
	/// let b = Node::new(Vec3::new(0.5, 8.0, 0.5));
	/// let c = Node::new(Vec3::new(1.0, 0.0, 0.0));
	///
	/// assert!(a.collision(&b));
	/// assert!(!a.collision(&c));
	/// ```
	pub fn collision(&self, other: &Node) -> bool {
		self.distance_2d(other) < self.size
	}

	/// Distance on the horizontal plane
	pub fn distance_2d(&self, other: &Node) -> f32 {
		self.position_2d().distance(other.position_2d())
	}

	/// Distance in world space
	pub fn distance_3d(&self, other: &Node) -> f32 {
		self.position.distance(other.position)
	}

	/// Normalized horizontal direction from `self` to `other`, or [`Vec2::ZERO`] if they overlap
	pub fn direction_to(&self, other: &Node) -> Vec2 {
		(other.position_2d() - self.position_2d()).normalize_or_zero()
	}
}

impl PartialEq for Node {
	fn eq(&self, other: &Node) -> bool {
		self.key == other.key
	}
}
impl Eq for Node {}

impl Hash for Node {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.key.hash(state);
	}
}

use std::fmt;
impl fmt::Display for Node {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		write!(
			fmt,
			"({:.2}, {:.2}, {:.2})",
			self.position.x, self.position.y, self.position.z
		)
	}
}
