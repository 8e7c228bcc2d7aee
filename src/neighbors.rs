//! The grid offsets used to expand a Node.
//!
//! Every Node is surrounded by the 8 cells of its
//! [Moore Neighborhood](https://en.wikipedia.org/wiki/Moore_neighborhood):
//!
//! ```text
//! N: Node, o: neighbour at distance `size` (or `size * √2` diagonally)
//! o o o
//!  \|/
//! o-N-o
//!  /|\
//! o o o
//! ```
//!
//! A search with a heading can restrict itself to the neighbours in front of it, i.e. the
//! offsets that have a positive dot product with the heading:
//!
//! ```text
//! heading: →
//! . . o
//!    /
//! . N-o
//!    \
//! . . o
//! ```

use glam::Vec2;

/// The unscaled offsets of the 8 surrounding cells, clockwise starting at `-z`
pub const MOORE_OFFSETS: [(f32, f32); 8] = [
	(0.0, -1.0),
	(1.0, -1.0),
	(1.0, 0.0),
	(1.0, 1.0),
	(0.0, 1.0),
	(-1.0, 1.0),
	(-1.0, 0.0),
	(-1.0, -1.0),
];

/// Iterates the offsets of the neighbours that should be generated.
///
/// If `front_only` is set and `heading` is not zero, offsets pointing sideways or backwards are
/// skipped. Without a heading there is no "front", so all 8 offsets are returned.
pub fn offsets(heading: Vec2, front_only: bool) -> impl Iterator<Item = Vec2> {
	let filter = front_only && heading != Vec2::ZERO;
	MOORE_OFFSETS
		.iter()
		.map(|&(x, z)| Vec2::new(x, z))
		.filter(move |offset| !filter || offset.dot(heading) > 0.0)
}
