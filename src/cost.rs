//! The cost models that turn the shared search loop into A*, directional A* or Dijkstra.

use crate::{Cost, Node, PathFindingSettings};
use glam::Vec2;
use std::fmt::Debug;

/// Defines what a step costs and how far the goal is estimated to be.
///
/// A [`PathFinder`](crate::PathFinder) runs the same best-first search for every model: it
/// always expands the Node with the lowest `cost so far + heuristic`, breaking ties by the
/// lower heuristic. The model decides what those two numbers are.
///
/// The provided models are:
/// - [`Astar`] for distance and height based costs with a goal-directed heuristic
/// - [`AstarDirectional`] which additionally penalizes turning, resulting in smoother Paths
/// - [`Dijkstra`] which uses the costs of [`Astar`] without any heuristic
pub trait CostModel: Clone + Debug {
	/// The cost of stepping from `from` to the neighbouring Node `to`.
	///
	/// `heading` is the normalized direction in which `from` was entered, or [`Vec2::ZERO`] if
	/// it has none (the start of a search).
	fn cost(&self, from: &Node, heading: Vec2, to: &Node, settings: &PathFindingSettings)
		-> Cost;

	/// The estimated cost of reaching `goal` from `node`.
	///
	/// Returning `0` is always allowed. The estimate does not have to be admissible, but an
	/// overestimating heuristic may lead to Paths that are not the cheapest.
	fn heuristic(&self, node: &Node, goal: &Node, settings: &PathFindingSettings) -> Cost;

	/// `true` if neighbours should only be generated in front of the current heading
	fn front_only(&self) -> bool {
		false
	}
}

/// The cost shared by all models: weighted horizontal distance plus weighted height change
pub fn terrain_cost(from: &Node, to: &Node, settings: &PathFindingSettings) -> Cost {
	from.distance_2d(to) * settings.distance_cost
		+ (to.height() - from.height()).abs() * settings.height_cost
}

/// The heuristic shared by the A* models: weighted distance and height difference to the goal,
/// plus a weighted penalty for the slope at `node`
pub fn terrain_heuristic(node: &Node, goal: &Node, settings: &PathFindingSettings) -> Cost {
	node.distance_2d(goal) * settings.distance_heuristic
		+ (goal.height() - node.height()).abs() * settings.height_heuristic
		+ node.slope_angle() * settings.slope_heuristic
}

/// Plain A*.
///
/// ## Examples
/// ```
/// # use terrain_pathfinding::{Astar, CostModel, Node, PathFindingSettings, glam::{Vec2, Vec3}};
/// let settings = PathFindingSettings {
/// 	distance_cost: 1.0,
/// 	height_cost: 2.0,
/// 	..Default::default()
/// };
/// let a = Node::new(Vec3::new(0.0, 0.0, 0.0));
/// let b = Node::new(Vec3::new(1.0, 0.5, 0.0));
///
/// assert_eq!(Astar.cost(&a, Vec2::ZERO, &b, &settings), 2.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Astar;

impl CostModel for Astar {
	fn cost(
		&self,
		from: &Node,
		_heading: Vec2,
		to: &Node,
		settings: &PathFindingSettings,
	) -> Cost {
		terrain_cost(from, to, settings)
	}
	fn heuristic(&self, node: &Node, goal: &Node, settings: &PathFindingSettings) -> Cost {
		terrain_heuristic(node, goal, settings)
	}
}

/// A* with an additional cost for changing direction.
///
/// Each step costs what it would cost in [`Astar`], plus
/// [`turn_cost`](PathFindingSettings::turn_cost) times the angle (in radians) between the
/// heading and the step, scaled according to [`turn_penalty`](PathFindingSettings::turn_penalty).
///
/// Neighbours are only generated in front of the current heading, which keeps the search from
/// immediately doubling back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AstarDirectional;

impl AstarDirectional {
	/// The angle in radians between `heading` and the step from `from` to `to`.
	///
	/// `0` if there is no heading or the Nodes overlap.
	pub fn turn_angle(from: &Node, heading: Vec2, to: &Node) -> f32 {
		let step = from.direction_to(to);
		if heading == Vec2::ZERO || step == Vec2::ZERO {
			return 0.0;
		}
		heading.dot(step).clamp(-1.0, 1.0).acos()
	}
}

impl CostModel for AstarDirectional {
	fn cost(
		&self,
		from: &Node,
		heading: Vec2,
		to: &Node,
		settings: &PathFindingSettings,
	) -> Cost {
		let angle = AstarDirectional::turn_angle(from, heading, to);
		terrain_cost(from, to, settings) + settings.turn_penalty.apply(angle) * settings.turn_cost
	}
	fn heuristic(&self, node: &Node, goal: &Node, settings: &PathFindingSettings) -> Cost {
		Astar.heuristic(node, goal, settings)
	}
	fn front_only(&self) -> bool {
		true
	}
}

/// Uniform cost search: the costs of [`Astar`] without a heuristic.
///
/// Explores in all directions equally and therefore expands a lot more Nodes than [`Astar`],
/// but the resulting Path is the cheapest one on the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dijkstra;

impl CostModel for Dijkstra {
	fn cost(
		&self,
		from: &Node,
		heading: Vec2,
		to: &Node,
		settings: &PathFindingSettings,
	) -> Cost {
		Astar.cost(from, heading, to, settings)
	}
	fn heuristic(&self, _node: &Node, _goal: &Node, _settings: &PathFindingSettings) -> Cost {
		0.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::TurnPenalty;
	use glam::Vec3;
	use std::f32::consts::FRAC_PI_2;

	fn node(x: f32, y: f32, z: f32) -> Node {
		Node::new(Vec3::new(x, y, z))
	}

	#[test]
	fn heuristic_terms() {
		let settings = PathFindingSettings {
			distance_heuristic: 2.0,
			height_heuristic: 3.0,
			slope_heuristic: 0.5,
			..Default::default()
		};
		let n = node(0.0, 1.0, 0.0).with_slope_angle(10.0);
		let goal = node(3.0, 3.0, 4.0);

		// 5 * 2 + 2 * 3 + 10 * 0.5
		assert_eq!(Astar.heuristic(&n, &goal, &settings), 21.0);
		assert_eq!(Dijkstra.heuristic(&n, &goal, &settings), 0.0);
	}

	#[test]
	fn zero_weights_disable_terms() {
		let settings = PathFindingSettings {
			distance_cost: 0.0,
			height_cost: 0.0,
			..Default::default()
		};
		let cost = Astar.cost(&node(0.0, 0.0, 0.0), Vec2::ZERO, &node(1.0, 9.0, 1.0), &settings);
		assert_eq!(cost, 0.0);
	}

	#[test]
	fn turn_angle() {
		let from = node(0.0, 0.0, 0.0);
		let ahead = node(1.0, 0.0, 0.0);
		let left = node(0.0, 0.0, 1.0);
		let heading = Vec2::X;

		assert_eq!(AstarDirectional::turn_angle(&from, heading, &ahead), 0.0);
		assert!((AstarDirectional::turn_angle(&from, heading, &left) - FRAC_PI_2).abs() < 1e-6);
		assert_eq!(AstarDirectional::turn_angle(&from, Vec2::ZERO, &left), 0.0);
	}

	#[test]
	fn directional_cost() {
		let from = node(0.0, 0.0, 0.0);
		let left = node(0.0, 0.0, 1.0);

		let linear = PathFindingSettings {
			turn_cost: 2.0,
			turn_penalty: TurnPenalty::Linear,
			..Default::default()
		};
		let cost = AstarDirectional.cost(&from, Vec2::X, &left, &linear);
		assert!((cost - (1.0 + 2.0 * FRAC_PI_2)).abs() < 1e-5);

		let squared = PathFindingSettings {
			turn_penalty: TurnPenalty::Squared,
			..linear
		};
		let cost = AstarDirectional.cost(&from, Vec2::X, &left, &squared);
		assert!((cost - (1.0 + 2.0 * FRAC_PI_2 * FRAC_PI_2)).abs() < 1e-5);

		// going straight costs the same as in Astar
		let ahead = node(1.0, 0.0, 0.0);
		assert_eq!(
			AstarDirectional.cost(&from, Vec2::X, &ahead, &linear),
			Astar.cost(&from, Vec2::X, &ahead, &linear)
		);
	}

	#[test]
	fn front_only() {
		assert!(!Astar.front_only());
		assert!(AstarDirectional.front_only());
		assert!(!Dijkstra.front_only());
	}
}
